//! Front-matter parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::error::ParseError;

/// Line that opens and closes a front-matter block
pub const SEPARATOR: &str = "---\n";

/// Front-matter data from a post or page
///
/// Values keep their YAML shape; the typed accessors apply the
/// string/sequence normalization the pipeline relies on.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FrontMatter(Mapping);

impl FrontMatter {
    /// Split raw file text into front matter and body
    ///
    /// The block is only recognized when the text starts with the separator
    /// line and a second separator line follows. Otherwise the front matter
    /// is empty and the body is the whole input.
    pub fn split(text: &str) -> Result<(Self, &str), ParseError> {
        let Some(rest) = text.strip_prefix(SEPARATOR) else {
            return Ok((Self::default(), text));
        };

        let Some(end) = find_closing_separator(rest) else {
            return Ok((Self::default(), text));
        };

        let block = &rest[..end];
        let body = &rest[end + SEPARATOR.len()..];
        Ok((Self::decode(block)?, body))
    }

    /// Decode a YAML block; empty or `null` is an empty mapping
    pub fn decode(block: &str) -> Result<Self, ParseError> {
        if block.trim().is_empty() {
            return Ok(Self::default());
        }

        match serde_yaml::from_str::<Value>(block)? {
            Value::Null => Ok(Self::default()),
            Value::Mapping(map) => {
                check_keys(&map)?;
                Ok(Self(map))
            }
            _ => Err(ParseError::NotAMapping),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Scalar value rendered as text; `null`, sequences and mappings are `None`
    pub fn string(&self, key: &str) -> Option<String> {
        self.get(key).and_then(scalar_to_string)
    }

    /// A single string or a sequence of scalars, normalized to a list
    pub fn string_list(&self, key: &str) -> Vec<String> {
        match self.get(key) {
            Some(Value::Sequence(items)) => items.iter().filter_map(scalar_to_string).collect(),
            Some(value) => scalar_to_string(value).into_iter().collect(),
            None => Vec::new(),
        }
    }

    /// Parse a date field; a present but unrecognized value is an error
    pub fn date(&self, key: &str) -> Result<Option<NaiveDateTime>, ParseError> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => {
                let text = scalar_to_string(value).unwrap_or_default();
                parse_date_string(&text)
                    .map(Some)
                    .ok_or(ParseError::InvalidDate(text))
            }
        }
    }
}

/// Offset of the closing separator within `rest` (the text after the opening one)
fn find_closing_separator(rest: &str) -> Option<usize> {
    if rest.starts_with(SEPARATOR) {
        return Some(0);
    }
    rest.find("\n---\n").map(|pos| pos + 1)
}

/// Templates only accept scalar mapping keys, at any depth
fn check_keys(map: &Mapping) -> Result<(), ParseError> {
    for (key, value) in map {
        if scalar_to_string(key).is_none() {
            return Err(ParseError::UnsupportedKey(format!("{:?}", key)));
        }
        check_nested_keys(value)?;
    }
    Ok(())
}

fn check_nested_keys(value: &Value) -> Result<(), ParseError> {
    match value {
        Value::Mapping(map) => check_keys(map),
        Value::Sequence(items) => items.iter().try_for_each(check_nested_keys),
        Value::Tagged(tagged) => check_nested_keys(&tagged.value),
        _ => Ok(()),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

/// Parse a date string in the formats YAML front matter commonly uses
pub fn parse_date_string(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    // Wall-clock time as written; the offset is dropped
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S %:z", "%Y-%m-%d %H:%M:%S %z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.naive_local());
        }
    }

    None
}
