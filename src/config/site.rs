//! Site configuration (_config.yml)

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// File name of the site configuration inside the source directory
pub const CONFIG_FILE: &str = "_config.yml";

/// Permalink pattern used when the config does not set one
pub const DEFAULT_PERMALINK: &str = "/:year/:month/:day/:title/";

/// Author name used when neither front matter nor config provide one
pub const DEFAULT_AUTHOR: &str = "unknown";

/// Treat an explicit YAML `null` (`baseurl:`) the same as a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn default_permalink<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .unwrap_or_else(|| DEFAULT_PERMALINK.to_string()))
}

/// Main site configuration
///
/// Only the keys the pipeline reads are typed; everything else is kept in
/// `extra` in document order and serialized back flat, so templates see the
/// config exactly as written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    #[serde(deserialize_with = "null_as_default")]
    pub baseurl: String,

    #[serde(deserialize_with = "default_permalink")]
    pub permalink: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,

    /// Store any additional fields
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

/// `author` may be a bare name or a mapping with a `name` key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Author {
    Name(String),
    Details(AuthorDetails),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            baseurl: String::new(),
            permalink: DEFAULT_PERMALINK.to_string(),
            author: None,
            extra: IndexMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    ///
    /// An empty or `null` document is the default config; anything else must
    /// be a mapping.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse configuration from YAML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let value: serde_yaml::Value = serde_yaml::from_str(content)?;
        if value.is_null() {
            return Ok(Self::default());
        }

        Ok(serde_yaml::from_value(value)?)
    }

    /// Configured author name, if any
    pub fn author_name(&self) -> Option<&str> {
        match self.author.as_ref()? {
            Author::Name(name) => Some(name),
            Author::Details(details) => details.name.as_deref(),
        }
    }
}
