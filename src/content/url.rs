//! Permalink expansion and URL to output-path mapping

use chrono::{Datelike, NaiveDateTime};
use std::path::PathBuf;

use crate::error::ParseError;

/// File written for directory-style URLs
pub const INDEX_FILE: &str = "index.html";

/// Substitute `:year`, `:month`, `:day` and `:title` in a permalink pattern
///
/// # Examples
/// ```ignore
/// permalink_url("/:year/:month/:day/:title/", &date, "hello-world") // -> "/2024/03/07/hello-world/"
/// ```
pub fn permalink_url(pattern: &str, date: &NaiveDateTime, title: &str) -> String {
    pattern
        .replace(":year", &date.year().to_string())
        .replace(":month", &format!("{:02}", date.month()))
        .replace(":day", &format!("{:02}", date.day()))
        .replace(":title", title)
}

/// Output file for a URL, relative to the output root
///
/// URLs ending in `/` map to `<url>/index.html`; any other URL is taken as a
/// literal file path. `.` and `..` segments are rejected.
pub fn output_path(url: &str) -> Result<PathBuf, ParseError> {
    let mut path = PathBuf::new();
    for segment in url.split('/').filter(|s| !s.is_empty()) {
        if segment == "." || segment == ".." {
            return Err(ParseError::InvalidPermalink(url.to_string()));
        }
        path.push(segment);
    }

    if url.ends_with('/') || path.as_os_str().is_empty() {
        path.push(INDEX_FILE);
    }
    Ok(path)
}
