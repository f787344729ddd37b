//! Error types for the build pipeline

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a build
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid config {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("template {name} failed for {}: {source}", .target.display())]
    Template {
        name: String,
        target: PathBuf,
        #[source]
        source: tera::Error,
    },

    #[error("cannot expose {key} to templates: {source}")]
    Context {
        key: &'static str,
        #[source]
        source: tera::Error,
    },

    #[error("cannot load templates from {}: {source}", .path.display())]
    TemplateLoad {
        path: PathBuf,
        #[source]
        source: tera::Error,
    },

    #[error("{action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("refusing to clean {}: it contains the source directory", .path.display())]
    UnsafeOutput { path: PathBuf },
}

impl Error {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

/// Why `_config.yml` could not be loaded
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read file: {0}")]
    Read(#[from] io::Error),

    #[error("{0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Per-file failure; never aborts a build on its own
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("cannot read file: {0}")]
    Read(#[from] io::Error),

    #[error("invalid front matter: {0}")]
    FrontMatter(#[from] serde_yaml::Error),

    #[error("front matter must be a mapping")]
    NotAMapping,

    #[error("unsupported mapping key {0:?}, keys must be scalars")]
    UnsupportedKey(String),

    #[error("unrecognized date {0:?}")]
    InvalidDate(String),

    #[error("permalink {0:?} escapes the output directory")]
    InvalidPermalink(String),
}
