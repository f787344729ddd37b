//! sunshine-ssg: a small static site generator for a single-author blog
//!
//! A source directory holds `_config.yml`, dated markdown posts in `_posts/`,
//! standalone markdown pages, Tera templates in `templates/` and static
//! `assets/`. [`Site::build`] turns it into a deployable HTML tree.

pub mod assets;
pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod templates;

use std::path::{Path, PathBuf};

pub use commands::build::BuildReport;
pub use error::{Error, ParseError, Result};

/// Directory of dated posts inside the source directory
pub const POSTS_DIR: &str = "_posts";

/// Directory of layouts inside the source directory
pub const TEMPLATES_DIR: &str = "templates";

/// Default output directory name
pub const DEFAULT_OUTPUT_DIR: &str = "_site";

/// A source directory and the output directory it builds into
#[derive(Debug, Clone)]
pub struct Site {
    /// Source (content) directory
    pub source_dir: PathBuf,
    /// Output directory, fully replaced on every build
    pub output_dir: PathBuf,
}

impl Site {
    pub fn new<S: AsRef<Path>, O: AsRef<Path>>(source_dir: S, output_dir: O) -> Self {
        Self {
            source_dir: source_dir.as_ref().to_path_buf(),
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.source_dir.join(config::CONFIG_FILE)
    }

    pub fn posts_dir(&self) -> PathBuf {
        self.source_dir.join(POSTS_DIR)
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.source_dir.join(TEMPLATES_DIR)
    }

    /// Load `_config.yml`; a missing file is the default config
    pub fn load_config(&self) -> Result<config::SiteConfig> {
        let path = self.config_path();
        if !path.exists() {
            tracing::debug!("No config at {:?}, using defaults", path);
            return Ok(config::SiteConfig::default());
        }

        config::SiteConfig::load(&path).map_err(|source| Error::Config { path, source })
    }

    /// Clean the output directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Build the static site
    pub fn build(&self) -> Result<BuildReport> {
        commands::build::run(self)
    }
}
