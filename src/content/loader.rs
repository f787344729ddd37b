//! Content loader - loads posts and pages from source directory

use chrono::NaiveDateTime;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{MarkdownRenderer, Page, Post};
use crate::config::SiteConfig;
use crate::error::{Error, ParseError, Result};

/// Source file of the home page, rendered separately from other pages
pub const INDEX_SOURCE: &str = "index.md";

/// Items that loaded, plus the files that were skipped and why
#[derive(Debug)]
pub struct Collection<T> {
    pub items: Vec<T>,
    pub failures: Vec<Error>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            failures: Vec::new(),
        }
    }
}

/// Loads content from the source directory
pub struct ContentLoader<'a> {
    config: &'a SiteConfig,
    renderer: &'a MarkdownRenderer,
    build_time: NaiveDateTime,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(
        config: &'a SiteConfig,
        renderer: &'a MarkdownRenderer,
        build_time: NaiveDateTime,
    ) -> Self {
        Self {
            config,
            renderer,
            build_time,
        }
    }

    /// Load all posts from a posts directory, newest first
    ///
    /// A file that fails to load is recorded and skipped; a missing
    /// directory yields an empty collection.
    pub fn load_posts(&self, posts_dir: &Path) -> Collection<Post> {
        let mut collection = Collection::default();

        for path in markdown_files(posts_dir) {
            match self.load_post(&path) {
                Ok(post) => collection.items.push(post),
                Err(e) => {
                    tracing::warn!("Skipping post: {}", e);
                    collection.failures.push(e);
                }
            }
        }

        // Stable sort: equal dates keep discovery order
        collection.items.sort_by(|a, b| b.date.cmp(&a.date));

        collection
    }

    /// Load a single post from a file
    pub fn load_post(&self, path: &Path) -> Result<Post> {
        read_source(path)
            .and_then(|text| {
                Post::build(path, &text, self.config, self.renderer, self.build_time)
            })
            .map_err(|source| Error::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Load the standalone pages at the top of the source directory,
    /// excluding the home page source
    pub fn load_pages(&self, source_dir: &Path) -> Collection<Page> {
        let mut collection = Collection::default();

        for path in markdown_files(source_dir) {
            if path.file_name().is_some_and(|name| name == INDEX_SOURCE) {
                continue;
            }

            match self.load_page(&path, "page") {
                Ok(page) => collection.items.push(page),
                Err(e) => {
                    tracing::warn!("Skipping page: {}", e);
                    collection.failures.push(e);
                }
            }
        }

        collection
    }

    /// Load `index.md` if it exists
    pub fn load_index(&self, source_dir: &Path) -> Result<Option<Page>> {
        let path = source_dir.join(INDEX_SOURCE);
        if !path.is_file() {
            return Ok(None);
        }
        self.load_page(&path, "index").map(Some)
    }

    /// Load a single page from a file
    pub fn load_page(&self, path: &Path, default_layout: &str) -> Result<Page> {
        read_source(path)
            .and_then(|text| Page::build(path, &text, self.renderer, default_layout))
            .map_err(|source| Error::Parse {
                path: path.to_path_buf(),
                source,
            })
    }
}

/// Read a content file with line endings normalized to `\n`
fn read_source(path: &Path) -> std::result::Result<String, ParseError> {
    let content = fs::read_to_string(path)?;
    if content.contains('\r') {
        Ok(content.replace("\r\n", "\n"))
    } else {
        Ok(content)
    }
}

/// Markdown files directly inside `dir`, in file-name order
///
/// Dotfiles are skipped. A missing directory has no files.
pub fn markdown_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }

    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Cannot read entry in {:?}: {}", dir, e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_markdown_file(path) && !is_hidden(path))
        .collect()
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "md")
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}
