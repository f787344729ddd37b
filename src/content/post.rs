//! Post and Page models

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::url::{output_path, permalink_url};
use super::{FrontMatter, MarkdownRenderer};
use crate::config::{SiteConfig, DEFAULT_AUTHOR};
use crate::error::ParseError;

/// Characters of converted HTML kept in a generated excerpt
pub const EXCERPT_LENGTH: usize = 200;

/// Marker appended to a truncated excerpt
pub const EXCERPT_ELLIPSIS: &str = "...";

/// A blog post
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub title: String,

    /// Publication date
    pub date: NaiveDateTime,

    pub author: String,

    /// Post categories, also the home page tag set
    pub categories: Vec<String>,

    /// Layout template to use
    pub layout: String,

    /// Rendered HTML content
    pub content: String,

    pub excerpt: String,

    /// URL path computed from the permalink pattern
    pub url: String,

    /// File stem of the source file
    pub filename: String,

    /// Raw front matter for template access
    pub frontmatter: FrontMatter,

    /// Full source file path
    #[serde(skip)]
    pub source: PathBuf,

    /// Output file relative to the output root
    #[serde(skip)]
    pub output: PathBuf,
}

/// Date and title source recovered from a `YYYY-MM-DD-title` file stem
#[derive(Debug, Clone, PartialEq)]
pub struct FilenameParts {
    pub date: Option<NaiveDateTime>,
    pub title: String,
}

impl FilenameParts {
    /// Split a stem on `-`; four or more segments carry a date prefix
    pub fn parse(stem: &str) -> Self {
        let segments: Vec<&str> = stem.split('-').collect();
        if segments.len() < 4 {
            return Self {
                date: None,
                title: stem.to_string(),
            };
        }

        let date = NaiveDate::parse_from_str(&segments[..3].join("-"), "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0));

        Self {
            date,
            title: segments[3..].join("-"),
        }
    }
}

impl Post {
    /// Build a post from its source text
    ///
    /// Explicit front matter wins over anything derived from the filename or
    /// the config. `build_time` stands in for a date that is neither given
    /// nor derivable.
    pub fn build(
        path: &Path,
        text: &str,
        config: &SiteConfig,
        renderer: &MarkdownRenderer,
        build_time: NaiveDateTime,
    ) -> Result<Self, ParseError> {
        let filename = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let parts = FilenameParts::parse(&filename);

        let (fm, body) = FrontMatter::split(text)?;
        let content = renderer.render(body);

        let date = match fm.date("date")? {
            Some(date) => date,
            None => parts.date.unwrap_or_else(|| {
                tracing::warn!(
                    "No date for {:?}, using build time {}",
                    path,
                    build_time.format("%Y-%m-%d %H:%M:%S")
                );
                build_time
            }),
        };

        let title = fm
            .string("title")
            .unwrap_or_else(|| title_case(&parts.title.replace('-', " ")));

        let author = fm
            .string("author")
            .or_else(|| config.author_name().map(str::to_string))
            .unwrap_or_else(|| DEFAULT_AUTHOR.to_string());

        let excerpt = fm
            .string("excerpt")
            .unwrap_or_else(|| default_excerpt(&content));

        let url = permalink_url(&config.permalink, &date, &parts.title);
        let output = output_path(&url)?;

        Ok(Self {
            title,
            date,
            author,
            categories: fm.string_list("categories"),
            layout: fm.string("layout").unwrap_or_else(|| "post".to_string()),
            content,
            excerpt,
            url,
            filename,
            frontmatter: fm,
            source: path.to_path_buf(),
            output,
        })
    }
}

/// A standalone page
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    /// Rendered HTML content
    pub content: String,

    /// Layout template to use
    pub layout: String,

    pub frontmatter: FrontMatter,

    /// Full source file path
    #[serde(skip)]
    pub source: PathBuf,

    /// Output file relative to the output root
    #[serde(skip)]
    pub output: PathBuf,
}

impl Page {
    /// Build a page; `permalink` in front matter decides the output path,
    /// otherwise `<stem>.html`
    pub fn build(
        path: &Path,
        text: &str,
        renderer: &MarkdownRenderer,
        default_layout: &str,
    ) -> Result<Self, ParseError> {
        let (fm, body) = FrontMatter::split(text)?;
        let content = renderer.render(body);

        let output = match fm.string("permalink").filter(|p| !p.is_empty()) {
            Some(permalink) => output_path(&permalink)?,
            None => {
                let stem = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                PathBuf::from(format!("{}.html", stem))
            }
        };

        Ok(Self {
            content,
            layout: fm
                .string("layout")
                .unwrap_or_else(|| default_layout.to_string()),
            frontmatter: fm,
            source: path.to_path_buf(),
            output,
        })
    }
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest
pub fn title_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            result.push(c);
            in_word = false;
        }
    }
    result
}

/// First `EXCERPT_LENGTH` characters of the HTML, marked when cut
///
/// Counts characters, not markup, so a cut may land inside a tag.
pub fn default_excerpt(html: &str) -> String {
    match html.char_indices().nth(EXCERPT_LENGTH) {
        Some((idx, _)) => format!("{}{}", &html[..idx], EXCERPT_ELLIPSIS),
        None => html.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Author;
    use chrono::NaiveDate;

    fn build_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2030, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap()
    }

    fn build(name: &str, text: &str, config: &SiteConfig) -> Post {
        let renderer = MarkdownRenderer::new();
        Post::build(
            Path::new(&format!("_posts/{}", name)),
            text,
            config,
            &renderer,
            build_time(),
        )
        .unwrap()
    }

    #[test]
    fn test_filename_parts() {
        let parts = FilenameParts::parse("2024-03-07-hello-world");
        assert_eq!(
            parts.date,
            NaiveDate::from_ymd_opt(2024, 3, 7).unwrap().and_hms_opt(0, 0, 0)
        );
        assert_eq!(parts.title, "hello-world");

        let parts = FilenameParts::parse("about-me");
        assert_eq!(parts.date, None);
        assert_eq!(parts.title, "about-me");

        let parts = FilenameParts::parse("2024-13-40-bad-date");
        assert_eq!(parts.date, None);
        assert_eq!(parts.title, "bad-date");
    }

    #[test]
    fn test_derived_title_and_url() {
        let post = build("2024-03-07-hello-world.md", "Hi there.\n", &SiteConfig::default());
        assert_eq!(post.title, "Hello World");
        assert_eq!(post.url, "/2024/03/07/hello-world/");
        assert_eq!(post.output, Path::new("2024/03/07/hello-world/index.html"));
        assert_eq!(post.filename, "2024-03-07-hello-world");
        assert_eq!(post.layout, "post");
        assert_eq!(post.author, "unknown");
        assert!(post.categories.is_empty());
    }

    #[test]
    fn test_front_matter_date_drives_url() {
        let text = "---\ntitle: Custom\ndate: 2023-12-25\n---\nBody\n";
        let post = build("2024-03-07-hello-world.md", text, &SiteConfig::default());
        assert_eq!(post.title, "Custom");
        assert_eq!(post.url, "/2023/12/25/hello-world/");
        assert_eq!(post.date.format("%Y-%m-%d").to_string(), "2023-12-25");
    }

    #[test]
    fn test_offset_date_keeps_written_day() {
        let text = "---\ndate: 2024-03-07T23:30:00-08:00\n---\nx";
        let post = build("2024-03-07-hi.md", text, &SiteConfig::default());
        assert_eq!(post.url, "/2024/03/07/hi/");
        assert_eq!(
            post.date.format("%Y-%m-%d %H:%M:%S").to_string(),
            "2024-03-07 23:30:00"
        );
    }

    #[test]
    fn test_undated_filename_uses_build_time() {
        let post = build("draft-notes.md", "text", &SiteConfig::default());
        assert_eq!(post.date, build_time());
        assert_eq!(post.title, "Draft Notes");
        assert_eq!(post.url, "/2030/01/02/draft-notes/");
    }

    #[test]
    fn test_author_precedence() {
        let mut config = SiteConfig::default();
        config.author = Some(Author::Name("Site Author".to_string()));

        let post = build("2024-01-01-a-b.md", "x", &config);
        assert_eq!(post.author, "Site Author");

        let post = build("2024-01-01-a-b.md", "---\nauthor: Guest\n---\nx", &config);
        assert_eq!(post.author, "Guest");
    }

    #[test]
    fn test_excerpt_truncation() {
        let long = "a".repeat(300);
        let post = build("2024-01-01-long-post.md", &long, &SiteConfig::default());
        assert!(post.excerpt.ends_with(EXCERPT_ELLIPSIS));
        assert_eq!(post.excerpt.chars().count(), EXCERPT_LENGTH + EXCERPT_ELLIPSIS.len());

        let post = build("2024-01-01-short-post.md", "short", &SiteConfig::default());
        assert_eq!(post.excerpt, post.content);

        let post = build(
            "2024-01-01-explicit.md",
            "---\nexcerpt: Read me\n---\nbody",
            &SiteConfig::default(),
        );
        assert_eq!(post.excerpt, "Read me");
    }

    #[test]
    fn test_excerpt_counts_characters() {
        let html = "é".repeat(250);
        let excerpt = default_excerpt(&html);
        assert_eq!(excerpt, format!("{}...", "é".repeat(200)));
    }

    #[test]
    fn test_categories_and_layout() {
        let text = "---\ncategories: [rust, blog]\nlayout: feature\n---\n";
        let post = build("2024-01-01-cats.md", text, &SiteConfig::default());
        assert_eq!(post.categories, vec!["rust", "blog"]);
        assert_eq!(post.layout, "feature");
    }

    #[test]
    fn test_custom_permalink_pattern() {
        let config = SiteConfig {
            permalink: "/posts/:title.html".to_string(),
            ..SiteConfig::default()
        };
        let post = build("2024-01-01-plain.md", "x", &config);
        assert_eq!(post.url, "/posts/plain.html");
        assert_eq!(post.output, Path::new("posts/plain.html"));
    }

    #[test]
    fn test_bad_front_matter_fails() {
        let renderer = MarkdownRenderer::new();
        let result = Post::build(
            Path::new("_posts/2024-01-01-bad.md"),
            "---\ntitle: [oops\n---\nbody",
            &SiteConfig::default(),
            &renderer,
            build_time(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("hello world"), "Hello World");
        assert_eq!(title_case("rUST in 2024"), "Rust In 2024");
        assert_eq!(title_case("it's 2nd"), "It'S 2Nd");
    }

    #[test]
    fn test_page_output_paths() {
        let renderer = MarkdownRenderer::new();

        let page = Page::build(Path::new("about.md"), "About", &renderer, "page").unwrap();
        assert_eq!(page.output, Path::new("about.html"));
        assert_eq!(page.layout, "page");

        let page = Page::build(
            Path::new("about.md"),
            "---\npermalink: /about/\nlayout: wide\n---\nAbout",
            &renderer,
            "page",
        )
        .unwrap();
        assert_eq!(page.output, Path::new("about/index.html"));
        assert_eq!(page.layout, "wide");

        let page = Page::build(
            Path::new("feed.md"),
            "---\npermalink: /feed.xml\n---\n",
            &renderer,
            "page",
        )
        .unwrap();
        assert_eq!(page.output, Path::new("feed.xml"));
    }

    #[test]
    fn test_page_permalink_escape_rejected() {
        let renderer = MarkdownRenderer::new();
        let result = Page::build(
            Path::new("evil.md"),
            "---\npermalink: /../../outside/\n---\n",
            &renderer,
            "page",
        );
        assert!(matches!(result, Err(ParseError::InvalidPermalink(_))));
    }
}
