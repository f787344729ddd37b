//! Generator module - renders the home page, pages and posts through the
//! site templates and writes them under the output directory

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tera::Context;

use crate::config::SiteConfig;
use crate::content::url::INDEX_FILE;
use crate::content::{Page, Post};
use crate::error::{Error, Result};
use crate::templates::TemplateRenderer;

/// Number of posts listed on the home page
pub const MAX_RECENT_POSTS: usize = 5;

/// Renders templates into the output tree
pub struct Generator<'a> {
    renderer: &'a TemplateRenderer,
    output_dir: &'a Path,
    base_context: Context,
}

impl<'a> Generator<'a> {
    /// Create a generator; every render sees `site` and the full `posts` list
    pub fn new(
        config: &SiteConfig,
        posts: &[Post],
        renderer: &'a TemplateRenderer,
        output_dir: &'a Path,
    ) -> Result<Self> {
        let mut base_context = Context::new();
        base_context
            .try_insert("site", config)
            .map_err(|source| Error::Context { key: "site", source })?;
        base_context
            .try_insert("posts", posts)
            .map_err(|source| Error::Context { key: "posts", source })?;

        Ok(Self {
            renderer,
            output_dir,
            base_context,
        })
    }

    /// Render `index.html` with the most recent posts and the tag set
    pub fn generate_index(&self, posts: &[Post], index: Option<&Page>) -> Result<PathBuf> {
        let context = self.context_with(|context| {
            context.try_insert("content", index.map(|p| p.content.as_str()).unwrap_or(""))?;
            match index {
                Some(page) => context.try_insert("page", &page.frontmatter)?,
                None => context.try_insert("page", &serde_json::Map::new())?,
            }
            context.try_insert("recent_posts", recent_posts(posts))?;
            context.try_insert("all_tags", &collect_tags(posts))?;
            context.try_insert("max_posts", &MAX_RECENT_POSTS)
        });

        let layout = index.map(|p| p.layout.as_str()).unwrap_or("index");
        self.render_to(&template_name(layout), context, Path::new(INDEX_FILE))
    }

    /// Render standalone pages
    pub fn generate_pages(&self, pages: &[Page]) -> Result<usize> {
        for page in pages {
            let context = self.context_with(|context| {
                context.try_insert("content", &page.content)?;
                context.try_insert("page", &page.frontmatter)
            });

            self.render_to(&template_name(&page.layout), context, &page.output)?;
        }

        Ok(pages.len())
    }

    /// Render individual post pages
    pub fn generate_posts(&self, posts: &[Post]) -> Result<usize> {
        for post in posts {
            let context = self.context_with(|context| {
                context.try_insert("content", &post.content)?;
                context.try_insert("page", post)?;
                context.try_insert("post", post)
            });

            self.render_to(&template_name(&post.layout), context, &post.output)?;
        }

        Ok(posts.len())
    }

    /// Base context extended with render-specific values
    fn context_with(
        &self,
        extend: impl FnOnce(&mut Context) -> tera::Result<()>,
    ) -> tera::Result<Context> {
        let mut context = self.base_context.clone();
        extend(&mut context)?;
        Ok(context)
    }

    fn render_to(
        &self,
        template: &str,
        context: tera::Result<Context>,
        relative: &Path,
    ) -> Result<PathBuf> {
        let output_path = self.output_dir.join(relative);

        let html = context
            .and_then(|context| self.renderer.render(template, &context))
            .map_err(|source| Error::Template {
                name: template.to_string(),
                target: output_path.clone(),
                source,
            })?;

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::io("failed to create directory", parent, e))?;
        }
        fs::write(&output_path, html)
            .map_err(|e| Error::io("failed to write", &output_path, e))?;
        tracing::debug!("Generated {:?} with {}", output_path, template);

        Ok(output_path)
    }
}

/// Template file for a layout name
pub fn template_name(layout: &str) -> String {
    format!("{}.html", layout)
}

/// The newest posts shown on the home page
pub fn recent_posts(posts: &[Post]) -> &[Post] {
    &posts[..posts.len().min(MAX_RECENT_POSTS)]
}

/// Sorted, deduplicated union of every post's categories
pub fn collect_tags(posts: &[Post]) -> Vec<String> {
    posts
        .iter()
        .flat_map(|p| p.categories.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::MarkdownRenderer;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn post(name: &str, front_matter: &str) -> Post {
        let renderer = MarkdownRenderer::new();
        let build_time = NaiveDate::from_ymd_opt(2030, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        Post::build(
            Path::new(name),
            &format!("---\n{}---\nBody of {}\n", front_matter, name),
            &SiteConfig::default(),
            &renderer,
            build_time,
        )
        .unwrap()
    }

    fn templates() -> TemplateRenderer {
        TemplateRenderer::from_raw(
            &[
                (
                    "index.html",
                    "{% for p in recent_posts %}{{ p.title }};{% endfor %}|{{ all_tags | join(sep=\",\") }}|{{ content | safe }}",
                ),
                ("page.html", "{{ page.title }}:{{ content | safe }}"),
                ("post.html", "{{ post.title }}@{{ post.url | safe }} of {{ posts | length }}"),
            ],
            "",
        )
        .unwrap()
    }

    #[test]
    fn test_collect_tags() {
        let posts = vec![
            post("2024-01-02-one.md", "categories: [a, b]\n"),
            post("2024-01-01-two.md", "categories: b\n"),
        ];
        assert_eq!(collect_tags(&posts), vec!["a", "b"]);
    }

    #[test]
    fn test_recent_posts_limit() {
        let posts: Vec<Post> = (1..=7)
            .map(|d| post(&format!("2024-01-0{}-p.md", d), ""))
            .collect();
        assert_eq!(recent_posts(&posts).len(), MAX_RECENT_POSTS);
        assert_eq!(recent_posts(&posts[..3]).len(), 3);
    }

    #[test]
    fn test_generate_index_and_posts() {
        let out = TempDir::new().unwrap();
        let config = SiteConfig::default();
        let renderer = templates();
        let posts = vec![
            post("2024-02-01-second.md", "categories: [rust]\n"),
            post("2024-01-01-first.md", "categories: [blog, rust]\n"),
        ];
        let generator = Generator::new(&config, &posts, &renderer, out.path()).unwrap();

        let index = generator.generate_index(&posts, None).unwrap();
        assert_eq!(
            fs::read_to_string(index).unwrap(),
            "Second;First;|blog,rust|"
        );

        assert_eq!(generator.generate_posts(&posts).unwrap(), 2);
        let written = out.path().join("2024/02/01/second/index.html");
        assert_eq!(
            fs::read_to_string(written).unwrap(),
            "Second@/2024/02/01/second/ of 2"
        );
    }

    #[test]
    fn test_generate_pages() {
        let out = TempDir::new().unwrap();
        let config = SiteConfig::default();
        let renderer = templates();
        let markdown = MarkdownRenderer::new();
        let page = Page::build(
            Path::new("about.md"),
            "---\ntitle: About\npermalink: /about/\n---\nHello\n",
            &markdown,
            "page",
        )
        .unwrap();
        let generator = Generator::new(&config, &[], &renderer, out.path()).unwrap();

        generator.generate_pages(&[page]).unwrap();
        let html = fs::read_to_string(out.path().join("about/index.html")).unwrap();
        assert!(html.starts_with("About:<p>Hello</p>"));
    }

    #[test]
    fn test_missing_layout_is_template_error() {
        let out = TempDir::new().unwrap();
        let config = SiteConfig::default();
        let renderer = templates();
        let posts = vec![post("2024-01-01-odd.md", "layout: gallery\n")];
        let generator = Generator::new(&config, &posts, &renderer, out.path()).unwrap();

        let err = generator.generate_posts(&posts).unwrap_err();
        assert!(matches!(err, Error::Template { ref name, .. } if name == "gallery.html"));
    }
}
