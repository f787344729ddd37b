//! Site templates loaded from the source `templates/` directory into Tera
//!
//! Templates are addressed by their path relative to the directory
//! (`post.html`, `partials/head.html`). HTML templates are autoescaped, so
//! converted content has to be emitted with `| safe`.

use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tera::{Context, Tera};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Template renderer for the site's layouts
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Load every file under `dir`; a missing directory loads nothing
    pub fn load(dir: &Path, baseurl: &str) -> Result<Self> {
        let mut files = Vec::new();

        if dir.is_dir() {
            for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
                let entry = entry.map_err(|e| Error::io("reading templates in", dir, e.into()))?;
                if !entry.file_type().is_file() {
                    continue;
                }

                let relative = entry.path().strip_prefix(dir).unwrap_or(entry.path());
                let name = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                files.push((entry.path().to_path_buf(), Some(name)));
            }
        } else {
            tracing::warn!("Template directory {:?} not found", dir);
        }

        let mut tera = Tera::default();
        tera.add_template_files(files)
            .map_err(|source| Error::TemplateLoad {
                path: dir.to_path_buf(),
                source,
            })?;
        tera.register_filter(
            "relative_url",
            RelativeUrl {
                baseurl: baseurl.to_string(),
            },
        );

        tracing::debug!("Loaded {} templates from {:?}", tera.get_template_names().count(), dir);

        Ok(Self { tera })
    }

    /// Build a renderer from in-memory templates
    pub fn from_raw(templates: &[(&str, &str)], baseurl: &str) -> tera::Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(templates.to_vec())?;
        tera.register_filter(
            "relative_url",
            RelativeUrl {
                baseurl: baseurl.to_string(),
            },
        );
        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> tera::Result<String> {
        self.tera.render(template_name, context)
    }

    #[cfg(test)]
    fn has_template(&self, template_name: &str) -> bool {
        self.tera.get_template_names().any(|name| name == template_name)
    }
}

/// Prefix a site path with `baseurl`
///
/// # Examples
/// ```ignore
/// relative_url("/blog", "/about/") // -> "/blog/about/"
/// relative_url("/blog", "css/site.css") // -> "/blog/css/site.css"
/// ```
pub fn relative_url(baseurl: &str, url: &str) -> String {
    if url.starts_with('/') {
        format!("{}{}", baseurl, url)
    } else {
        format!("{}/{}", baseurl, url)
    }
}

/// Tera filter: `{{ "/about/" | relative_url }}`
///
/// Output is marked safe so slashes survive autoescaping; markup characters
/// are still escaped.
struct RelativeUrl {
    baseurl: String,
}

impl tera::Filter for RelativeUrl {
    fn filter(&self, value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
        let url = tera::try_get_value!("relative_url", "value", String, value);
        Ok(Value::String(escape_attribute(&relative_url(
            &self.baseurl,
            &url,
        ))))
    }

    fn is_safe(&self) -> bool {
        true
    }
}

fn escape_attribute(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
