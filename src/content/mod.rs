//! Content module - handles posts, pages, and content processing

mod frontmatter;
pub mod loader;
mod markdown;
mod post;
pub mod url;

pub use frontmatter::{parse_date_string, FrontMatter, SEPARATOR};
pub use loader::{Collection, ContentLoader};
pub use markdown::MarkdownRenderer;
pub use post::{default_excerpt, title_case, FilenameParts, Page, Post};
