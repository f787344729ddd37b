//! Configuration module

mod site;

pub use site::{Author, AuthorDetails, SiteConfig, CONFIG_FILE, DEFAULT_AUTHOR, DEFAULT_PERMALINK};
