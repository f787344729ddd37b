//! Build the static site

use chrono::{Local, NaiveDateTime};

use crate::assets;
use crate::content::{ContentLoader, MarkdownRenderer};
use crate::error::{Error, Result};
use crate::generator::Generator;
use crate::templates::TemplateRenderer;
use crate::Site;

/// Outcome of a successful build
#[derive(Debug, Default)]
pub struct BuildReport {
    pub posts: usize,
    pub pages: usize,
    pub assets: usize,
    pub telemetry: usize,
    /// Content files that were skipped
    pub failures: Vec<Error>,
}

/// Build the site, timestamping undated posts with the current time
pub fn run(site: &Site) -> Result<BuildReport> {
    run_at(site, Local::now().naive_local())
}

/// Build the site with an explicit build timestamp
///
/// Stages run strictly in order: clean, load config, load posts, render the
/// home page, pages and posts, then copy assets and telemetry. Content files
/// that fail to parse are skipped and reported; everything else aborts.
pub fn run_at(site: &Site, build_time: NaiveDateTime) -> Result<BuildReport> {
    let start = std::time::Instant::now();
    tracing::info!("Building {:?} into {:?}", site.source_dir, site.output_dir);

    site.clean()?;

    let config = site.load_config()?;

    let markdown = MarkdownRenderer::new();
    let loader = ContentLoader::new(&config, &markdown, build_time);
    let posts = loader.load_posts(&site.posts_dir());
    tracing::info!("Loaded {} posts", posts.items.len());
    let mut failures = posts.failures;
    let posts = posts.items;

    let templates = TemplateRenderer::load(&site.templates_dir(), &config.baseurl)?;
    let generator = Generator::new(&config, &posts, &templates, &site.output_dir)?;

    let index = loader.load_index(&site.source_dir).unwrap_or_else(|e| {
        tracing::warn!("Rendering home page without index content: {}", e);
        failures.push(e);
        None
    });
    generator.generate_index(&posts, index.as_ref())?;

    let pages = loader.load_pages(&site.source_dir);
    failures.extend(pages.failures);
    let page_count = generator.generate_pages(&pages.items)?;
    tracing::info!("Rendered {} pages", page_count);

    let post_count = generator.generate_posts(&posts)?;
    tracing::info!("Rendered {} posts", post_count);

    let asset_count = assets::copy_assets(&site.source_dir, &site.output_dir)?;
    let telemetry_count = assets::copy_telemetry(&site.source_dir, &site.output_dir)?;
    tracing::info!(
        "Copied {} assets and {} telemetry files",
        asset_count,
        telemetry_count
    );

    if !failures.is_empty() {
        tracing::warn!("Skipped {} content files", failures.len());
    }
    tracing::info!(
        "Site built in {:?} ({:.2}s)",
        site.output_dir,
        start.elapsed().as_secs_f64()
    );

    Ok(BuildReport {
        posts: post_count,
        pages: page_count,
        assets: asset_count,
        telemetry: telemetry_count,
        failures,
    })
}
