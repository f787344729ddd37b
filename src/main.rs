//! CLI entry point for sunshine-ssg

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sunshine-ssg")]
#[command(version)]
#[command(about = "Build the blog into a static HTML site", long_about = None)]
struct Cli {
    /// Source directory
    #[arg(short, long, default_value = ".")]
    source: PathBuf,

    /// Output directory (replaced on every build)
    #[arg(short, long, default_value = sunshine_ssg::DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "sunshine_ssg=debug,info"
    } else {
        "sunshine_ssg=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let site = sunshine_ssg::Site::new(&cli.source, &cli.output);
    let report = site
        .build()
        .with_context(|| format!("Build of {:?} failed", cli.source))?;

    for failure in &report.failures {
        eprintln!("Skipped: {}", failure);
    }
    println!(
        "Built {} posts and {} pages into {:?}",
        report.posts, report.pages, cli.output
    );

    Ok(())
}
