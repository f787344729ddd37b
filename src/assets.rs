//! Static asset and telemetry copying

use glob::Pattern;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Asset directory, copied as-is to the same name in the output
pub const ASSETS_DIR: &str = "assets";

/// Data files in the source root picked up for the live dashboards
pub const TELEMETRY_PATTERNS: &[&str] = &["telemetry.json", "metrics.json", "kpi.json"];

/// Copy `<source>/assets` to `<output>/assets`; returns the number of files
pub fn copy_assets(source_dir: &Path, output_dir: &Path) -> Result<usize> {
    let assets = source_dir.join(ASSETS_DIR);
    if !assets.is_dir() {
        return Ok(0);
    }
    copy_dir(&assets, &output_dir.join(ASSETS_DIR))
}

/// Copy telemetry files from the source root into the output root
pub fn copy_telemetry(source_dir: &Path, output_dir: &Path) -> Result<usize> {
    if !source_dir.is_dir() {
        return Ok(0);
    }

    let patterns: Vec<Pattern> = TELEMETRY_PATTERNS
        .iter()
        .filter_map(|p| Pattern::new(p).ok())
        .collect();

    let mut copied = 0;
    for entry in WalkDir::new(source_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| Error::io("failed to read", source_dir, e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if !patterns.iter().any(|p| p.matches(&name)) {
            continue;
        }

        let dest = output_dir.join(entry.file_name());
        fs::copy(entry.path(), &dest).map_err(|e| Error::io("failed to copy", entry.path(), e))?;
        tracing::debug!("Copied telemetry {:?}", dest);
        copied += 1;
    }

    Ok(copied)
}

/// Recursively copy a directory tree, creating directories as needed
pub fn copy_dir(from: &Path, to: &Path) -> Result<usize> {
    let mut copied = 0;

    for entry in WalkDir::new(from).follow_links(true) {
        let entry = entry.map_err(|e| Error::io("failed to read", from, e.into()))?;
        let relative = entry.path().strip_prefix(from).unwrap_or(entry.path());
        let dest = to.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest)
                .map_err(|e| Error::io("failed to create directory", &dest, e))?;
        } else {
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)
                    .map_err(|e| Error::io("failed to create directory", parent, e))?;
            }
            fs::copy(entry.path(), &dest)
                .map_err(|e| Error::io("failed to copy", entry.path(), e))?;
            copied += 1;
        }
    }

    tracing::debug!("Copied {} files from {:?} to {:?}", copied, from, to);
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_copy_assets_tree() {
        let source = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let css = source.path().join("assets/css");
        fs::create_dir_all(&css).unwrap();
        fs::write(css.join("site.css"), "body {}").unwrap();
        fs::write(source.path().join("assets/logo.svg"), "<svg/>").unwrap();

        let copied = copy_assets(source.path(), output.path()).unwrap();
        assert_eq!(copied, 2);
        assert_eq!(
            fs::read_to_string(output.path().join("assets/css/site.css")).unwrap(),
            "body {}"
        );
        assert!(output.path().join("assets/logo.svg").is_file());
    }

    #[test]
    fn test_missing_assets_is_noop() {
        let source = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        assert_eq!(copy_assets(source.path(), output.path()).unwrap(), 0);
        assert!(!output.path().join(ASSETS_DIR).exists());
    }

    #[test]
    fn test_copy_telemetry_only_known_names() {
        let source = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        fs::write(source.path().join("metrics.json"), "{}").unwrap();
        fs::write(source.path().join("kpi.json"), "[]").unwrap();
        fs::write(source.path().join("other.json"), "{}").unwrap();

        assert_eq!(copy_telemetry(source.path(), output.path()).unwrap(), 2);
        assert!(output.path().join("metrics.json").is_file());
        assert!(output.path().join("kpi.json").is_file());
        assert!(!output.path().join("other.json").exists());
        assert!(!output.path().join("telemetry.json").exists());
    }
}
