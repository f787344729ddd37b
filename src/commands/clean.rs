//! Clean the output directory

use std::fs;

use crate::error::{Error, Result};
use crate::Site;

/// Remove the output tree and recreate it empty
///
/// Refuses when the output directory is the source directory or one of its
/// ancestors.
pub fn run(site: &Site) -> Result<()> {
    let output_dir = &site.output_dir;

    if output_dir.exists() {
        let output = fs::canonicalize(output_dir)
            .map_err(|e| Error::io("failed to resolve", output_dir, e))?;
        let source = fs::canonicalize(&site.source_dir).unwrap_or_else(|_| site.source_dir.clone());
        if source.starts_with(&output) {
            return Err(Error::UnsafeOutput {
                path: output_dir.clone(),
            });
        }

        fs::remove_dir_all(output_dir).map_err(|e| Error::io("failed to remove", output_dir, e))?;
        tracing::info!("Deleted: {:?}", output_dir);
    }

    fs::create_dir_all(output_dir).map_err(|e| Error::io("failed to create", output_dir, e))?;

    Ok(())
}
