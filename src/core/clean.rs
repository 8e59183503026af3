//! Build artifact removal.
//!
//! Deletes the dist/cache residue the packaging tools leave behind.
//! Removal is idempotent: patterns that match nothing are not an error,
//! so `clean` can run on an already-clean tree.

use glob::glob;
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    File,
    Directory,
}

/// One filesystem entry removed (or slated for removal in dry-run).
#[derive(Debug, Clone, Serialize)]
pub struct RemovedArtifact {
    pub path: String,
    pub kind: ArtifactKind,
}

#[derive(Debug, Clone, Serialize)]
pub struct CleanSummary {
    pub removed: usize,
    pub patterns: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CleanResult {
    pub root: String,
    pub dry_run: bool,
    pub summary: CleanSummary,
    pub removed: Vec<RemovedArtifact>,
}

/// Remove everything matching the artifact patterns under `root`.
pub fn clean(root: &Path, patterns: &[String], dry_run: bool) -> Result<CleanResult> {
    let mut removed = Vec::new();

    for pattern in patterns {
        let full_pattern = root.join(pattern).display().to_string();
        let matches = glob(&full_pattern).map_err(|e| {
            Error::validation_invalid_argument(
                "clean.paths",
                format!("Invalid glob pattern: {}", e),
                Some(pattern.clone()),
                None,
            )
        })?;

        for entry in matches.flatten() {
            if !entry.exists() {
                // Already gone, e.g. a file inside a directory an
                // earlier pattern removed.
                continue;
            }

            let kind = if entry.is_dir() {
                ArtifactKind::Directory
            } else {
                ArtifactKind::File
            };

            if !dry_run {
                let result = match kind {
                    ArtifactKind::Directory => fs::remove_dir_all(&entry),
                    ArtifactKind::File => fs::remove_file(&entry),
                };
                result.map_err(|e| {
                    Error::internal_io(
                        e.to_string(),
                        Some(format!("remove {}", entry.display())),
                    )
                })?;
            }

            let display = entry
                .strip_prefix(root)
                .unwrap_or(&entry)
                .display()
                .to_string();
            removed.push(RemovedArtifact { path: display, kind });
        }
    }

    Ok(CleanResult {
        root: root.display().to_string(),
        dry_run,
        summary: CleanSummary {
            removed: removed.len(),
            patterns: patterns.len(),
        },
        removed,
    })
}
