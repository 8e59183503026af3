use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::utils::{command, io};

/// Accepted version tokens: dotted numeric core with an optional
/// trailing qualifier (`0.24`, `1.0rc1`, `2.0.0+local`). Not semver;
/// two-component versions are first-class. The qualifier must open
/// with a letter or `+` so a dangling separator (`1.`, `1-`) or a
/// doubled dot (`1..2`) never validates.
const VERSION_TOKEN: &str = r"^[0-9]+(\.[0-9]+)*([a-zA-Z+][a-zA-Z0-9.+-]*)?$";

/// Normalize a raw version string: trim, drop a leading `v` tag prefix,
/// and validate the remaining token.
pub fn normalize(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::version_invalid(raw, "Version is empty"));
    }

    let token = trimmed.strip_prefix('v').unwrap_or(trimmed);

    let pattern = Regex::new(VERSION_TOKEN).expect("Invalid regex pattern");
    if !pattern.is_match(token) {
        return Err(Error::version_invalid(
            raw,
            "Expected a dotted numeric version like 0.24 or 1.0rc1",
        ));
    }

    Ok(token.to_string())
}

/// Most recent tag reachable from HEAD, or None outside a repo or
/// before the first tag.
pub fn latest_tag(root: &Path) -> Option<String> {
    command::run_in_optional(
        &root.display().to_string(),
        "git",
        &["describe", "--tags", "--abbrev=0"],
    )
}

/// Resolve the version to stamp: an explicit override wins, otherwise
/// the latest reachable tag.
pub fn resolve(root: &Path, set: Option<&str>) -> Result<String> {
    if let Some(explicit) = set {
        return normalize(explicit);
    }

    match latest_tag(root) {
        Some(tag) => normalize(&tag),
        None => Err(Error::version_tag_missing(root.display().to_string())),
    }
}

/// The single line written to the version file.
pub fn stamp_line(version: &str) -> String {
    format!("__version__ = '{}'\n", version)
}

/// Read the version currently stamped in a file, if any.
pub fn read_stamped(path: &Path) -> Option<String> {
    let content = io::read_file(path, "read version file").ok()?;
    let pattern = Regex::new(r"__version__\s*=\s*'([^']*)'").expect("Invalid regex pattern");
    pattern
        .captures(&content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[derive(Debug, Clone, Serialize)]
pub struct StampInfo {
    pub file: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
}

/// Overwrite the version file with a single version assignment.
///
/// The file must already exist; stamping never creates it, so a typo in
/// the manifest fails loudly instead of leaving a stray file behind.
pub fn stamp(root: &Path, version_file: &str, version: &str) -> Result<StampInfo> {
    let path = version_file_path(root, version_file);
    if !path.exists() {
        return Err(Error::version_file_missing(path.display().to_string()));
    }

    let previous = read_stamped(&path);
    io::write_file_atomic(&path, &stamp_line(version), "write version file")?;

    Ok(StampInfo {
        file: path.display().to_string(),
        version: version.to_string(),
        previous,
    })
}

pub fn version_file_path(root: &Path, version_file: &str) -> PathBuf {
    root.join(version_file)
}
