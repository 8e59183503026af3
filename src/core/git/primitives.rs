use std::path::Path;
use std::process::Command;

use crate::error::{Error, Result};
use crate::utils::command;

/// Clone a git repository to a target directory.
pub fn clone_repo(url: &str, target_dir: &Path) -> Result<()> {
    command::run(
        "git",
        &["clone", url, &target_dir.to_string_lossy()],
        "git clone",
    )
    .map_err(|e| Error::git_command_failed(e.to_string()))?;
    Ok(())
}

/// URL of the `origin` remote, or None when there is no origin.
pub fn origin_url(path: &Path) -> Option<String> {
    command::run_in_optional(
        &path.to_string_lossy(),
        "git",
        &["remote", "get-url", "origin"],
    )
}

/// Name of the currently checked-out branch.
pub fn current_branch(path: &Path) -> Option<String> {
    command::run_in_optional(
        &path.to_string_lossy(),
        "git",
        &["rev-parse", "--abbrev-ref", "HEAD"],
    )
}

/// Check if a git working directory has no uncommitted changes.
///
/// Uses direct Command execution to properly handle empty output (clean repo).
/// `run_in_optional` returns None for empty stdout, which would incorrectly
/// indicate a dirty repo when used with `.unwrap_or(false)`.
pub fn is_workdir_clean(path: &Path) -> bool {
    let output = Command::new("git")
        .args(["status", "--porcelain"])
        .current_dir(path)
        .output();

    match output {
        Ok(o) if o.status.success() => o.stdout.is_empty(),
        _ => false, // Command failed = assume not clean (conservative)
    }
}

pub fn is_git_repo(path: &Path) -> bool {
    command::succeeded_in(
        &path.to_string_lossy(),
        "git",
        &["rev-parse", "--git-dir"],
    )
}
