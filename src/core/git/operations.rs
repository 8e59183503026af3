use serde::Serialize;
use std::path::Path;

use crate::error::{Error, Result};

use super::execute_git;

/// Outcome of a single `git push <remote>`.
#[derive(Debug, Clone, Serialize)]
pub struct PushOutcome {
    pub remote: String,
    pub success: bool,
    pub exit_code: i32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stdout: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stderr: String,
}

impl PushOutcome {
    fn from_output(remote: &str, output: std::process::Output) -> Self {
        Self {
            remote: remote.to_string(),
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

/// Push the current branch to one remote, unconditionally.
pub fn push_remote(path: &Path, remote: &str) -> Result<PushOutcome> {
    let output = execute_git(&path.to_string_lossy(), &["push", remote])
        .map_err(|e| Error::git_command_failed(e.to_string()))?;
    Ok(PushOutcome::from_output(remote, output))
}

/// Push to each remote in order, stopping at the first failure.
///
/// Later remotes are not attempted once one fails, so a rejected push
/// to the primary never half-mirrors the rest.
pub fn push_sequence(path: &Path, remotes: &[String]) -> Result<Vec<PushOutcome>> {
    if remotes.is_empty() {
        return Err(Error::manifest_invalid(
            "push.remotes",
            "At least one remote is required",
        ));
    }

    let mut outcomes = Vec::with_capacity(remotes.len());

    for remote in remotes {
        let outcome = push_remote(path, remote)?;
        if !outcome.success {
            let detail = if outcome.stderr.trim().is_empty() {
                outcome.stdout.trim().to_string()
            } else {
                outcome.stderr.trim().to_string()
            };
            return Err(Error::git_command_failed(format!(
                "git push {} failed: {}",
                remote, detail
            )));
        }
        outcomes.push(outcome);
    }

    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::process::Command;
    use tempfile::TempDir;

    fn git(path: &Path, args: &[&str]) {
        let output = Command::new("git")
            .args(args)
            .current_dir(path)
            .output()
            .expect("Failed to run git");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }

    fn repo_with_commit(dir: &Path) {
        git(dir, &["init", "--quiet", "--initial-branch=main"]);
        git(dir, &["config", "user.email", "test@test.com"]);
        git(dir, &["config", "user.name", "Test User"]);
        fs::write(dir.join("file.txt"), "content").expect("Failed to write file");
        git(dir, &["add", "."]);
        git(dir, &["commit", "-m", "Initial commit", "--quiet"]);
    }

    #[test]
    fn push_sequence_pushes_remotes_in_order() {
        let work = TempDir::new().expect("Failed to create temp dir");
        let upstream_a = TempDir::new().expect("Failed to create temp dir");
        let upstream_b = TempDir::new().expect("Failed to create temp dir");

        git(upstream_a.path(), &["init", "--bare", "--quiet"]);
        git(upstream_b.path(), &["init", "--bare", "--quiet"]);

        repo_with_commit(work.path());
        git(
            work.path(),
            &["remote", "add", "origin", &upstream_a.path().to_string_lossy()],
        );
        git(
            work.path(),
            &["remote", "add", "github", &upstream_b.path().to_string_lossy()],
        );
        git(work.path(), &["push", "--quiet", "-u", "origin", "main"]);

        let remotes = vec!["origin".to_string(), "github".to_string()];
        let outcomes = push_sequence(work.path(), &remotes).expect("push failed");

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].remote, "origin");
        assert_eq!(outcomes[1].remote, "github");
        assert!(outcomes.iter().all(|o| o.success));
    }

    #[test]
    fn push_sequence_stops_at_first_failure() {
        let work = TempDir::new().expect("Failed to create temp dir");
        let upstream = TempDir::new().expect("Failed to create temp dir");

        git(upstream.path(), &["init", "--bare", "--quiet"]);

        repo_with_commit(work.path());
        git(
            work.path(),
            &["remote", "add", "origin", &upstream.path().to_string_lossy()],
        );
        git(work.path(), &["push", "--quiet", "-u", "origin", "main"]);

        // A second commit that origin must never receive: the broken
        // remote comes first and aborts the sequence.
        fs::write(work.path().join("extra.txt"), "more").expect("Failed to write file");
        git(work.path(), &["add", "."]);
        git(work.path(), &["commit", "-m", "Second commit", "--quiet"]);

        let remotes = vec!["missing".to_string(), "origin".to_string()];
        let err = push_sequence(work.path(), &remotes).unwrap_err();
        assert_eq!(err.code.as_str(), "git.command_failed");
        assert!(err.message.contains("missing"));

        let count = Command::new("git")
            .args(["rev-list", "--count", "--all"])
            .current_dir(upstream.path())
            .output()
            .unwrap();
        assert_eq!(String::from_utf8_lossy(&count.stdout).trim(), "1");
    }

    #[test]
    fn push_sequence_rejects_empty_remote_list() {
        let work = TempDir::new().expect("Failed to create temp dir");
        repo_with_commit(work.path());

        let err = push_sequence(work.path(), &[]).unwrap_err();
        assert_eq!(err.code.as_str(), "manifest.invalid");
        assert_eq!(err.details["path"], "push.remotes");
    }

    #[test]
    fn push_remote_reports_failure_without_error() {
        let work = TempDir::new().expect("Failed to create temp dir");
        repo_with_commit(work.path());

        let outcome = push_remote(work.path(), "nonexistent").expect("spawn failed");
        assert!(!outcome.success);
        assert_ne!(outcome.exit_code, 0);
    }

    #[test]
    fn is_workdir_clean_detects_untracked_files() {
        let work = TempDir::new().expect("Failed to create temp dir");
        repo_with_commit(work.path());
        assert!(super::super::is_workdir_clean(work.path()));

        fs::write(work.path().join("untracked.txt"), "content").expect("Failed to write file");
        assert!(!super::super::is_workdir_clean(work.path()));
    }

    #[test]
    fn origin_url_reads_configured_remote() {
        let work = TempDir::new().expect("Failed to create temp dir");
        repo_with_commit(work.path());
        assert_eq!(super::super::origin_url(work.path()), None);

        git(
            work.path(),
            &["remote", "add", "origin", "git@github.com:acme/widget.git"],
        );
        assert_eq!(
            super::super::origin_url(work.path()).as_deref(),
            Some("git@github.com:acme/widget.git")
        );
    }
}
