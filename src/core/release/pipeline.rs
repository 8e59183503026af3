use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::executor;
use crate::manifest::Manifest;
use crate::shell;
use crate::version;

use super::types::{
    ReleaseArtifact, ReleaseOptions, ReleasePlan, ReleasePlanStep, ReleaseRun, ReleaseStepResult,
    ReleaseStepStatus,
};

/// Plan a release without executing anything.
///
/// Version resolution runs here so a missing tag or a bad --set value
/// fails before any step does.
pub fn plan(root: &Path, manifest: &Manifest, options: &ReleaseOptions) -> Result<ReleasePlan> {
    let version = version::resolve(root, options.set_version.as_deref())?;
    let steps = build_steps(manifest, &version, options)?;

    let mut hints = Vec::new();
    if options.no_upload {
        hints.push("Upload skipped (--no-upload)".to_string());
    }
    if options.dry_run {
        hints.push("Dry run: no changes will be made".to_string());
    }

    Ok(ReleasePlan {
        version,
        steps,
        hints,
    })
}

/// Execute a release by computing the plan and executing it.
/// What you preview (dry-run) is what you execute.
pub fn run(root: &Path, manifest: &Manifest, options: &ReleaseOptions) -> Result<ReleaseRun> {
    let release_plan = plan(root, manifest, options)?;
    let version = release_plan.version.clone();

    if options.dry_run {
        let steps = release_plan
            .steps
            .into_iter()
            .map(|step| ReleaseStepResult {
                id: step.id,
                label: step.label,
                command: step.command,
                status: ReleaseStepStatus::Skipped,
            })
            .collect();

        return Ok(ReleaseRun {
            version,
            previous_version: None,
            dry_run: true,
            steps,
            artifacts: Vec::new(),
        });
    }

    let mut steps = Vec::new();
    let mut previous_version = None;

    for step in &release_plan.steps {
        match step.id.as_str() {
            "version" => {
                log_status!("release", "Stamping version {}", version);
                let info = version::stamp(root, &manifest.project.version_file, &version)?;
                previous_version = info.previous;
            }
            "dist.clean" => {
                remove_dist(root, &manifest.release.dist_dir)?;
            }
            "build" => {
                log_status!("release", "Building distribution");
                executor::run_tool(root, &manifest.release.build)?.into_result()?;
            }
            "upload" => {
                log_status!("release", "Uploading distribution");
                let argv = upload_argv(root, manifest)?;
                executor::run_tool(root, &argv)?.into_result()?;
            }
            _ => {}
        }

        steps.push(ReleaseStepResult {
            id: step.id.clone(),
            label: step.label.clone(),
            command: step.command.clone(),
            status: ReleaseStepStatus::Completed,
        });
    }

    let artifacts = scan_artifacts(root, &manifest.release.dist_dir)?;

    Ok(ReleaseRun {
        version,
        previous_version,
        dry_run: false,
        steps,
        artifacts,
    })
}

/// Fixed step sequence: stamp, clear stale dist, build, upload.
fn build_steps(
    manifest: &Manifest,
    version: &str,
    options: &ReleaseOptions,
) -> Result<Vec<ReleasePlanStep>> {
    let build_argv = require_argv(&manifest.release.build, "release.build")?;
    let dist_dir = &manifest.release.dist_dir;

    let mut steps = vec![
        ReleasePlanStep {
            id: "version".to_string(),
            label: format!("Stamp {} with {}", manifest.project.version_file, version),
            command: None,
        },
        ReleasePlanStep {
            id: "dist.clean".to_string(),
            label: format!("Remove stale {}/", dist_dir),
            command: None,
        },
        ReleasePlanStep {
            id: "build".to_string(),
            label: "Build source distribution".to_string(),
            command: Some(shell::quote_args(build_argv)),
        },
    ];

    if !options.no_upload {
        let upload_argv = require_argv(&manifest.release.upload, "release.upload")?;
        steps.push(ReleasePlanStep {
            id: "upload".to_string(),
            label: "Upload to package index".to_string(),
            command: Some(format!("{} {}/*", shell::quote_args(upload_argv), dist_dir)),
        });
    }

    Ok(steps)
}

fn require_argv<'a>(argv: &'a [String], key: &str) -> Result<&'a [String]> {
    if argv.is_empty() {
        return Err(Error::manifest_invalid(key, "Command must not be empty"));
    }
    Ok(argv)
}

/// Stale artifacts from a previous build must never ride along, so the
/// whole dist directory goes before the build step runs.
fn remove_dist(root: &Path, dist_dir: &str) -> Result<()> {
    let dist = root.join(dist_dir);
    if !dist.exists() {
        return Ok(());
    }

    std::fs::remove_dir_all(&dist).map_err(|e| {
        Error::internal_io(
            e.to_string(),
            Some(format!("remove {}", dist.display())),
        )
    })
}

/// Upload gets the artifact paths spelled out rather than a shell glob.
fn upload_argv(root: &Path, manifest: &Manifest) -> Result<Vec<String>> {
    let artifacts = scan_artifacts(root, &manifest.release.dist_dir)?;
    if artifacts.is_empty() {
        return Err(Error::internal_unexpected(format!(
            "Build produced no artifacts in '{}'",
            manifest.release.dist_dir
        )));
    }

    let mut argv = manifest.release.upload.clone();
    argv.extend(artifacts.into_iter().map(|a| a.path));
    Ok(argv)
}

fn scan_artifacts(root: &Path, dist_dir: &str) -> Result<Vec<ReleaseArtifact>> {
    let dist = root.join(dist_dir);
    if !dist.is_dir() {
        return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(&dist).map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("read {}", dist.display())))
    })?;

    let mut artifacts = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("read {}", dist.display())))
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let bytes = std::fs::read(&path).map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("read {}", path.display())))
        })?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);

        let relative = path
            .strip_prefix(root)
            .unwrap_or(&path)
            .display()
            .to_string();

        artifacts.push(ReleaseArtifact {
            path: relative,
            size: bytes.len() as u64,
            sha256: format!("{:x}", hasher.finalize()),
        });
    }

    // Directory order is not stable across filesystems.
    artifacts.sort_by(|a, b| a.path.cmp(&b.path));

    Ok(artifacts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::process::Command;
    use tempfile::TempDir;

    fn project_with_tag(version: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        let path = dir.path();

        let git = |args: &[&str]| {
            let out = Command::new("git").args(args).current_dir(path).output().unwrap();
            assert!(out.status.success(), "git {:?} failed", args);
        };

        git(&["init", "--quiet"]);
        git(&["config", "user.email", "dev@example.com"]);
        git(&["config", "user.name", "Dev"]);
        fs::write(path.join("version.py"), "__version__ = '0.0'\n").unwrap();
        git(&["add", "."]);
        git(&["commit", "--quiet", "-m", "initial"]);
        git(&["tag", &format!("v{}", version)]);

        dir
    }

    fn quiet_manifest() -> Manifest {
        let mut manifest = Manifest::default();
        // Steps that always succeed without external tools.
        manifest.release.build = vec!["true".to_string()];
        manifest.release.upload = vec!["true".to_string()];
        manifest
    }

    #[test]
    fn plan_orders_the_fixed_steps() {
        let dir = project_with_tag("0.24");
        let manifest = quiet_manifest();

        let release_plan = plan(dir.path(), &manifest, &ReleaseOptions::default()).unwrap();

        assert_eq!(release_plan.version, "0.24");
        let ids: Vec<&str> = release_plan.steps.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["version", "dist.clean", "build", "upload"]);
    }

    #[test]
    fn no_upload_truncates_the_plan() {
        let dir = project_with_tag("0.24");
        let manifest = quiet_manifest();
        let options = ReleaseOptions {
            no_upload: true,
            ..Default::default()
        };

        let release_plan = plan(dir.path(), &manifest, &options).unwrap();

        let ids: Vec<&str> = release_plan.steps.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["version", "dist.clean", "build"]);
        assert!(release_plan.hints.iter().any(|h| h.contains("--no-upload")));
    }

    #[test]
    fn plan_fails_without_tag_or_explicit_version() {
        let dir = TempDir::new().unwrap();
        let manifest = quiet_manifest();

        let err = plan(dir.path(), &manifest, &ReleaseOptions::default()).unwrap_err();
        assert_eq!(err.code.as_str(), "version.tag_missing");
    }

    #[test]
    fn plan_rejects_empty_build_command() {
        let dir = project_with_tag("1.0");
        let mut manifest = quiet_manifest();
        manifest.release.build = Vec::new();

        let err = plan(dir.path(), &manifest, &ReleaseOptions::default()).unwrap_err();
        assert_eq!(err.code.as_str(), "manifest.invalid");
    }

    #[test]
    fn dry_run_executes_nothing() {
        let dir = project_with_tag("0.9");
        let manifest = quiet_manifest();

        fs::create_dir(dir.path().join("dist")).unwrap();
        fs::write(dir.path().join("dist/stale.tar.gz"), b"old").unwrap();

        let options = ReleaseOptions {
            dry_run: true,
            ..Default::default()
        };
        let run_result = run(dir.path(), &manifest, &options).unwrap();

        assert!(run_result.dry_run);
        assert!(run_result
            .steps
            .iter()
            .all(|s| matches!(s.status, ReleaseStepStatus::Skipped)));
        // The stale artifact survives and the stamp is untouched.
        assert!(dir.path().join("dist/stale.tar.gz").exists());
        let stamped = fs::read_to_string(dir.path().join("version.py")).unwrap();
        assert_eq!(stamped, "__version__ = '0.0'\n");
    }

    #[test]
    fn run_removes_stale_dist_before_building() {
        let dir = project_with_tag("0.24");
        let mut manifest = quiet_manifest();
        manifest.release.build = vec![
            "sh".to_string(),
            "-c".to_string(),
            "mkdir -p dist && echo fresh > dist/pkg-0.24.tar.gz".to_string(),
        ];

        fs::create_dir(dir.path().join("dist")).unwrap();
        fs::write(dir.path().join("dist/pkg-0.23.tar.gz"), b"stale").unwrap();

        let options = ReleaseOptions {
            no_upload: true,
            ..Default::default()
        };
        let run_result = run(dir.path(), &manifest, &options).unwrap();

        assert!(!dir.path().join("dist/pkg-0.23.tar.gz").exists());
        assert!(dir.path().join("dist/pkg-0.24.tar.gz").exists());
        assert_eq!(run_result.artifacts.len(), 1);
        assert_eq!(run_result.artifacts[0].path, "dist/pkg-0.24.tar.gz");
        assert_eq!(run_result.previous_version.as_deref(), Some("0.0"));

        let stamped = fs::read_to_string(dir.path().join("version.py")).unwrap();
        assert_eq!(stamped, "__version__ = '0.24'\n");
    }

    #[test]
    fn run_stops_when_a_step_fails() {
        let dir = project_with_tag("0.24");
        let mut manifest = quiet_manifest();
        manifest.release.build = vec!["false".to_string()];

        let err = run(dir.path(), &manifest, &ReleaseOptions::default()).unwrap_err();
        assert_eq!(err.code.as_str(), "tool.command_failed");

        // The stamp already happened; upload never ran.
        let stamped = fs::read_to_string(dir.path().join("version.py")).unwrap();
        assert_eq!(stamped, "__version__ = '0.24'\n");
    }

    #[test]
    fn artifact_scan_digests_files() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("dist")).unwrap();
        fs::write(dir.path().join("dist/a.tar.gz"), b"abc").unwrap();

        let artifacts = scan_artifacts(dir.path(), "dist").unwrap();

        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].size, 3);
        assert_eq!(
            artifacts[0].sha256,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
