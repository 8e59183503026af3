use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Per-project manifest file name, looked up at the project root.
pub const MANIFEST_FILE: &str = "capstan.toml";

/// Root structure for capstan.toml.
///
/// Every key has a built-in default, so a project without a manifest
/// still tests, stamps, and releases the standard way.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Manifest {
    #[serde(default)]
    pub project: ProjectSection,

    #[serde(default)]
    pub release: ReleaseSection,

    #[serde(default)]
    pub push: PushSection,

    #[serde(default)]
    pub clean: CleanSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProjectSection {
    #[serde(default = "default_version_file")]
    pub version_file: String,

    #[serde(default = "default_test_dir")]
    pub test_dir: String,

    #[serde(default = "default_runner")]
    pub runner: Vec<String>,
}

impl Default for ProjectSection {
    fn default() -> Self {
        Self {
            version_file: default_version_file(),
            test_dir: default_test_dir(),
            runner: default_runner(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReleaseSection {
    #[serde(default = "default_dist_dir")]
    pub dist_dir: String,

    #[serde(default = "default_build")]
    pub build: Vec<String>,

    #[serde(default = "default_upload")]
    pub upload: Vec<String>,
}

impl Default for ReleaseSection {
    fn default() -> Self {
        Self {
            dist_dir: default_dist_dir(),
            build: default_build(),
            upload: default_upload(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushSection {
    #[serde(default = "default_remotes")]
    pub remotes: Vec<String>,
}

impl Default for PushSection {
    fn default() -> Self {
        Self {
            remotes: default_remotes(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanSection {
    #[serde(default = "default_clean_paths")]
    pub paths: Vec<String>,
}

impl Default for CleanSection {
    fn default() -> Self {
        Self {
            paths: default_clean_paths(),
        }
    }
}

// =============================================================================
// Default value functions (match the original release scripts)
// =============================================================================

fn default_version_file() -> String {
    "version.py".to_string()
}

fn default_test_dir() -> String {
    "test".to_string()
}

fn default_runner() -> Vec<String> {
    vec![
        "python3".to_string(),
        "-m".to_string(),
        "pytest".to_string(),
    ]
}

fn default_dist_dir() -> String {
    "dist".to_string()
}

fn default_build() -> Vec<String> {
    vec![
        "python3".to_string(),
        "setup.py".to_string(),
        "sdist".to_string(),
    ]
}

fn default_upload() -> Vec<String> {
    vec!["twine".to_string(), "upload".to_string()]
}

fn default_remotes() -> Vec<String> {
    vec!["origin".to_string(), "github".to_string()]
}

fn default_clean_paths() -> Vec<String> {
    vec![
        "dist".to_string(),
        "build".to_string(),
        "*.egg-info".to_string(),
        ".coverage".to_string(),
        "MANIFEST".to_string(),
        "**/__pycache__".to_string(),
        "**/*.pyc".to_string(),
    ]
}

// =============================================================================
// Loading functions
// =============================================================================

/// Load the manifest for a project root.
///
/// An explicit `--manifest` path must exist; the default capstan.toml
/// may be absent, in which case built-in defaults apply.
pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Manifest> {
    let path = match explicit {
        Some(p) => {
            if !p.exists() {
                return Err(Error::manifest_invalid(
                    p.display().to_string(),
                    "File not found",
                ));
            }
            p.to_path_buf()
        }
        None => {
            let default = root.join(MANIFEST_FILE);
            if !default.exists() {
                return Ok(Manifest::default());
            }
            default
        }
    };

    load_from_file(&path)
}

fn load_from_file(path: &PathBuf) -> Result<Manifest> {
    let content = crate::utils::io::read_file(path, "read manifest")?;
    toml::from_str(&content)
        .map_err(|e| Error::manifest_invalid(path.display().to_string(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn missing_manifest_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let manifest = load(dir.path(), None).unwrap();

        assert_eq!(manifest.project.version_file, "version.py");
        assert_eq!(manifest.project.test_dir, "test");
        assert_eq!(manifest.release.dist_dir, "dist");
        assert_eq!(manifest.release.build, vec!["python3", "setup.py", "sdist"]);
        assert_eq!(manifest.release.upload, vec!["twine", "upload"]);
        assert_eq!(manifest.push.remotes, vec!["origin", "github"]);
        assert!(manifest.clean.paths.contains(&"**/__pycache__".to_string()));
    }

    #[test]
    fn partial_manifest_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(MANIFEST_FILE),
            "[project]\nversion-file = \"src/mypkg/version.py\"\n",
        )
        .unwrap();

        let manifest = load(dir.path(), None).unwrap();
        assert_eq!(manifest.project.version_file, "src/mypkg/version.py");
        assert_eq!(manifest.project.test_dir, "test");
        assert_eq!(manifest.push.remotes, vec!["origin", "github"]);
    }

    #[test]
    fn explicit_manifest_overrides_default_lookup() {
        let dir = TempDir::new().unwrap();
        let custom = dir.path().join("other.toml");
        fs::write(&custom, "[push]\nremotes = [\"origin\"]\n").unwrap();

        let manifest = load(dir.path(), Some(&custom)).unwrap();
        assert_eq!(manifest.push.remotes, vec!["origin"]);
    }

    #[test]
    fn explicit_manifest_must_exist() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("gone.toml");

        let err = load(dir.path(), Some(&missing)).unwrap_err();
        assert_eq!(err.code.as_str(), "manifest.invalid");
    }

    #[test]
    fn bad_toml_reports_manifest_invalid() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), "[release\nbuild = 3").unwrap();

        let err = load(dir.path(), None).unwrap_err();
        assert_eq!(err.code.as_str(), "manifest.invalid");
    }
}
