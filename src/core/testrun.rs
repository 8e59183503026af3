//! Test-suite invocation with argument passthrough.

use std::path::Path;

use crate::error::Result;
use crate::executor;
use crate::manifest::Manifest;

/// Runner argv: configured runner, then the test directory, then any
/// extra arguments from the command line.
pub fn runner_argv(manifest: &Manifest, extra: &[String]) -> Vec<String> {
    let mut argv = manifest.project.runner.clone();
    argv.push(manifest.project.test_dir.clone());
    argv.extend(extra.iter().cloned());
    argv
}

/// Run the suite with stdio inherited. Success is whatever the runner
/// says it is; the exit code comes back unchanged.
pub fn run(root: &Path, manifest: &Manifest, extra: &[String]) -> Result<i32> {
    executor::run_tool_passthrough(root, &runner_argv(manifest, extra))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn argv_appends_test_dir_and_extra_args() {
        let manifest = Manifest::default();
        let extra = vec!["-k".to_string(), "test_config".to_string()];

        let argv = runner_argv(&manifest, &extra);
        assert_eq!(
            argv,
            vec!["python3", "-m", "pytest", "test", "-k", "test_config"]
        );
    }

    #[test]
    fn exit_code_passes_through() {
        let dir = TempDir::new().unwrap();

        let mut manifest = Manifest::default();
        manifest.project.runner = vec!["true".to_string()];
        manifest.project.test_dir = ".".to_string();
        assert_eq!(run(dir.path(), &manifest, &[]).unwrap(), 0);

        manifest.project.runner = vec!["false".to_string()];
        assert_ne!(run(dir.path(), &manifest, &[]).unwrap(), 0);
    }
}
