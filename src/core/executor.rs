// External tool execution - the builders, uploaders, and test runners
// capstan orchestrates but never reimplements.

use serde::Serialize;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{Error, Result};
use crate::shell;

/// Captured result of one tool invocation.
#[derive(Debug, Clone, Serialize)]
pub struct ToolOutput {
    pub command: String,
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    /// Promote a failed invocation into an error carrying the full
    /// captured output.
    pub fn into_result(self) -> Result<ToolOutput> {
        if self.success {
            return Ok(self);
        }
        Err(Error::tool_command_failed(
            crate::error::ToolCommandFailedDetails {
                command: self.command,
                exit_code: self.exit_code,
                stdout: self.stdout,
                stderr: self.stderr,
            },
        ))
    }
}

fn build_command(root: &Path, argv: &[String]) -> Result<(Command, String)> {
    let program = argv.first().ok_or_else(|| {
        Error::internal_unexpected("Empty command (no program to run)".to_string())
    })?;

    let mut cmd = Command::new(program);
    cmd.args(&argv[1..]).current_dir(root);
    Ok((cmd, shell::quote_args(argv)))
}

/// Run a tool argv in a directory, capturing its output.
pub fn run_tool(root: &Path, argv: &[String]) -> Result<ToolOutput> {
    let (mut cmd, rendered) = build_command(root, argv)?;

    match cmd.output() {
        Ok(out) => Ok(ToolOutput {
            command: rendered,
            success: out.status.success(),
            exit_code: out.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&out.stdout).to_string(),
            stderr: String::from_utf8_lossy(&out.stderr).to_string(),
        }),
        Err(e) => Ok(ToolOutput {
            command: rendered,
            success: false,
            exit_code: -1,
            stdout: String::new(),
            stderr: format!("Command error: {}", e),
        }),
    }
}

/// Run a tool argv with stdio inherited, returning only the exit code.
/// Used where the tool's own output IS the user-facing output.
pub fn run_tool_passthrough(root: &Path, argv: &[String]) -> Result<i32> {
    let (mut cmd, _) = build_command(root, argv)?;

    let status = cmd
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status();

    match status {
        Ok(s) => Ok(s.code().unwrap_or(-1)),
        Err(e) => {
            let rendered = shell::quote_args(argv);
            Err(Error::tool_command_failed(
                crate::error::ToolCommandFailedDetails {
                    command: rendered,
                    exit_code: -1,
                    stdout: String::new(),
                    stderr: format!("Command error: {}", e),
                },
            ))
        }
    }
}
