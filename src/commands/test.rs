use clap::Args;
use serde::Serialize;

use capstan::{shell, testrun};

use super::CmdResult;

#[derive(Args)]
pub struct TestArgs {
    /// Additional arguments to pass to the test runner (after --)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

#[derive(Serialize)]
pub struct TestOutput {
    status: String,
    command: String,
    exit_code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    hints: Option<Vec<String>>,
}

pub fn run(args: TestArgs, global: &super::GlobalArgs) -> CmdResult<TestOutput> {
    let root = super::project_root()?;
    let manifest = global.load_manifest(&root)?;

    let argv = testrun::runner_argv(&manifest, &args.args);
    let command = shell::quote_args(&argv);

    // The runner inherits the terminal; its exit code is the verdict.
    let exit_code = testrun::run(&root, &manifest, &args.args)?;
    let status = if exit_code == 0 { "passed" } else { "failed" };

    let mut hints = Vec::new();
    if exit_code != 0 && args.args.is_empty() {
        hints.push("Pass args to the runner: capstan test -- -k <pattern>".to_string());
    }
    let hints = if hints.is_empty() { None } else { Some(hints) };

    Ok((
        TestOutput {
            status: status.to_string(),
            command,
            exit_code,
            hints,
        },
        exit_code,
    ))
}
