use clap::Args;
use serde::Serialize;

use capstan::git::{self, PushOutcome};
use capstan::log_status;

use super::CmdResult;

#[derive(Args)]
pub struct PushArgs {
    /// Push to these remotes instead of the manifest list
    #[arg(long, value_name = "REMOTE")]
    remote: Vec<String>,
}

#[derive(Serialize)]
pub struct PushOutput {
    command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    branch: Option<String>,
    remotes: Vec<String>,
    pushed: Vec<PushOutcome>,
}

pub fn run(args: PushArgs, global: &super::GlobalArgs) -> CmdResult<PushOutput> {
    let root = super::project_root()?;
    let manifest = global.load_manifest(&root)?;

    let remotes = if args.remote.is_empty() {
        manifest.push.remotes.clone()
    } else {
        args.remote
    };

    if !git::is_workdir_clean(&root) {
        log_status!("push", "Working copy has uncommitted changes; they will not be pushed");
    }

    let branch = git::current_branch(&root);
    let pushed = git::push_sequence(&root, &remotes)?;

    Ok((
        PushOutput {
            command: "push".to_string(),
            branch,
            remotes,
            pushed,
        },
        0,
    ))
}
