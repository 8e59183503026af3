use clap::Args;
use serde::Serialize;

use capstan::release::{self, ReleaseOptions, ReleaseRun};

use super::CmdResult;

#[derive(Args)]
pub struct ReleaseArgs {
    /// Use this version instead of the latest tag
    #[arg(long, value_name = "VERSION")]
    set: Option<String>,

    /// Print the plan without executing any step
    #[arg(long)]
    dry_run: bool,

    /// Stop after the build step
    #[arg(long)]
    no_upload: bool,
}

#[derive(Serialize)]
pub struct ReleaseOutput {
    command: String,
    run: ReleaseRun,
}

pub fn run(args: ReleaseArgs, global: &super::GlobalArgs) -> CmdResult<ReleaseOutput> {
    let root = super::project_root()?;
    let manifest = global.load_manifest(&root)?;

    let options = ReleaseOptions {
        set_version: args.set,
        dry_run: args.dry_run,
        no_upload: args.no_upload,
    };

    let run = release::run(&root, &manifest, &options)?;

    Ok((
        ReleaseOutput {
            command: "release".to_string(),
            run,
        },
        0,
    ))
}
