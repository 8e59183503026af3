use clap::Args;
use serde::Serialize;

use capstan::clean::{self, CleanResult};

use super::CmdResult;

#[derive(Args)]
pub struct CleanArgs {
    /// List what would be removed without removing anything
    #[arg(long)]
    dry_run: bool,
}

#[derive(Serialize)]
pub struct CleanOutput {
    command: String,
    clean: CleanResult,
}

pub fn run(args: CleanArgs, global: &super::GlobalArgs) -> CmdResult<CleanOutput> {
    let root = super::project_root()?;
    let manifest = global.load_manifest(&root)?;

    let result = clean::clean(&root, &manifest.clean.paths, args.dry_run)?;

    Ok((
        CleanOutput {
            command: "clean".to_string(),
            clean: result,
        },
        0,
    ))
}
