use clap::{Args, Subcommand};
use serde::Serialize;

use capstan::version::{self, StampInfo};

use super::CmdResult;

#[derive(Args)]
pub struct VersionArgs {
    #[command(subcommand)]
    command: VersionCommand,
}

#[derive(Subcommand)]
enum VersionCommand {
    /// Show the stamped version and the latest reachable tag
    Show,
    /// Overwrite the version file with the release version
    Stamp {
        /// Use this version instead of the latest tag
        #[arg(long, value_name = "VERSION")]
        set: Option<String>,
    },
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum VersionOutput {
    #[serde(rename = "version.show")]
    Show {
        file: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        stamped: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        tag: Option<String>,
    },
    #[serde(rename = "version.stamp")]
    Stamp { stamp: StampInfo },
}

pub fn run(args: VersionArgs, global: &super::GlobalArgs) -> CmdResult<VersionOutput> {
    let root = super::project_root()?;
    let manifest = global.load_manifest(&root)?;

    match args.command {
        VersionCommand::Show => {
            let path = version::version_file_path(&root, &manifest.project.version_file);
            let stamped = version::read_stamped(&path);
            let tag = version::latest_tag(&root).and_then(|t| version::normalize(&t).ok());

            Ok((
                VersionOutput::Show {
                    file: manifest.project.version_file.clone(),
                    stamped,
                    tag,
                },
                0,
            ))
        }
        VersionCommand::Stamp { set } => {
            let resolved = version::resolve(&root, set.as_deref())?;
            let stamp = version::stamp(&root, &manifest.project.version_file, &resolved)?;

            Ok((VersionOutput::Stamp { stamp }, 0))
        }
    }
}
