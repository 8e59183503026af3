use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::GlobalArgs;

mod commands;
mod output;
mod tty;

use commands::{clean, push, release, repo, test, version};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "capstan")]
#[command(version = VERSION)]
#[command(about = "CLI for release automation and hosted git repository management")]
struct Cli {
    /// Path to the user config file (default ~/.config/capstan/config.toml)
    #[arg(short = 'c', long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Path to the project manifest (default capstan.toml in the project root)
    #[arg(long, global = true, value_name = "FILE")]
    manifest: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the project test suite
    Test(test::TestArgs),
    /// Show or stamp the project version
    Version(version::VersionArgs),
    /// Stamp, build, and upload a source distribution
    #[command(visible_alias = "pypi-release")]
    Release(release::ReleaseArgs),
    /// Push the current branch to the configured remotes
    Push(push::PushArgs),
    /// Remove build artifacts
    Clean(clean::CleanArgs),
    /// Manage hosted repositories on Bitbucket and GitHub
    Repo(repo::RepoArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let global = GlobalArgs {
        config: cli.config,
        manifest: cli.manifest,
    };

    let (json_result, exit_code) = commands::run_json(cli.command, &global);

    if let Err(err) = output::print_json_result(json_result) {
        eprintln!("capstan: {}", err);
        return std::process::ExitCode::from(1);
    }

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
