mod operations;
mod primitives;

pub use operations::*;
pub use primitives::*;

use std::process::Command;

fn execute_git(path: &str, args: &[&str]) -> std::io::Result<std::process::Output> {
    Command::new("git").args(args).current_dir(path).output()
}
