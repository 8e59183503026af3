use std::path::{Path, PathBuf};

pub type CmdResult<T> = capstan::Result<(T, i32)>;

/// Global flags shared by every subcommand.
pub(crate) struct GlobalArgs {
    pub config: Option<PathBuf>,
    pub manifest: Option<PathBuf>,
}

impl GlobalArgs {
    pub(crate) fn load_config(&self) -> capstan::Result<capstan::config::LoadedConfig> {
        capstan::config::LoadedConfig::load(self.config.as_deref())
    }

    pub(crate) fn load_manifest(
        &self,
        root: &Path,
    ) -> capstan::Result<capstan::manifest::Manifest> {
        capstan::manifest::load(root, self.manifest.as_deref())
    }
}

/// Commands act on the project in the current working directory.
pub(crate) fn project_root() -> capstan::Result<PathBuf> {
    std::env::current_dir().map_err(|e| {
        capstan::Error::internal_io(
            e.to_string(),
            Some("resolve current directory".to_string()),
        )
    })
}

pub mod clean;
pub mod push;
pub mod release;
pub mod repo;
pub mod test;
pub mod version;

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (capstan::Result<serde_json::Value>, i32) {
    match command {
        crate::Commands::Test(args) => dispatch!(args, global, test),
        crate::Commands::Version(args) => dispatch!(args, global, version),
        crate::Commands::Release(args) => dispatch!(args, global, release),
        crate::Commands::Push(args) => dispatch!(args, global, push),
        crate::Commands::Clean(args) => dispatch!(args, global, clean),
        crate::Commands::Repo(args) => dispatch!(args, global, repo),
    }
}
