use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Base capstan config directory (universal ~/.config/capstan/ on all platforms)
pub fn capstan() -> Result<PathBuf> {
    #[cfg(windows)]
    {
        let appdata = env::var("APPDATA").map_err(|_| {
            Error::internal_unexpected(
                "APPDATA environment variable not set on Windows".to_string(),
            )
        })?;
        Ok(PathBuf::from(appdata).join("capstan"))
    }

    #[cfg(not(windows))]
    {
        let home = env::var("HOME").map_err(|_| {
            Error::internal_unexpected(
                "HOME environment variable not set on Unix-like system".to_string(),
            )
        })?;
        Ok(PathBuf::from(home).join(".config").join("capstan"))
    }
}

/// User config.toml file path
pub fn config_toml() -> Result<PathBuf> {
    Ok(capstan()?.join("config.toml"))
}
