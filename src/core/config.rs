use crate::error::{Error, Result};
use crate::paths;
use crate::workspace::Site;
use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_USAGE: &str = r#"Provide a config file with -c argument or default location: ~/.config/capstan/config.toml.

    [clone]
    destdir = "~/repos"

    [bitbucket]
    workspaces = ["team1", "team2"]

    [bitbucket.credentials]
    default = "JohnDoe:secret"

    [github]
    workspaces = ["org1", "org2"]

    [github.credentials]
    default = "JohnDoe:secret"

Use these features to create "safe" passwords:
- https://bitbucket.org/account/settings/app-passwords/
- https://github.com/settings/tokens
"#;

/// User-level settings file (~/.config/capstan/config.toml).
///
/// Every section is optional; commands that need a missing section
/// report a config error naming the key.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub clone: CloneSection,
    pub bitbucket: Option<SiteSection>,
    pub github: Option<SiteSection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CloneSection {
    pub destdir: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteSection {
    #[serde(default)]
    pub workspaces: Vec<String>,
    pub credentials: Option<CredentialsSection>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CredentialsSection {
    pub default: String,
}

/// API credentials as `username:secret`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Splits on the first ':' so app passwords may contain colons.
    pub fn parse(raw: &str) -> Result<Self> {
        let (username, password) = raw.split_once(':').ok_or_else(|| {
            Error::config_invalid_value(
                "credentials.default",
                None,
                "Expected '<username>:<password>'",
            )
        })?;

        if username.is_empty() || password.is_empty() {
            return Err(Error::config_invalid_value(
                "credentials.default",
                None,
                "Username and password must both be non-empty",
            ));
        }

        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    /// Value for the `Authorization` request header.
    pub fn basic_header(&self) -> String {
        let token =
            general_purpose::STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {}", token)
    }
}

impl std::fmt::Display for Credentials {
    // Masks the secret so credentials never leak into logs.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.username, "*".repeat(self.password.len()))
    }
}

/// Loaded config plus where it came from, so errors can name the path.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub path: PathBuf,
    pub found: bool,
    data: UserConfig,
}

impl LoadedConfig {
    /// Load from an explicit path (must exist) or the default location
    /// (absence is tolerated until a command actually needs a value).
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let (path, required) = match explicit {
            Some(p) => (p.to_path_buf(), true),
            None => (paths::config_toml()?, false),
        };

        if !path.exists() {
            if required {
                return Err(Error::config_not_found(
                    path.display().to_string(),
                    CONFIG_USAGE,
                ));
            }
            return Ok(Self {
                path,
                found: false,
                data: UserConfig::default(),
            });
        }

        let raw = crate::utils::io::read_file(&path, "read config")?;
        let data: UserConfig = toml::from_str(&raw)
            .map_err(|e| Error::config_invalid_toml(path.display().to_string(), e))?;

        Ok(Self {
            path,
            found: true,
            data,
        })
    }

    /// Where `clone` puts working copies. Falls back to the current directory.
    pub fn destdir(&self) -> Result<PathBuf> {
        match self.data.clone.destdir.as_deref() {
            Some(raw) => {
                let expanded = shellexpand::tilde(raw);
                Ok(PathBuf::from(expanded.as_ref()))
            }
            None => std::env::current_dir().map_err(|e| {
                Error::internal_io(e.to_string(), Some("resolve working directory".to_string()))
            }),
        }
    }

    pub fn credentials(&self, site: Site) -> Result<Option<Credentials>> {
        let section = self.site_section(site);
        match section.and_then(|s| s.credentials.as_ref()) {
            Some(table) => Credentials::parse(&table.default).map(Some),
            None => Ok(None),
        }
    }

    /// Credentials for operations that cannot run anonymously.
    pub fn require_credentials(&self, site: Site) -> Result<Credentials> {
        if let Some(credentials) = self.credentials(site)? {
            return Ok(credentials);
        }

        if !self.found {
            return Err(Error::config_not_found(
                self.path.display().to_string(),
                CONFIG_USAGE,
            ));
        }

        Err(Error::config_missing_key(
            format!("{}.credentials.default", site.key()),
            Some(self.path.display().to_string()),
        ))
    }

    pub fn workspaces(&self, site: Site) -> Vec<String> {
        self.site_section(site)
            .map(|s| s.workspaces.clone())
            .unwrap_or_default()
    }

    fn site_section(&self, site: Site) -> Option<&SiteSection> {
        match site {
            Site::Bitbucket => self.data.bitbucket.as_ref(),
            Site::Github => self.data.github.as_ref(),
        }
    }
}
