use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigNotFound,
    ConfigMissingKey,
    ConfigInvalidToml,
    ConfigInvalidValue,

    ManifestInvalid,

    ValidationInvalidArgument,

    VersionFileMissing,
    VersionInvalid,
    VersionTagMissing,

    RepoNotFound,
    RepoAccessDenied,
    RepoAlreadyExists,
    CloneDestinationExists,

    RemoteApiError,
    RemoteHttpError,

    GitCommandFailed,
    ToolCommandFailed,

    InternalIoError,
    InternalJsonError,
    InternalUnexpected,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigNotFound => "config.not_found",
            ErrorCode::ConfigMissingKey => "config.missing_key",
            ErrorCode::ConfigInvalidToml => "config.invalid_toml",
            ErrorCode::ConfigInvalidValue => "config.invalid_value",

            ErrorCode::ManifestInvalid => "manifest.invalid",

            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",

            ErrorCode::VersionFileMissing => "version.file_missing",
            ErrorCode::VersionInvalid => "version.invalid",
            ErrorCode::VersionTagMissing => "version.tag_missing",

            ErrorCode::RepoNotFound => "repo.not_found",
            ErrorCode::RepoAccessDenied => "repo.access_denied",
            ErrorCode::RepoAlreadyExists => "repo.already_exists",
            ErrorCode::CloneDestinationExists => "clone.destination_exists",

            ErrorCode::RemoteApiError => "remote.api_error",
            ErrorCode::RemoteHttpError => "remote.http_error",

            ErrorCode::GitCommandFailed => "git.command_failed",
            ErrorCode::ToolCommandFailed => "tool.command_failed",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
            ErrorCode::InternalUnexpected => "internal.unexpected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigNotFoundDetails {
    pub path: String,
    pub usage: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigMissingKeyDetails {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidTomlDetails {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidValueDetails {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub problem: String,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
    pub retryable: Option<bool>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotFoundDetails {
    pub id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub problem: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tried: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionFileMissingDetails {
    pub file: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInvalidDetails {
    pub version: String,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCommandFailedDetails {
    pub command: String,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalIoErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalJsonErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
            retryable: None,
        }
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        problem: impl Into<String>,
        id: Option<String>,
        tried: Option<Vec<String>>,
    ) -> Self {
        let details = serde_json::to_value(InvalidArgumentDetails {
            field: field.into(),
            problem: problem.into(),
            id,
            tried,
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(
            ErrorCode::ValidationInvalidArgument,
            "Invalid argument",
            details,
        )
    }

    pub fn config_not_found(path: impl Into<String>, usage: impl Into<String>) -> Self {
        let path = path.into();
        let details = serde_json::to_value(ConfigNotFoundDetails {
            path: path.clone(),
            usage: usage.into(),
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(ErrorCode::ConfigNotFound, "No config file available", details)
            .with_hint(format!("Create {} or pass -c <file>", path))
    }

    pub fn config_missing_key(key: impl Into<String>, path: Option<String>) -> Self {
        let details = serde_json::to_value(ConfigMissingKeyDetails {
            key: key.into(),
            path,
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(
            ErrorCode::ConfigMissingKey,
            "Missing required configuration key",
            details,
        )
    }

    pub fn config_invalid_toml(path: impl Into<String>, err: impl std::fmt::Display) -> Self {
        let details = serde_json::to_value(ConfigInvalidTomlDetails {
            path: path.into(),
            error: err.to_string(),
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(
            ErrorCode::ConfigInvalidToml,
            "Invalid TOML in configuration",
            details,
        )
    }

    pub fn config_invalid_value(
        key: impl Into<String>,
        value: Option<String>,
        problem: impl Into<String>,
    ) -> Self {
        let details = serde_json::to_value(ConfigInvalidValueDetails {
            key: key.into(),
            value,
            problem: problem.into(),
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(
            ErrorCode::ConfigInvalidValue,
            "Invalid configuration value",
            details,
        )
    }

    pub fn manifest_invalid(path: impl Into<String>, problem: impl Into<String>) -> Self {
        let details = serde_json::json!({
            "path": path.into(),
            "problem": problem.into(),
        });

        Self::new(ErrorCode::ManifestInvalid, "Invalid project manifest", details)
    }

    pub fn version_file_missing(file: impl Into<String>) -> Self {
        let file = file.into();
        let details = serde_json::to_value(VersionFileMissingDetails { file: file.clone() })
            .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(ErrorCode::VersionFileMissing, "Version file not found", details)
            .with_hint(format!("Create {} before releasing", file))
    }

    pub fn version_invalid(version: impl Into<String>, problem: impl Into<String>) -> Self {
        let details = serde_json::to_value(VersionInvalidDetails {
            version: version.into(),
            problem: problem.into(),
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(ErrorCode::VersionInvalid, "Invalid version string", details)
    }

    pub fn version_tag_missing(path: impl Into<String>) -> Self {
        let details = serde_json::json!({ "path": path.into() });

        Self::new(
            ErrorCode::VersionTagMissing,
            "No version tag reachable from HEAD",
            details,
        )
        .with_hint("Tag a release first: git tag v<version>")
        .with_hint("Or pass an explicit version: --set <version>")
    }

    pub fn repo_not_found(name: impl Into<String>) -> Self {
        Self::not_found(ErrorCode::RepoNotFound, "Repository not found", name)
    }

    pub fn repo_access_denied(name: impl Into<String>) -> Self {
        Self::not_found(ErrorCode::RepoAccessDenied, "Access denied", name)
            .with_hint("Check credentials in your config file")
    }

    pub fn repo_already_exists(name: impl Into<String>) -> Self {
        Self::not_found(ErrorCode::RepoAlreadyExists, "Repository already exists", name)
    }

    fn not_found(code: ErrorCode, message: &str, id: impl Into<String>) -> Self {
        let details = serde_json::to_value(NotFoundDetails { id: id.into() })
            .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));
        Self::new(code, message, details)
    }

    pub fn clone_destination_exists(path: impl Into<String>) -> Self {
        let details = serde_json::json!({ "path": path.into() });

        Self::new(
            ErrorCode::CloneDestinationExists,
            "Destination directory already exists",
            details,
        )
    }

    pub fn remote_api_error(status: u16, body: &str) -> Self {
        Self::new(
            ErrorCode::RemoteApiError,
            format!("API error: HTTP {}", status),
            serde_json::json!({ "status": status, "body": body }),
        )
    }

    pub fn remote_http_error(err: impl std::fmt::Display) -> Self {
        Self::new(
            ErrorCode::RemoteHttpError,
            format!("HTTP request failed: {}", err),
            serde_json::json!({ "error": err.to_string() }),
        )
    }

    pub fn git_command_failed(message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::GitCommandFailed,
            message,
            Value::Object(serde_json::Map::new()),
        )
    }

    pub fn tool_command_failed(details: ToolCommandFailedDetails) -> Self {
        let message = format!("Command failed: {}", details.command);
        let details =
            serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(ErrorCode::ToolCommandFailed, message, details)
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        let details = serde_json::to_value(InternalIoErrorDetails {
            error: error.into(),
            context,
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(ErrorCode::InternalIoError, "IO error", details)
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        let details = serde_json::to_value(InternalJsonErrorDetails {
            error: error.into(),
            context,
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Self::new(ErrorCode::InternalJsonError, "JSON error", details)
    }

    pub fn internal_unexpected(error: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InternalUnexpected,
            "Unexpected error",
            serde_json::json!({ "error": error.into() }),
        )
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_serialize_to_dotted_strings() {
        assert_eq!(ErrorCode::VersionFileMissing.as_str(), "version.file_missing");
        assert_eq!(ErrorCode::RepoNotFound.as_str(), "repo.not_found");
        assert_eq!(ErrorCode::ToolCommandFailed.as_str(), "tool.command_failed");
    }

    #[test]
    fn with_hint_accumulates() {
        let err = Error::git_command_failed("push failed")
            .with_hint("first")
            .with_hint("second");
        assert_eq!(err.hints.len(), 2);
        assert_eq!(err.hints[0].message, "first");
    }

    #[test]
    fn version_tag_missing_carries_fallback_hints() {
        let err = Error::version_tag_missing("/repo");
        assert_eq!(err.code, ErrorCode::VersionTagMissing);
        assert!(err.hints.iter().any(|h| h.message.contains("--set")));
    }
}
