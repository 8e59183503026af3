//! Hosted repository management over the Bitbucket and GitHub REST APIs.
//!
//! Capstan only orchestrates: listing, inspection, create/rename/delete
//! and clone-URL discovery. Everything else belongs to git itself.

mod bitbucket;
mod github;

pub use bitbucket::Bitbucket;
pub use github::Github;

use chrono::DateTime;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::AUTHORIZATION;
use serde::Serialize;
use serde_json::Value;

use crate::config::Credentials;
use crate::error::{Error, Result};
use crate::workspace::{RepoRef, Site};

/// Repository facts shared by both hosting sites.
#[derive(Debug, Clone, Serialize)]
pub struct RepoSummary {
    pub full_name: String,
    pub scm: String,
    pub size: u64,
    pub access: String,
}

/// One commit, trimmed for terminal display.
#[derive(Debug, Clone, Serialize)]
pub struct CommitSummary {
    pub hash: String,
    pub author: String,
    pub date: String,
    pub message: String,
}

/// Operations every hosting site supports.
pub trait RepoHost {
    fn info(&self, repo: &RepoRef) -> Result<RepoSummary>;
    fn ls(&self, workspace: &str) -> Result<Vec<RepoSummary>>;
    fn head(&self, repo: &RepoRef, limit: usize) -> Result<Vec<CommitSummary>>;
    fn create(&self, repo: &RepoRef) -> Result<RepoSummary>;
    fn delete(&self, repo: &RepoRef) -> Result<()>;
    fn rename(&self, repo: &RepoRef, new_name: &str) -> Result<String>;
    fn clone_url(&self, repo: &RepoRef) -> Result<String>;

    fn exists(&self, repo: &RepoRef) -> Result<bool> {
        match self.info(repo) {
            Ok(_) => Ok(true),
            Err(e) if e.code == crate::ErrorCode::RepoNotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}

pub fn host_for(site: Site, credentials: Option<&Credentials>) -> Result<Box<dyn RepoHost>> {
    Ok(match site {
        Site::Bitbucket => Box::new(Bitbucket::new(credentials)?),
        Site::Github => Box::new(Github::new(credentials)?),
    })
}

/// HTTP client carrying the site credentials as a Basic auth header.
pub(crate) struct ApiClient {
    client: Client,
    auth_header: Option<String>,
}

impl ApiClient {
    pub(crate) fn new(credentials: Option<&Credentials>) -> Result<Self> {
        // GitHub rejects requests without a User-Agent.
        let client = Client::builder()
            .user_agent(concat!("capstan/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::remote_http_error(e))?;

        Ok(Self {
            client,
            auth_header: credentials.map(|c| c.basic_header()),
        })
    }

    fn send(&self, request: RequestBuilder) -> Result<Response> {
        let request = match &self.auth_header {
            Some(header) => request.header(AUTHORIZATION, header),
            None => request,
        };
        request.send().map_err(|e| Error::remote_http_error(e))
    }

    pub(crate) fn get(&self, url: &str) -> Result<Response> {
        self.send(self.client.get(url))
    }

    pub(crate) fn post_empty(&self, url: &str) -> Result<Response> {
        self.send(self.client.post(url))
    }

    pub(crate) fn post_json(&self, url: &str, body: &Value) -> Result<Response> {
        self.send(self.client.post(url).json(body))
    }

    pub(crate) fn put_form(&self, url: &str, form: &[(&str, &str)]) -> Result<Response> {
        self.send(self.client.put(url).form(form))
    }

    pub(crate) fn patch_json(&self, url: &str, body: &Value) -> Result<Response> {
        self.send(self.client.patch(url).json(body))
    }

    pub(crate) fn delete(&self, url: &str) -> Result<Response> {
        self.send(self.client.delete(url))
    }
}

/// Check a response status against the expected list, mapping the
/// site-specific denial/missing statuses to typed errors and anything
/// else to a generic API error carrying the body.
pub(crate) fn expect_status<F>(response: Response, expected: &[u16], map: F) -> Result<Response>
where
    F: Fn(u16) -> Option<Error>,
{
    let status = response.status().as_u16();
    if expected.contains(&status) {
        return Ok(response);
    }

    if let Some(err) = map(status) {
        return Err(err);
    }

    let body = response.text().unwrap_or_default();
    Err(Error::remote_api_error(status, &body))
}

pub(crate) fn decode_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
    response
        .json()
        .map_err(|e| Error::internal_json(e.to_string(), Some("decode API response".to_string())))
}

/// Commit timestamps arrive as RFC 3339; show them compactly.
pub(crate) fn format_commit_date(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

pub(crate) fn short_hash(full: &str) -> String {
    full.chars().take(12).collect()
}

pub(crate) fn first_line(message: &str) -> String {
    message.lines().next().unwrap_or_default().to_string()
}

/// Renames move a repo within its workspace; transfers are out of scope.
pub(crate) fn validate_new_name(new_name: &str) -> Result<()> {
    crate::utils::validation::require_non_empty(new_name, "newName", "New name must not be empty")?;
    if new_name.contains('/') {
        return Err(Error::validation_invalid_argument(
            "newName",
            "New name must have no workspace, transfer is not supported",
            Some(new_name.to_string()),
            None,
        ));
    }
    Ok(())
}

/// Extract the rel="next" target from a Link response header.
pub(crate) fn next_link(header: &str) -> Option<String> {
    for entry in header.split(',') {
        let mut pieces = entry.trim().splitn(2, ';');
        let url_part = pieces.next().unwrap_or("").trim();
        let rel_part = pieces.next().unwrap_or("").trim();
        if rel_part == r#"rel="next""# {
            return Some(
                url_part
                    .trim_start_matches('<')
                    .trim_end_matches('>')
                    .to_string(),
            );
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_link_finds_rel_next() {
        let header = r#"<https://api.github.com/organizations/1/repos?page=2>; rel="next", <https://api.github.com/organizations/1/repos?page=5>; rel="last""#;
        assert_eq!(
            next_link(header).as_deref(),
            Some("https://api.github.com/organizations/1/repos?page=2")
        );
    }

    #[test]
    fn next_link_is_none_on_last_page() {
        let header = r#"<https://api.github.com/organizations/1/repos?page=4>; rel="prev""#;
        assert_eq!(next_link(header), None);
    }

    #[test]
    fn commit_dates_format_compactly() {
        assert_eq!(
            format_commit_date("2013-11-08T21:26:20+00:00"),
            "2013-11-08 21:26"
        );
        assert_eq!(format_commit_date("2011-04-14T16:00:49Z"), "2011-04-14 16:00");
        assert_eq!(format_commit_date("not a date"), "not a date");
    }

    #[test]
    fn hashes_are_shortened() {
        assert_eq!(
            short_hash("61d3e40d4f29d30e7f56270dfd52a8a703fca58b"),
            "61d3e40d4f29"
        );
    }

    #[test]
    fn rename_rejects_workspace_moves() {
        assert!(validate_new_name("other-team/name").is_err());
        assert!(validate_new_name("").is_err());
        assert!(validate_new_name("just-a-name").is_ok());
    }
}
