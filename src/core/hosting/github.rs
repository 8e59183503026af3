//! GitHub REST API (v3) backend.

use serde::Deserialize;

use super::{
    decode_json, expect_status, first_line, format_commit_date, next_link, short_hash,
    validate_new_name, ApiClient, CommitSummary, RepoHost, RepoSummary,
};
use crate::config::Credentials;
use crate::error::{Error, Result};
use crate::workspace::RepoRef;

const API_ROOT: &str = "https://api.github.com";

pub struct Github {
    api: ApiClient,
    username: Option<String>,
}

#[derive(Deserialize)]
struct RepoData {
    name: String,
    full_name: String,
    #[serde(default)]
    size: u64,
    #[serde(default)]
    private: bool,
    ssh_url: Option<String>,
    clone_url: Option<String>,
}

#[derive(Deserialize)]
struct CommitData {
    sha: String,
    commit: CommitDetail,
}

#[derive(Deserialize)]
struct CommitDetail {
    #[serde(default)]
    message: String,
    author: Option<CommitAuthor>,
}

#[derive(Deserialize)]
struct CommitAuthor {
    name: Option<String>,
    email: Option<String>,
    date: Option<String>,
}

impl RepoData {
    fn into_summary(self) -> RepoSummary {
        RepoSummary {
            full_name: self.full_name,
            scm: "git".to_string(),
            size: self.size,
            access: if self.private { "private" } else { "public" }.to_string(),
        }
    }
}

impl CommitData {
    fn into_summary(self) -> CommitSummary {
        let author = match &self.commit.author {
            Some(a) => format!(
                "{} <{}>",
                a.name.as_deref().unwrap_or_default(),
                a.email.as_deref().unwrap_or_default()
            ),
            None => String::new(),
        };
        let date = self
            .commit
            .author
            .as_ref()
            .and_then(|a| a.date.as_deref())
            .unwrap_or_default();

        CommitSummary {
            hash: short_hash(&self.sha),
            author,
            date: format_commit_date(date),
            message: first_line(&self.commit.message),
        }
    }
}

impl Github {
    pub fn new(credentials: Option<&Credentials>) -> Result<Self> {
        Ok(Self {
            api: ApiClient::new(credentials)?,
            username: credentials.map(|c| c.username.clone()),
        })
    }

    fn repo_url(repo: &RepoRef) -> String {
        format!("{}/repos/{}", API_ROOT, repo.full_name())
    }

    fn status_error(status: u16, name: &str) -> Option<Error> {
        match status {
            401 => Some(Error::repo_access_denied(name)),
            404 => Some(Error::repo_not_found(name)),
            _ => None,
        }
    }

    fn check(
        response: reqwest::blocking::Response,
        expected: &[u16],
        name: &str,
    ) -> Result<reqwest::blocking::Response> {
        expect_status(response, expected, |status| Self::status_error(status, name))
    }

    fn fetch(&self, repo: &RepoRef) -> Result<RepoData> {
        let response = self.api.get(&Self::repo_url(repo))?;
        let response = Self::check(response, &[200], &repo.global_name())?;
        decode_json(response)
    }

    /// New repositories go under an organization, unless the workspace
    /// is the authenticated user itself.
    fn create_url(&self, repo: &RepoRef) -> String {
        let workspace = &repo.owner.workspace;
        match &self.username {
            Some(username) if username == workspace => format!("{}/user/repos", API_ROOT),
            _ => format!("{}/orgs/{}/repos", API_ROOT, workspace),
        }
    }
}

impl RepoHost for Github {
    fn info(&self, repo: &RepoRef) -> Result<RepoSummary> {
        Ok(self.fetch(repo)?.into_summary())
    }

    fn ls(&self, workspace: &str) -> Result<Vec<RepoSummary>> {
        let mut response = self.api.get(&format!("{}/orgs/{}/repos", API_ROOT, workspace))?;
        if response.status().as_u16() == 404 {
            // Not an organization. Try as a user.
            response = self
                .api
                .get(&format!("{}/users/{}/repos", API_ROOT, workspace))?;
        }

        let mut repos = Vec::new();
        let mut pending = Some(response);

        while let Some(response) = pending.take() {
            let response = Self::check(response, &[200], workspace)?;
            let next = response
                .headers()
                .get(reqwest::header::LINK)
                .and_then(|v| v.to_str().ok())
                .and_then(next_link);

            let page: Vec<RepoData> = decode_json(response)?;
            repos.extend(page.into_iter().map(RepoData::into_summary));

            if let Some(url) = next {
                pending = Some(self.api.get(&url)?);
            }
        }

        Ok(repos)
    }

    fn head(&self, repo: &RepoRef, limit: usize) -> Result<Vec<CommitSummary>> {
        let url = format!("{}/commits", Self::repo_url(repo));
        let response = self.api.get(&url)?;

        // 409 means the repository exists but has no commits yet.
        let response = Self::check(response, &[200, 409], &repo.global_name())?;
        if response.status().as_u16() == 409 {
            return Ok(Vec::new());
        }

        let commits: Vec<CommitData> = decode_json(response)?;
        Ok(commits
            .into_iter()
            .take(limit)
            .map(CommitData::into_summary)
            .collect())
    }

    fn create(&self, repo: &RepoRef) -> Result<RepoSummary> {
        let body = serde_json::json!({ "name": repo.slug, "private": true });
        let response = self.api.post_json(&self.create_url(repo), &body)?;
        let response = Self::check(response, &[201], &repo.global_name())?;
        let data: RepoData = decode_json(response)?;
        Ok(data.into_summary())
    }

    fn delete(&self, repo: &RepoRef) -> Result<()> {
        let response = self.api.delete(&Self::repo_url(repo))?;
        Self::check(response, &[204], &repo.global_name())?;
        Ok(())
    }

    fn rename(&self, repo: &RepoRef, new_name: &str) -> Result<String> {
        validate_new_name(new_name)?;
        self.fetch(repo)?;

        let body = serde_json::json!({ "name": new_name });
        let response = self.api.patch_json(&Self::repo_url(repo), &body)?;
        let response = Self::check(response, &[200], &repo.global_name())?;
        let data: RepoData = decode_json(response)?;

        Ok(data
            .name
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string())
    }

    fn clone_url(&self, repo: &RepoRef) -> Result<String> {
        let data = self.fetch(repo)?;

        data.ssh_url
            .or(data.clone_url)
            .ok_or_else(|| {
                Error::internal_unexpected(format!(
                    "No clone link for '{}' in API response",
                    repo.global_name()
                ))
            })
    }
}
