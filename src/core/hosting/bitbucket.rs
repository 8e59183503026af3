//! Bitbucket Cloud REST API (2.0) backend.

use serde::Deserialize;

use super::{
    decode_json, expect_status, first_line, format_commit_date, short_hash, validate_new_name,
    ApiClient, CommitSummary, RepoHost, RepoSummary,
};
use crate::config::Credentials;
use crate::error::{Error, Result};
use crate::workspace::RepoRef;

const BASE_URL: &str = "https://api.bitbucket.org/2.0/repositories";

pub struct Bitbucket {
    api: ApiClient,
}

#[derive(Deserialize)]
struct RepoData {
    full_name: String,
    scm: Option<String>,
    #[serde(default)]
    size: u64,
    #[serde(default)]
    is_private: bool,
    links: Option<RepoLinks>,
}

#[derive(Deserialize)]
struct RepoLinks {
    #[serde(default)]
    clone: Vec<CloneLink>,
}

#[derive(Deserialize)]
struct CloneLink {
    name: String,
    href: String,
}

#[derive(Deserialize)]
struct RepoPage {
    #[serde(default)]
    values: Vec<RepoData>,
    next: Option<String>,
}

#[derive(Deserialize)]
struct CommitsPage {
    #[serde(default)]
    values: Vec<CommitData>,
}

#[derive(Deserialize)]
struct CommitData {
    hash: String,
    #[serde(default)]
    date: String,
    #[serde(default)]
    message: String,
    author: Option<CommitAuthor>,
}

#[derive(Deserialize)]
struct CommitAuthor {
    raw: Option<String>,
}

impl RepoData {
    fn into_summary(self) -> RepoSummary {
        RepoSummary {
            full_name: self.full_name,
            scm: self.scm.unwrap_or_else(|| "git".to_string()),
            size: self.size,
            access: if self.is_private { "private" } else { "public" }.to_string(),
        }
    }
}

impl CommitData {
    fn into_summary(self) -> CommitSummary {
        CommitSummary {
            hash: short_hash(&self.hash),
            author: self.author.and_then(|a| a.raw).unwrap_or_default(),
            date: format_commit_date(&self.date),
            message: first_line(&self.message),
        }
    }
}

impl Bitbucket {
    pub fn new(credentials: Option<&Credentials>) -> Result<Self> {
        Ok(Self {
            api: ApiClient::new(credentials)?,
        })
    }

    fn repo_url(repo: &RepoRef) -> String {
        format!("{}/{}", BASE_URL, repo.full_name())
    }

    fn status_error(status: u16, name: &str) -> Option<Error> {
        match status {
            403 => Some(Error::repo_access_denied(name)),
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
}

impl RepoHost for Bitbucket {
    fn info(&self, repo: &RepoRef) -> Result<RepoSummary> {
        Ok(self.fetch(repo)?.into_summary())
    }

    fn ls(&self, workspace: &str) -> Result<Vec<RepoSummary>> {
        let mut next = Some(format!("{}/{}?sort=slug", BASE_URL, workspace));
        let mut repos = Vec::new();

        while let Some(url) = next {
            let response = self.api.get(&url)?;
            let response = Self::check(response, &[200], workspace)?;
            let page: RepoPage = decode_json(response)?;

            next = page.next;
            repos.extend(page.values.into_iter().map(RepoData::into_summary));
        }

        Ok(repos)
    }

    fn head(&self, repo: &RepoRef, limit: usize) -> Result<Vec<CommitSummary>> {
        let url = format!("{}/commits", Self::repo_url(repo));
        let response = self.api.get(&url)?;
        let response = Self::check(response, &[200], &repo.global_name())?;
        let page: CommitsPage = decode_json(response)?;

        Ok(page
            .values
            .into_iter()
            .take(limit)
            .map(CommitData::into_summary)
            .collect())
    }

    fn create(&self, repo: &RepoRef) -> Result<RepoSummary> {
        let response = self.api.post_empty(&Self::repo_url(repo))?;
        let response = Self::check(response, &[200], &repo.global_name())?;
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

        let response = self
            .api
            .put_form(&Self::repo_url(repo), &[("name", new_name)])?;
        let response = Self::check(response, &[200], &repo.global_name())?;

        // The API may adjust the slug; the Location header carries the
        // repository's new address.
        let real_name = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|location| location.rsplit('/').next())
            .filter(|s| !s.is_empty())
            .unwrap_or(new_name)
            .to_string();

        Ok(real_name)
    }

    fn clone_url(&self, repo: &RepoRef) -> Result<String> {
        let data = self.fetch(repo)?;
        let links = data.links.map(|l| l.clone).unwrap_or_default();

        links
            .iter()
            .find(|link| link.name == "ssh")
            .or_else(|| links.iter().find(|link| link.name == "https"))
            .map(|link| link.href.clone())
            .ok_or_else(|| {
                Error::internal_unexpected(format!(
                    "No clone link for '{}' in API response",
                    repo.global_name()
                ))
            })
    }
}
