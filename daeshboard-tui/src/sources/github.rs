//! GitHub REST sources: pull requests, issues and workflow runs.
//!
//! Every list endpoint is paged by following the `Link: <...>; rel="next"`
//! header until it disappears. Pagination state lives only inside one fetch.

use crate::config::Repo;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use daeshboard_core::{Item, SourceAdapter, SourceError};
use regex::Regex;
use reqwest::header::{ACCEPT, LINK};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::OnceLock;

pub const GITHUB_API: &str = "https://api.github.com";

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub title: String,
    pub html_url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub title: String,
    pub html_url: String,
    pub created_at: DateTime<Utc>,
    /// Present when the "issue" is really a pull request.
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowRunPage {
    #[serde(default)]
    pub workflow_runs: Vec<WorkflowRun>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowRun {
    #[serde(default)]
    pub name: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub conclusion: Option<String>,
}

// ============================================================================
// Item formatting
// ============================================================================

/// Newest first, formatted as `owner/name: title`.
pub fn pull_request_items(repo: &Repo, mut pulls: Vec<PullRequest>) -> Vec<Item> {
    pulls.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    pulls
        .into_iter()
        .map(|pr| Item::new(format!("{repo}: {}", pr.title)).with_url(pr.html_url))
        .collect()
}

/// Same as pull requests, minus entries that are pull requests.
pub fn issue_items(repo: &Repo, issues: Vec<Issue>) -> Vec<Item> {
    let mut issues: Vec<Issue> = issues
        .into_iter()
        .filter(|issue| issue.pull_request.is_none())
        .collect();
    issues.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    issues
        .into_iter()
        .map(|issue| Item::new(format!("{repo}: {}", issue.title)).with_url(issue.html_url))
        .collect()
}

/// `[conclusion] owner/name: run name`, in the order GitHub returns them.
pub fn workflow_run_items(repo: &Repo, runs: Vec<WorkflowRun>) -> Vec<Item> {
    runs.into_iter()
        .map(|run| {
            let state = run
                .conclusion
                .or(run.status)
                .unwrap_or_else(|| "unknown".to_string());
            let name = run.name.unwrap_or_default();
            Item::new(format!("[{state}] {repo}: {name}")).with_url(run.html_url)
        })
        .collect()
}

/// Extract the next page URL from a `Link` header.
pub fn next_page_url(link_header: &str) -> Option<String> {
    static NEXT_PAGE: OnceLock<Regex> = OnceLock::new();
    let pattern = NEXT_PAGE
        .get_or_init(|| Regex::new(r#"<(\S+)>; rel="next""#).expect("Invalid link regex"));
    pattern
        .captures(link_header)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

// ============================================================================
// Client
// ============================================================================

#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    token: Option<String>,
    base_url: String,
}

impl GithubClient {
    pub fn new(http: reqwest::Client, token: Option<String>) -> Self {
        Self {
            http,
            token,
            base_url: GITHUB_API.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn repo_url(&self, repo: &Repo, path: &str) -> String {
        format!("{}/repos/{}/{}/{}", self.base_url, repo.owner, repo.name, path)
    }

    /// Fetch `first` and every page linked after it.
    async fn fetch_pages<P: DeserializeOwned>(&self, first: String) -> Result<Vec<P>, SourceError> {
        let mut pages = Vec::new();
        let mut next = Some(first);

        while let Some(url) = next {
            let mut request = self
                .http
                .get(&url)
                .header(ACCEPT, "application/vnd.github+json");
            if let Some(token) = &self.token {
                request = request.bearer_auth(token);
            }

            let response = request.send().await.map_err(|err| SourceError::Http {
                url: url.clone(),
                reason: err.to_string(),
            })?;
            if response.status() != StatusCode::OK {
                return Err(SourceError::Status {
                    url,
                    status: response.status().as_u16(),
                });
            }

            next = response
                .headers()
                .get(LINK)
                .and_then(|value| value.to_str().ok())
                .and_then(next_page_url);

            let page = response.json::<P>().await.map_err(|err| SourceError::Decode {
                url: url.clone(),
                reason: err.to_string(),
            })?;
            pages.push(page);
        }

        Ok(pages)
    }

    pub async fn list_pulls(&self, repo: &Repo) -> Result<Vec<PullRequest>, SourceError> {
        let pages: Vec<Vec<PullRequest>> = self.fetch_pages(self.repo_url(repo, "pulls")).await?;
        Ok(pages.into_iter().flatten().collect())
    }

    pub async fn list_issues(&self, repo: &Repo) -> Result<Vec<Issue>, SourceError> {
        let pages: Vec<Vec<Issue>> = self.fetch_pages(self.repo_url(repo, "issues")).await?;
        Ok(pages.into_iter().flatten().collect())
    }

    pub async fn list_workflow_runs(&self, repo: &Repo) -> Result<Vec<WorkflowRun>, SourceError> {
        let pages: Vec<WorkflowRunPage> = self
            .fetch_pages(self.repo_url(repo, "actions/runs"))
            .await?;
        Ok(pages
            .into_iter()
            .flat_map(|page| page.workflow_runs)
            .collect())
    }
}

// ============================================================================
// Adapters
// ============================================================================

pub struct GithubPulls {
    client: GithubClient,
    repos: Vec<Repo>,
}

impl GithubPulls {
    pub fn new(client: GithubClient, repos: Vec<Repo>) -> Self {
        Self { client, repos }
    }
}

#[async_trait]
impl SourceAdapter for GithubPulls {
    fn name(&self) -> &str {
        "github-pulls"
    }

    async fn fetch(&self) -> Result<Vec<Item>, SourceError> {
        let mut items = Vec::new();
        for repo in &self.repos {
            let pulls = self.client.list_pulls(repo).await?;
            items.extend(pull_request_items(repo, pulls));
        }
        Ok(items)
    }
}

pub struct GithubIssues {
    client: GithubClient,
    repos: Vec<Repo>,
}

impl GithubIssues {
    pub fn new(client: GithubClient, repos: Vec<Repo>) -> Self {
        Self { client, repos }
    }
}

#[async_trait]
impl SourceAdapter for GithubIssues {
    fn name(&self) -> &str {
        "github-issues"
    }

    async fn fetch(&self) -> Result<Vec<Item>, SourceError> {
        let mut items = Vec::new();
        for repo in &self.repos {
            let issues = self.client.list_issues(repo).await?;
            items.extend(issue_items(repo, issues));
        }
        Ok(items)
    }
}

pub struct GithubWorkflowRuns {
    client: GithubClient,
    repos: Vec<Repo>,
}

impl GithubWorkflowRuns {
    pub fn new(client: GithubClient, repos: Vec<Repo>) -> Self {
        Self { client, repos }
    }
}

#[async_trait]
impl SourceAdapter for GithubWorkflowRuns {
    fn name(&self) -> &str {
        "github-workflow-runs"
    }

    async fn fetch(&self) -> Result<Vec<Item>, SourceError> {
        let mut items = Vec::new();
        for repo in &self.repos {
            let runs = self.client.list_workflow_runs(repo).await?;
            items.extend(workflow_run_items(repo, runs));
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_link_is_found_among_others() {
        let header = r#"<https://api.github.com/repositories/1/pulls?page=1>; rel="prev", <https://api.github.com/repositories/1/pulls?page=3>; rel="next", <https://api.github.com/repositories/1/pulls?page=9>; rel="last""#;
        assert_eq!(
            next_page_url(header).as_deref(),
            Some("https://api.github.com/repositories/1/pulls?page=3")
        );
    }

    #[test]
    fn last_page_has_no_next_link() {
        let header = r#"<https://api.github.com/repositories/1/pulls?page=1>; rel="first", <https://api.github.com/repositories/1/pulls?page=2>; rel="prev""#;
        assert_eq!(next_page_url(header), None);
        assert_eq!(next_page_url(""), None);
    }

    #[test]
    fn repo_urls_use_base() {
        let client = GithubClient::new(reqwest::Client::new(), None)
            .with_base_url("http://localhost:9000/");
        let repo: Repo = "octo/cat".parse().unwrap();
        assert_eq!(
            client.repo_url(&repo, "actions/runs"),
            "http://localhost:9000/repos/octo/cat/actions/runs"
        );
    }
}
