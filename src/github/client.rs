//! GitHub REST client used by the triage core.
//!
//! Every call is a single attempt. Failures are classified into
//! [`GitHubError`] variants carrying the status code and raw payload; retry
//! and back-off policy belong to whoever hosts the binary.

use super::types::*;
use crate::config::{GithubConfig, LabelSpec};
use crate::error::GitHubError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::RequestBuilder;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde_json::json;
use std::time::Duration;
use tracing::debug;

const FILES_PER_PAGE: usize = 100;
// GitHub stops listing PR files after 3000 entries
const MAX_FILE_PAGES: usize = 30;

/// Remote repository operations the triage engine depends on.
#[async_trait]
pub trait RepositoryApi: Send + Sync {
    async fn list_pull_requests(&self) -> Result<Vec<PullRequest>, GitHubError>;

    async fn get_pull_request(&self, number: u64) -> Result<PullRequest, GitHubError>;

    async fn list_changed_files(&self, number: u64) -> Result<Vec<ChangedFile>, GitHubError>;

    /// Create a repository label. An existing label yields `GitHubError::Conflict`.
    async fn create_label(&self, label: &LabelSpec) -> Result<Label, GitHubError>;

    /// Add labels to an issue or PR, returning the full label set afterwards
    async fn add_labels(&self, number: u64, labels: &[String]) -> Result<Vec<Label>, GitHubError>;

    async fn request_reviewers(&self, number: u64, reviewers: &[String])
        -> Result<(), GitHubError>;

    async fn create_comment(&self, number: u64, body: &str) -> Result<Comment, GitHubError>;

    async fn create_issue(&self, issue: &NewIssue) -> Result<Issue, GitHubError>;

    async fn update_issue(&self, number: u64, update: &IssueUpdate)
        -> Result<Issue, GitHubError>;
}

#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    repo: RepoCoordinates,
}

impl GitHubClient {
    pub fn new(
        settings: &GithubConfig,
        repo: RepoCoordinates,
        token: &str,
    ) -> Result<Self, GitHubError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        let user_agent = HeaderValue::from_str(&settings.user_agent)
            .map_err(|e| GitHubError::InvalidRequest(format!("user agent: {}", e)))?;
        headers.insert(USER_AGENT, user_agent);

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
            .map_err(|_| GitHubError::InvalidRequest("token contains invalid characters".into()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(settings.timeout_sec))
            .build()?;

        Ok(Self {
            http,
            api_url: settings.api_url.trim_end_matches('/').to_string(),
            repo,
        })
    }

    pub fn repo(&self) -> &RepoCoordinates {
        &self.repo
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_url, self.repo.owner, self.repo.name, path
        )
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> Result<T, GitHubError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let payload = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    debug!("Failed to read {} error body: {}", what, e);
                    String::new()
                }
            };
            debug!("{} failed with {}: {}", what, status, payload);
            return Err(GitHubError::Api {
                status: status.as_u16(),
                payload,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| GitHubError::Decode {
            what: what.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl RepositoryApi for GitHubClient {
    async fn list_pull_requests(&self) -> Result<Vec<PullRequest>, GitHubError> {
        let request = self
            .http
            .get(self.url("pulls"))
            .query(&[("state", "open"), ("per_page", "100")]);
        self.send(request, "list pull requests").await
    }

    async fn get_pull_request(&self, number: u64) -> Result<PullRequest, GitHubError> {
        let request = self.http.get(self.url(&format!("pulls/{}", number)));
        self.send(request, "get pull request").await
    }

    async fn list_changed_files(&self, number: u64) -> Result<Vec<ChangedFile>, GitHubError> {
        let mut files = Vec::new();

        for page in 1..=MAX_FILE_PAGES {
            let request = self
                .http
                .get(self.url(&format!("pulls/{}/files", number)))
                .query(&[
                    ("per_page", FILES_PER_PAGE.to_string()),
                    ("page", page.to_string()),
                ]);
            let batch: Vec<ChangedFile> = self.send(request, "list changed files").await?;
            let done = batch.len() < FILES_PER_PAGE;
            files.extend(batch);
            if done {
                break;
            }
        }

        Ok(files)
    }

    async fn create_label(&self, label: &LabelSpec) -> Result<Label, GitHubError> {
        let mut payload = json!({ "name": label.name });
        if let Some(color) = &label.color {
            payload["color"] = json!(color.trim_start_matches('#'));
        }

        let request = self.http.post(self.url("labels")).json(&payload);
        match self.send(request, "create label").await {
            Err(GitHubError::Api { status, payload }) if is_already_exists(status, &payload) => {
                Err(GitHubError::Conflict { status, payload })
            }
            other => other,
        }
    }

    async fn add_labels(&self, number: u64, labels: &[String]) -> Result<Vec<Label>, GitHubError> {
        if labels.is_empty() {
            return Err(GitHubError::InvalidRequest(
                "at least one label is required".to_string(),
            ));
        }
        let request = self
            .http
            .post(self.url(&format!("issues/{}/labels", number)))
            .json(&json!({ "labels": labels }));
        self.send(request, "add labels").await
    }

    async fn request_reviewers(
        &self,
        number: u64,
        reviewers: &[String],
    ) -> Result<(), GitHubError> {
        let request = self
            .http
            .post(self.url(&format!("pulls/{}/requested_reviewers", number)))
            .json(&json!({ "reviewers": reviewers }));
        let _: IgnoredAny = self.send(request, "request reviewers").await?;
        Ok(())
    }

    async fn create_comment(&self, number: u64, body: &str) -> Result<Comment, GitHubError> {
        let request = self
            .http
            .post(self.url(&format!("issues/{}/comments", number)))
            .json(&json!({ "body": body }));
        self.send(request, "create comment").await
    }

    async fn create_issue(&self, issue: &NewIssue) -> Result<Issue, GitHubError> {
        if issue.title.trim().is_empty() {
            return Err(GitHubError::InvalidRequest(
                "issue title is required".to_string(),
            ));
        }
        let request = self.http.post(self.url("issues")).json(issue);
        self.send(request, "create issue").await
    }

    async fn update_issue(
        &self,
        number: u64,
        update: &IssueUpdate,
    ) -> Result<Issue, GitHubError> {
        let request = self
            .http
            .patch(self.url(&format!("issues/{}", number)))
            .json(update);
        self.send(request, "update issue").await
    }
}

/// 409, or GitHub's 422 validation failure with an `already_exists` code
fn is_already_exists(status: u16, payload: &str) -> bool {
    match status {
        409 => true,
        422 => payload.contains("already_exists"),
        _ => false,
    }
}
