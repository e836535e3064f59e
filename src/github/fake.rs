//! In-memory `RepositoryApi` for exercising the triage engine without HTTP.

use super::client::RepositoryApi;
use super::types::*;
use crate::config::LabelSpec;
use crate::error::GitHubError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListPullRequests,
    GetPullRequest,
    ListChangedFiles,
    CreateLabel,
    AddLabels,
    RequestReviewers,
    CreateComment,
    CreateIssue,
    UpdateIssue,
}

#[derive(Debug, Default)]
pub struct FakeRepository {
    pulls: Mutex<HashMap<u64, PullRequest>>,
    files: Mutex<HashMap<u64, Vec<ChangedFile>>>,
    labels: Mutex<Vec<LabelSpec>>,
    pr_labels: Mutex<HashMap<u64, Vec<String>>>,
    reviewers: Mutex<HashMap<u64, Vec<String>>>,
    comments: Mutex<Vec<(u64, String)>>,
    issues: Mutex<Vec<Issue>>,
    failures: Mutex<HashMap<Operation, u16>>,
    calls: Mutex<Vec<Operation>>,
}

impl FakeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pull(self, number: u64, title: &str, body: Option<&str>, files: &[&str]) -> Self {
        self.pulls.lock().unwrap().insert(
            number,
            PullRequest {
                number,
                title: title.to_string(),
                body: body.map(str::to_string),
                state: "open".to_string(),
                draft: false,
                html_url: None,
                user: None,
            },
        );
        self.files.lock().unwrap().insert(
            number,
            files
                .iter()
                .map(|f| ChangedFile {
                    filename: f.to_string(),
                    status: "modified".to_string(),
                    additions: 1,
                    deletions: 0,
                    changes: 1,
                })
                .collect(),
        );
        self
    }

    pub fn with_label(self, name: &str) -> Self {
        self.labels.lock().unwrap().push(LabelSpec::new(name, None));
        self
    }

    /// Make every call to `op` fail with the given HTTP status
    pub fn fail(self, op: Operation, status: u16) -> Self {
        self.failures.lock().unwrap().insert(op, status);
        self
    }

    pub fn calls(&self) -> Vec<Operation> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called(&self, op: Operation) -> bool {
        self.calls().contains(&op)
    }

    pub fn labels_on(&self, number: u64) -> Vec<String> {
        self.pr_labels
            .lock()
            .unwrap()
            .get(&number)
            .cloned()
            .unwrap_or_default()
    }

    pub fn reviewers_on(&self, number: u64) -> Vec<String> {
        self.reviewers
            .lock()
            .unwrap()
            .get(&number)
            .cloned()
            .unwrap_or_default()
    }

    pub fn comments(&self) -> Vec<(u64, String)> {
        self.comments.lock().unwrap().clone()
    }

    pub fn repo_labels(&self) -> Vec<String> {
        self.labels
            .lock()
            .unwrap()
            .iter()
            .map(|l| l.name.clone())
            .collect()
    }

    fn enter(&self, op: Operation) -> Result<(), GitHubError> {
        self.calls.lock().unwrap().push(op);
        match self.failures.lock().unwrap().get(&op) {
            Some(&status) => Err(GitHubError::Api {
                status,
                payload: format!("{{\"message\":\"injected {:?} failure\"}}", op),
            }),
            None => Ok(()),
        }
    }

    fn not_found() -> GitHubError {
        GitHubError::Api {
            status: 404,
            payload: "{\"message\":\"Not Found\"}".to_string(),
        }
    }
}

#[async_trait]
impl RepositoryApi for FakeRepository {
    async fn list_pull_requests(&self) -> Result<Vec<PullRequest>, GitHubError> {
        self.enter(Operation::ListPullRequests)?;
        let mut pulls: Vec<_> = self.pulls.lock().unwrap().values().cloned().collect();
        pulls.sort_by_key(|p| p.number);
        Ok(pulls)
    }

    async fn get_pull_request(&self, number: u64) -> Result<PullRequest, GitHubError> {
        self.enter(Operation::GetPullRequest)?;
        self.pulls
            .lock()
            .unwrap()
            .get(&number)
            .cloned()
            .ok_or_else(Self::not_found)
    }

    async fn list_changed_files(&self, number: u64) -> Result<Vec<ChangedFile>, GitHubError> {
        self.enter(Operation::ListChangedFiles)?;
        self.files
            .lock()
            .unwrap()
            .get(&number)
            .cloned()
            .ok_or_else(Self::not_found)
    }

    async fn create_label(&self, label: &LabelSpec) -> Result<Label, GitHubError> {
        self.enter(Operation::CreateLabel)?;
        let mut labels = self.labels.lock().unwrap();
        if labels.iter().any(|l| l.name.eq_ignore_ascii_case(&label.name)) {
            return Err(GitHubError::Conflict {
                status: 422,
                payload: "{\"errors\":[{\"code\":\"already_exists\"}]}".to_string(),
            });
        }
        labels.push(label.clone());
        Ok(Label {
            name: label.name.clone(),
            color: label.color.clone(),
        })
    }

    async fn add_labels(&self, number: u64, labels: &[String]) -> Result<Vec<Label>, GitHubError> {
        self.enter(Operation::AddLabels)?;
        let mut pr_labels = self.pr_labels.lock().unwrap();
        let current = pr_labels.entry(number).or_default();
        for label in labels {
            if !current.contains(label) {
                current.push(label.clone());
            }
        }
        Ok(current
            .iter()
            .map(|name| Label {
                name: name.clone(),
                color: None,
            })
            .collect())
    }

    async fn request_reviewers(
        &self,
        number: u64,
        reviewers: &[String],
    ) -> Result<(), GitHubError> {
        self.enter(Operation::RequestReviewers)?;
        self.reviewers
            .lock()
            .unwrap()
            .insert(number, reviewers.to_vec());
        Ok(())
    }

    async fn create_comment(&self, number: u64, body: &str) -> Result<Comment, GitHubError> {
        self.enter(Operation::CreateComment)?;
        let mut comments = self.comments.lock().unwrap();
        comments.push((number, body.to_string()));
        Ok(Comment {
            id: comments.len() as u64,
            html_url: None,
        })
    }

    async fn create_issue(&self, issue: &NewIssue) -> Result<Issue, GitHubError> {
        self.enter(Operation::CreateIssue)?;
        let mut issues = self.issues.lock().unwrap();
        let created = Issue {
            number: 1000 + issues.len() as u64,
            title: issue.title.clone(),
            state: "open".to_string(),
            html_url: None,
        };
        issues.push(created.clone());
        Ok(created)
    }

    async fn update_issue(
        &self,
        number: u64,
        update: &IssueUpdate,
    ) -> Result<Issue, GitHubError> {
        self.enter(Operation::UpdateIssue)?;
        let mut issues = self.issues.lock().unwrap();
        let issue = issues
            .iter_mut()
            .find(|i| i.number == number)
            .ok_or_else(Self::not_found)?;
        if let Some(title) = &update.title {
            issue.title = title.clone();
        }
        if let Some(state) = &update.state {
            issue.state = state.clone();
        }
        Ok(issue.clone())
    }
}
