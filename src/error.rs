use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Classification carried into triage results so callers can map failures
/// without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ConfigurationMissing,
    ValidationFailure,
    RemoteConflict,
    RemoteFailure,
    TransportFailure,
}

#[derive(Error, Debug)]
pub enum TriageError {
    #[error("Configuration missing: {0}")]
    ConfigurationMissing(String),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("GitHub error: {0}")]
    GitHub(#[from] GitHubError),
}

impl TriageError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TriageError::ConfigurationMissing(_) => ErrorKind::ConfigurationMissing,
            TriageError::Validation(_) | TriageError::Config(_) => ErrorKind::ValidationFailure,
            TriageError::GitHub(e) => e.kind(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            TriageError::GitHub(e) => e.status(),
            _ => None,
        }
    }

    pub fn payload(&self) -> Option<&str> {
        match self {
            TriageError::GitHub(e) => e.payload(),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid glob pattern '{pattern}' in ownership rule '{rule}': {source}")]
    GlobPattern {
        rule: String,
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Invalid color '{color}' for label '{label}' (expected six hex digits)")]
    InvalidColor { label: String, color: String },

    #[error("always_reviewers must name at least one reviewer, with no blank entries")]
    MissingAlwaysReviewer,

    #[error("Ownership rule name must not be empty")]
    EmptyRuleName,

    #[error("Duplicate ownership rule '{0}'")]
    DuplicateRule(String),
}

#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("GitHub API conflict ({status}): {payload}")]
    Conflict { status: u16, payload: String },

    #[error("GitHub API error ({status}): {payload}")]
    Api { status: u16, payload: String },

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode GitHub response for {what}: {message}")]
    Decode { what: String, message: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl GitHubError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GitHubError::Conflict { .. } => ErrorKind::RemoteConflict,
            GitHubError::Api { .. } | GitHubError::Decode { .. } => ErrorKind::RemoteFailure,
            GitHubError::Transport(_) => ErrorKind::TransportFailure,
            GitHubError::InvalidRequest(_) => ErrorKind::ValidationFailure,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            GitHubError::Conflict { status, .. } | GitHubError::Api { status, .. } => {
                Some(*status)
            }
            GitHubError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Raw error body returned by the API, if any.
    pub fn payload(&self) -> Option<&str> {
        match self {
            GitHubError::Conflict { payload, .. } | GitHubError::Api { payload, .. } => {
                Some(payload.as_str())
            }
            _ => None,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, GitHubError::Conflict { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        let conflict = GitHubError::Conflict {
            status: 422,
            payload: "{}".to_string(),
        };
        assert_eq!(conflict.kind(), ErrorKind::RemoteConflict);
        assert!(conflict.is_conflict());

        let api = GitHubError::Api {
            status: 500,
            payload: "boom".to_string(),
        };
        assert_eq!(api.kind(), ErrorKind::RemoteFailure);
        assert_eq!(api.status(), Some(500));
        assert_eq!(api.payload(), Some("boom"));

        let wrapped = TriageError::from(api);
        assert_eq!(wrapped.kind(), ErrorKind::RemoteFailure);
        assert_eq!(wrapped.status(), Some(500));

        let missing = TriageError::ConfigurationMissing("GITHUB_TOKEN".to_string());
        assert_eq!(missing.kind(), ErrorKind::ConfigurationMissing);
        assert_eq!(missing.status(), None);
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::ValidationFailure).unwrap();
        assert_eq!(json, "\"validation_failure\"");
    }
}
