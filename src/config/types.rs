use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::defaults::*;

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub github: GithubConfig,

    /// Labels the classifier may emit, with the color used when creating them
    #[serde(default = "default_labels")]
    pub labels: Vec<LabelSpec>,

    /// Reviewers requested on every PR regardless of ownership; at least one
    #[serde(default = "default_always_reviewers")]
    pub always_reviewers: Vec<String>,

    /// Evaluated in order; team names are reported in this order
    #[serde(default = "default_ownership")]
    pub ownership: Vec<OwnershipRule>,
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct GithubConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// owner/name; overridden by --repo or GITHUB_REPO
    #[serde(default)]
    pub repo: Option<String>,

    #[serde(default = "default_timeout_sec")]
    pub timeout_sec: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            repo: None,
            timeout_sec: default_timeout_sec(),
            user_agent: default_user_agent(),
        }
    }
}

/// A repository label and the color to create it with.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct LabelSpec {
    pub name: String,

    /// Hex color, with or without a leading '#'
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl LabelSpec {
    pub fn new(name: impl Into<String>, color: Option<&str>) -> Self {
        Self {
            name: name.into(),
            color: color.map(|c| c.trim_start_matches('#').to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct OwnershipRule {
    /// Team identifier reported when the rule triggers
    pub name: String,

    pub patterns: Vec<String>,

    #[serde(default)]
    pub reviewers: Vec<String>,
}
