pub mod assign;
pub mod init;
pub mod issue;
pub mod label;
pub mod pulls;
pub mod schema;
pub mod triage;

use crate::config::Config;
use crate::error::TriageError;
use crate::github::{GitHubClient, RepoCoordinates};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "prtriage")]
#[command(
    author,
    version,
    about = "Triage GitHub pull requests: classify, label, and route to reviewers"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

#[derive(Args, Clone, Debug)]
pub struct GlobalArgs {
    /// Path to config file (built-in defaults when missing)
    #[arg(short, long, global = true, default_value = "prtriage.yaml")]
    pub config: PathBuf,

    /// Repository (owner/name); overrides github.repo in config
    #[arg(long, global = true, env = "GITHUB_REPO")]
    pub repo: Option<String>,

    /// GitHub access token
    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify, label, assign reviewers and comment on a PR
    Triage(TriageArgs),

    /// Create (if needed) and apply labels to a PR
    Label(LabelArgs),

    /// Request reviewers for a PR based on ownership rules
    Assign(AssignArgs),

    /// Create every configured label on the repository
    Init(InitArgs),

    /// List open pull requests
    Prs,

    /// Show details for a pull request
    Pr(PrArgs),

    /// Create or update issues
    #[command(subcommand)]
    Issue(IssueCommand),

    /// Print JSON Schema for the config file or triage request
    Schema(SchemaArgs),
}

#[derive(Parser, Clone)]
pub struct TriageArgs {
    /// Pull request number
    #[arg(
        long,
        allow_negative_numbers = true,
        required_unless_present = "request",
        conflicts_with = "request"
    )]
    pub pr: Option<i64>,

    /// JSON triage request file ({"number": N}); "-" reads stdin
    #[arg(long, value_name = "FILE")]
    pub request: Option<PathBuf>,
}

#[derive(Parser, Clone)]
pub struct LabelArgs {
    /// Pull request number
    #[arg(long, allow_negative_numbers = true)]
    pub pr: i64,

    /// Labels to apply (comma-separated)
    #[arg(long = "label", value_delimiter = ',', required = true)]
    pub labels: Vec<String>,
}

#[derive(Parser, Clone)]
pub struct AssignArgs {
    /// Pull request number
    #[arg(
        long,
        allow_negative_numbers = true,
        required_unless_present = "files",
        conflicts_with = "files"
    )]
    pub pr: Option<i64>,

    /// Resolve these paths locally instead of fetching a PR (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub files: Option<Vec<String>>,
}

#[derive(Parser, Clone)]
pub struct InitArgs {
    /// Preview labels without creating
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Parser, Clone)]
pub struct PrArgs {
    /// Pull request number
    #[arg(long, allow_negative_numbers = true)]
    pub pr: i64,
}

#[derive(Subcommand, Clone)]
pub enum IssueCommand {
    /// Open a new issue
    Create(IssueCreateArgs),

    /// Replace the body of an existing issue
    Update(IssueUpdateArgs),
}

#[derive(Parser, Clone)]
pub struct IssueCreateArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub body: Option<String>,

    #[arg(long = "label")]
    pub labels: Vec<String>,

    #[arg(long = "assignee")]
    pub assignees: Vec<String>,
}

#[derive(Parser, Clone)]
pub struct IssueUpdateArgs {
    /// Issue number
    #[arg(long, allow_negative_numbers = true)]
    pub number: i64,

    #[arg(long)]
    pub body: String,
}

#[derive(Parser, Clone)]
pub struct SchemaArgs {
    /// Print the triage request schema instead of the config schema
    #[arg(long)]
    pub request: bool,
}

/// Repository and token, required before any remote call
pub fn credentials(
    global: &GlobalArgs,
    config: &Config,
) -> Result<(RepoCoordinates, String), TriageError> {
    let repo = global
        .repo
        .clone()
        .or_else(|| config.github.repo.clone())
        .filter(|r| !r.trim().is_empty())
        .ok_or_else(|| {
            TriageError::ConfigurationMissing(
                "GitHub repository not set. Use --repo owner/name, GITHUB_REPO or github.repo"
                    .to_string(),
            )
        })?;
    let token = global
        .token
        .clone()
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| {
            TriageError::ConfigurationMissing("GITHUB_TOKEN not set in environment".to_string())
        })?;

    let repo: RepoCoordinates = repo.parse().map_err(TriageError::Validation)?;
    Ok((repo, token))
}

pub fn connect(global: &GlobalArgs, config: &Config) -> Result<GitHubClient, TriageError> {
    let (repo, token) = credentials(global, config)?;
    Ok(GitHubClient::new(&config.github, repo, &token)?)
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn global(repo: Option<&str>, token: Option<&str>) -> GlobalArgs {
        GlobalArgs {
            config: PathBuf::from("prtriage.yaml"),
            repo: repo.map(str::to_string),
            token: token.map(str::to_string),
            verbose: false,
        }
    }

    #[test]
    fn test_missing_token_is_configuration_missing() {
        let err = credentials(&global(Some("acme/widgets"), None), &Config::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigurationMissing);
    }

    #[test]
    fn test_missing_repo_is_configuration_missing() {
        let err = credentials(&global(None, Some("t")), &Config::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigurationMissing);
    }

    #[test]
    fn test_repo_falls_back_to_config() {
        let mut config = Config::default();
        config.github.repo = Some("acme/widgets".to_string());
        let (repo, token) = credentials(&global(None, Some("t")), &config).unwrap();
        assert_eq!(repo.to_string(), "acme/widgets");
        assert_eq!(token, "t");
    }

    #[test]
    fn test_malformed_repo_is_validation_failure() {
        let err = credentials(&global(Some("widgets"), Some("t")), &Config::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailure);
    }

    #[test]
    fn test_cli_parses_triage() {
        let cli = Cli::try_parse_from(["prtriage", "triage", "--pr", "42", "--repo", "a/b"]).unwrap();
        assert_eq!(cli.global.repo.as_deref(), Some("a/b"));
        match cli.command {
            Commands::Triage(args) => assert_eq!(args.pr, Some(42)),
            _ => panic!("expected triage"),
        }
    }

    #[test]
    fn test_cli_triage_requires_pr_or_request() {
        assert!(Cli::try_parse_from(["prtriage", "triage"]).is_err());
    }
}
