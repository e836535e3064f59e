use crate::cli::{connect, print_json, GlobalArgs, PrArgs};
use crate::config::Config;
use crate::error::TriageError;
use crate::github::{ChangedFile, PullRequest, RepositoryApi};
use crate::triage::PrNumber;
use serde::Serialize;
use tracing::info;

/// A pull request together with the paths it touches
#[derive(Debug, Serialize)]
pub struct PullDetails {
    #[serde(flatten)]
    pub pull: PullRequest,
    pub files: Vec<ChangedFile>,
}

pub async fn list(global: &GlobalArgs) -> anyhow::Result<()> {
    let (config, _) = Config::load_or_default(&global.config)?;
    let client = connect(global, &config)?;

    let pulls = client.list_pull_requests().await.map_err(TriageError::from)?;
    info!("Found {} open pull requests", pulls.len());
    print_json(&pulls)
}

pub async fn show(global: &GlobalArgs, args: PrArgs) -> anyhow::Result<()> {
    let (config, _) = Config::load_or_default(&global.config)?;
    let client = connect(global, &config)?;
    let pr = PrNumber::new(args.pr)?;

    print_json(&pull_details(&client, pr).await?)
}

pub async fn pull_details(
    api: &dyn RepositoryApi,
    pr: PrNumber,
) -> Result<PullDetails, TriageError> {
    let pull = api.get_pull_request(pr.get()).await?;
    let files = api.list_changed_files(pr.get()).await?;
    Ok(PullDetails { pull, files })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::fake::FakeRepository;

    #[tokio::test]
    async fn test_pull_details_include_files() {
        let repo = FakeRepository::new().with_pull(
            8,
            "Add dark mode",
            Some("feature request"),
            &["src/frontend/theme.css", "README.md"],
        );

        let details = pull_details(&repo, PrNumber::new(8).unwrap()).await.unwrap();

        assert_eq!(details.pull.title, "Add dark mode");
        let names: Vec<_> = details.files.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["src/frontend/theme.css", "README.md"]);

        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["number"], 8);
        assert_eq!(json["files"][1]["filename"], "README.md");
    }

    #[tokio::test]
    async fn test_missing_pull_is_remote_failure() {
        let repo = FakeRepository::new();
        let err = pull_details(&repo, PrNumber::new(99).unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_list_returns_pulls_in_order() {
        let repo = FakeRepository::new()
            .with_pull(5, "b", None, &[])
            .with_pull(2, "a", None, &[]);
        let pulls = repo.list_pull_requests().await.unwrap();
        let numbers: Vec<_> = pulls.iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![2, 5]);
    }
}
