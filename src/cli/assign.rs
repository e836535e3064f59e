use crate::cli::{connect, print_json, AssignArgs, GlobalArgs};
use crate::config::Config;
use crate::error::TriageError;
use crate::github::RepositoryApi;
use crate::triage::{request_reviewers, PrNumber, ReviewerAssignment, ReviewerResolver};
use tracing::info;

pub async fn execute(global: &GlobalArgs, args: AssignArgs) -> anyhow::Result<()> {
    let (config, resolver) = Config::load_or_default(&global.config)?;

    // Local resolution needs neither credentials nor network
    if let Some(files) = &args.files {
        return print_json(&resolver.resolve(files));
    }

    let client = connect(global, &config)?;
    let raw = args
        .pr
        .ok_or_else(|| TriageError::Validation("PR number is required".to_string()))?;
    let pr = PrNumber::new(raw)?;

    let assignment = assign_pr(&client, &resolver, pr).await?;
    print_json(&assignment)
}

pub async fn assign_pr(
    api: &dyn RepositoryApi,
    resolver: &ReviewerResolver,
    pr: PrNumber,
) -> Result<ReviewerAssignment, TriageError> {
    let files = api.list_changed_files(pr.get()).await?;
    let paths: Vec<&str> = files.iter().map(|f| f.filename.as_str()).collect();
    info!("Changed files in PR {}: {}", pr, paths.join(", "));

    let assignment = resolver.resolve(&paths);
    request_reviewers(api, pr, &assignment).await?;
    Ok(assignment)
}
