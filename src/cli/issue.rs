use crate::cli::{connect, print_json, GlobalArgs, IssueCommand, IssueCreateArgs, IssueUpdateArgs};
use crate::config::Config;
use crate::error::TriageError;
use crate::github::{Issue, IssueUpdate, NewIssue, RepositoryApi};
use tracing::info;

pub async fn execute(global: &GlobalArgs, command: IssueCommand) -> anyhow::Result<()> {
    let (config, _) = Config::load_or_default(&global.config)?;
    let client = connect(global, &config)?;

    let issue = match command {
        IssueCommand::Create(args) => create(&client, args).await?,
        IssueCommand::Update(args) => update(&client, args).await?,
    };
    print_json(&issue)
}

async fn create(api: &dyn RepositoryApi, args: IssueCreateArgs) -> Result<Issue, TriageError> {
    if args.title.trim().is_empty() {
        return Err(TriageError::Validation(
            "issue title must not be empty".to_string(),
        ));
    }

    let issue = api
        .create_issue(&NewIssue {
            title: args.title,
            body: args.body,
            labels: args.labels,
            assignees: args.assignees,
        })
        .await?;
    info!("Created issue #{}: {}", issue.number, issue.title);
    Ok(issue)
}

async fn update(api: &dyn RepositoryApi, args: IssueUpdateArgs) -> Result<Issue, TriageError> {
    let number = u64::try_from(args.number)
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| {
            TriageError::Validation(format!(
                "issue number must be a positive integer, got {}",
                args.number
            ))
        })?;

    let issue = api
        .update_issue(
            number,
            &IssueUpdate {
                body: Some(args.body),
                ..IssueUpdate::default()
            },
        )
        .await?;
    info!("Updated issue #{}", issue.number);
    Ok(issue)
}
