use crate::cli::{connect, print_json, GlobalArgs, LabelArgs};
use crate::config::Config;
use crate::error::TriageError;
use crate::github::RepositoryApi;
use crate::triage::{label_specs, LabelProvisioner, LabelingResult, PrNumber};

pub async fn execute(global: &GlobalArgs, args: LabelArgs) -> anyhow::Result<()> {
    let (config, _) = Config::load_or_default(&global.config)?;
    let client = connect(global, &config)?;
    let pr = PrNumber::new(args.pr)?;

    let result = label_pr(&client, &config, pr, &args.labels).await?;
    print_json(&result)
}

/// Provision the given labels with their configured colors, then apply them
pub async fn label_pr(
    api: &dyn RepositoryApi,
    config: &Config,
    pr: PrNumber,
    names: &[String],
) -> Result<LabelingResult, TriageError> {
    let specs = label_specs(names, &config.labels);
    if specs.is_empty() {
        return Err(TriageError::Validation(
            "at least one label is required".to_string(),
        ));
    }

    Ok(LabelProvisioner::new(api)
        .provision_and_apply(pr, &specs)
        .await?)
}
