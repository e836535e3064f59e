use crate::config::LabelSpec;
use crate::error::GitHubError;
use crate::github::RepositoryApi;
use crate::triage::PrNumber;
use serde::Serialize;
use tracing::{debug, info, warn};

/// What happened to each label during provisioning
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProvisionReport {
    pub created: Vec<String>,
    pub existing: Vec<String>,
    pub failed: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LabelingResult {
    pub applied: Vec<String>,
    pub provision: ProvisionReport,
}

pub struct LabelProvisioner<'a> {
    api: &'a dyn RepositoryApi,
}

impl<'a> LabelProvisioner<'a> {
    pub fn new(api: &'a dyn RepositoryApi) -> Self {
        Self { api }
    }

    /// Create each label on the repository. Never fails: conflicts count as
    /// existing and other errors are logged and recorded.
    pub async fn provision(&self, specs: &[LabelSpec]) -> ProvisionReport {
        let mut report = ProvisionReport::default();

        for spec in specs {
            match self.api.create_label(spec).await {
                Ok(_) => {
                    info!(
                        "Created label '{}' with color {}",
                        spec.name,
                        spec.color.as_deref().unwrap_or("default")
                    );
                    report.created.push(spec.name.clone());
                }
                Err(e) if e.is_conflict() => {
                    debug!("Label '{}' already exists", spec.name);
                    report.existing.push(spec.name.clone());
                }
                Err(e) => {
                    warn!("Failed to create label '{}': {}", spec.name, e);
                    report.failed.push(spec.name.clone());
                }
            }
        }

        report
    }

    /// Apply labels to the PR in one call. Failure here is fatal for labeling.
    pub async fn apply(&self, pr: PrNumber, names: &[String]) -> Result<Vec<String>, GitHubError> {
        let names = dedupe_labels(names);
        self.api.add_labels(pr.get(), &names).await?;
        info!("Added labels [{}] to PR {}", names.join(", "), pr);
        Ok(names)
    }

    pub async fn provision_and_apply(
        &self,
        pr: PrNumber,
        specs: &[LabelSpec],
    ) -> Result<LabelingResult, GitHubError> {
        let provision = self.provision(specs).await;
        let names: Vec<String> = specs.iter().map(|s| s.name.clone()).collect();
        let applied = self.apply(pr, &names).await?;
        Ok(LabelingResult { applied, provision })
    }
}

/// Remove duplicates keeping the first occurrence of each name
pub fn dedupe_labels(names: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        let name = name.trim();
        if !name.is_empty() && !out.iter().any(|n| n == name) {
            out.push(name.to_string());
        }
    }
    out
}

/// Pair each label name with its configured color
pub fn label_specs(names: &[String], palette: &[LabelSpec]) -> Vec<LabelSpec> {
    dedupe_labels(names)
        .into_iter()
        .map(|name| {
            let color = palette
                .iter()
                .find(|p| p.name == name)
                .and_then(|p| p.color.clone());
            LabelSpec { name, color }
        })
        .collect()
}
