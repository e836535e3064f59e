use crate::config::LabelSpec;
use crate::error::TriageError;
use crate::github::RepositoryApi;
use std::sync::Arc;
use tracing::{info, info_span, Instrument};

use super::classifier::classify;
use super::labels::{label_specs, LabelProvisioner};
use super::outcome::{OutcomeTracker, TriageOutcome, TriageState};
use super::request::PrNumber;
use super::reviewers::{request_reviewers, ReviewerAssignment, ReviewerResolver};

/// Runs the triage sequence for one PR at a time. Holds only read-only
/// configuration, so one instance can serve concurrent runs for different PRs.
pub struct Orchestrator {
    api: Arc<dyn RepositoryApi>,
    resolver: ReviewerResolver,
    palette: Vec<LabelSpec>,
}

impl Orchestrator {
    pub fn new(
        api: Arc<dyn RepositoryApi>,
        resolver: ReviewerResolver,
        palette: &[LabelSpec],
    ) -> Self {
        Self {
            api,
            resolver,
            palette: palette.to_vec(),
        }
    }

    pub async fn run(&self, pr: PrNumber) -> TriageOutcome {
        let tracker = OutcomeTracker::new(Some(pr.get()));
        let span = info_span!("triage", pr = pr.get(), run_id = %tracker.run_id());
        self.execute(pr, tracker).instrument(span).await
    }

    async fn execute(&self, pr: PrNumber, mut run: OutcomeTracker) -> TriageOutcome {
        run.enter(TriageState::Fetching);
        let pull = match self.api.get_pull_request(pr.get()).await {
            Ok(pull) => pull,
            Err(e) => return run.abort(&TriageError::from(e)),
        };
        let files = match self.api.list_changed_files(pr.get()).await {
            Ok(files) => files,
            Err(e) => return run.abort(&TriageError::from(e)),
        };
        run.succeed();
        info!(
            "Fetched PR {}: {} ({} changed files)",
            pr,
            pull.title,
            files.len()
        );

        run.enter(TriageState::Classifying);
        let labels = classify(&pull.title, pull.body.as_deref());
        run.succeed();

        // Later steps assume labels landed, so a failure here ends the run
        run.enter(TriageState::Labeling);
        let specs = label_specs(&labels, &self.palette);
        let provisioner = LabelProvisioner::new(self.api.as_ref());
        match provisioner.provision_and_apply(pr, &specs).await {
            Ok(result) => {
                run.outcome_mut().applied_labels = result.applied;
                run.succeed();
            }
            Err(e) => return run.abort(&TriageError::from(e)),
        }

        run.enter(TriageState::AssigningReviewers);
        let paths: Vec<&str> = files.iter().map(|f| f.filename.as_str()).collect();
        let assignment = self.resolver.resolve(&paths);
        let reviewers_assigned = match request_reviewers(self.api.as_ref(), pr, &assignment).await {
            Ok(()) => {
                let outcome = run.outcome_mut();
                outcome.assigned_reviewers = assignment.reviewers.clone();
                outcome.assigned_teams = assignment.teams.clone();
                run.succeed();
                true
            }
            Err(e) => {
                run.record_failure(&TriageError::from(e));
                false
            }
        };

        run.enter(TriageState::Commenting);
        let applied = run.outcome_mut().applied_labels.clone();
        let body = render_comment(&applied, &assignment, reviewers_assigned);
        match self.api.create_comment(pr.get(), &body).await {
            Ok(_) => run.succeed(),
            Err(e) => run.record_failure(&TriageError::from(e)),
        }

        let outcome = run.finish();
        info!("Triage of PR {} finished: {:?}", pr, outcome.status);
        outcome
    }
}

/// Summary comment posted once labeling is done
pub fn render_comment(
    labels: &[String],
    assignment: &ReviewerAssignment,
    reviewers_assigned: bool,
) -> String {
    let reviewers = if !reviewers_assigned {
        "Reviewer assignment failed; please assign reviewers manually.".to_string()
    } else if assignment.reviewers.is_empty() {
        "No reviewers matched; please assign reviewers manually.".to_string()
    } else if assignment.teams.is_empty() {
        "Auto-assigned reviewers.".to_string()
    } else {
        format!(
            "Auto-assigned reviewers (teams: {}).",
            assignment.teams.join(", ")
        )
    };

    format!(
        "🤖 PR triaged!\n\n**Labels:** {}\n**Reviewers:** {}",
        labels.join(", "),
        reviewers
    )
}
