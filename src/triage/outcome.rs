use crate::error::{ErrorKind, TriageError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, warn};
use uuid::Uuid;

/// Orchestration states, in the order a successful run visits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriageState {
    Fetching,
    Classifying,
    Labeling,
    AssigningReviewers,
    Commenting,
    Done,
    Failed,
}

impl std::fmt::Display for TriageState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TriageState::Fetching => write!(f, "fetching"),
            TriageState::Classifying => write!(f, "classifying"),
            TriageState::Labeling => write!(f, "labeling"),
            TriageState::AssigningReviewers => write!(f, "assigning_reviewers"),
            TriageState::Commenting => write!(f, "commenting"),
            TriageState::Done => write!(f, "done"),
            TriageState::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TriageStatus {
    Success,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub step: TriageState,
    pub ok: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepError {
    pub step: TriageState,
    pub kind: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

impl StepError {
    pub fn new(step: TriageState, error: &TriageError) -> Self {
        // Keep structured API errors structured, fall back to the raw text
        let payload = error.payload().filter(|p| !p.is_empty()).map(|p| {
            serde_json::from_str(p).unwrap_or_else(|_| serde_json::Value::String(p.to_string()))
        });
        Self {
            step,
            kind: error.kind(),
            status: error.status(),
            message: error.to_string(),
            payload,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriageOutcome {
    pub run_id: Uuid,
    pub pr_number: Option<u64>,
    pub applied_labels: Vec<String>,
    pub assigned_reviewers: Vec<String>,
    pub assigned_teams: Vec<String>,
    pub status: TriageStatus,
    pub final_state: TriageState,
    pub steps: Vec<StepReport>,
    pub errors: Vec<StepError>,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl TriageOutcome {
    pub fn is_success(&self) -> bool {
        self.status == TriageStatus::Success
    }

    /// Outcome for a request rejected before any remote call
    pub fn rejected(pr_number: Option<u64>, error: &TriageError) -> Self {
        let mut tracker = OutcomeTracker::new(pr_number);
        tracker.enter(TriageState::Fetching);
        tracker.abort(error)
    }
}

/// Accumulates per-step results while a run moves through its states.
#[derive(Debug)]
pub(crate) struct OutcomeTracker {
    outcome: TriageOutcome,
    state: TriageState,
    clock: Instant,
}

impl OutcomeTracker {
    pub fn new(pr_number: Option<u64>) -> Self {
        Self {
            outcome: TriageOutcome {
                run_id: Uuid::new_v4(),
                pr_number,
                applied_labels: Vec::new(),
                assigned_reviewers: Vec::new(),
                assigned_teams: Vec::new(),
                status: TriageStatus::Success,
                final_state: TriageState::Fetching,
                steps: Vec::new(),
                errors: Vec::new(),
                started_at: Utc::now(),
                duration_ms: 0,
            },
            state: TriageState::Fetching,
            clock: Instant::now(),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.outcome.run_id
    }

    pub fn outcome_mut(&mut self) -> &mut TriageOutcome {
        &mut self.outcome
    }

    pub fn enter(&mut self, state: TriageState) {
        debug!("{} -> {}", self.state, state);
        self.state = state;
    }

    pub fn succeed(&mut self) {
        self.outcome.steps.push(StepReport {
            step: self.state,
            ok: true,
        });
    }

    /// Record a non-blocking failure of the current step
    pub fn record_failure(&mut self, error: &TriageError) {
        warn!("Step {} failed: {}", self.state, error);
        self.outcome.steps.push(StepReport {
            step: self.state,
            ok: false,
        });
        self.outcome.errors.push(StepError::new(self.state, error));
    }

    /// Fail the current step and end the run
    pub fn abort(mut self, error: &TriageError) -> TriageOutcome {
        self.record_failure(error);
        self.enter(TriageState::Failed);
        self.finish()
    }

    pub fn finish(mut self) -> TriageOutcome {
        if self.state != TriageState::Failed {
            self.enter(TriageState::Done);
        }
        // Any unrecovered error fails the run; final_state still tells a run
        // that reached Done apart from one that aborted
        self.outcome.final_state = self.state;
        let failed = self.state == TriageState::Failed || !self.outcome.errors.is_empty();
        self.outcome.status = if failed {
            TriageStatus::Failed
        } else {
            TriageStatus::Success
        };
        self.outcome.duration_ms = self.clock.elapsed().as_millis() as u64;
        self.outcome
    }
}
