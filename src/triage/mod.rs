mod classifier;
mod labels;
mod orchestrator;
mod outcome;
mod request;
mod reviewers;

pub use labels::{label_specs, LabelProvisioner, LabelingResult};
pub use orchestrator::Orchestrator;
pub use outcome::TriageOutcome;
pub use request::{PrNumber, TriageRequest};
pub use reviewers::{request_reviewers, ReviewerAssignment, ReviewerResolver};
