use crate::error::TriageError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU64;

/// A validated pull request number. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PrNumber(NonZeroU64);

impl PrNumber {
    pub fn new(raw: i64) -> Result<Self, TriageError> {
        u64::try_from(raw)
            .ok()
            .and_then(NonZeroU64::new)
            .map(Self)
            .ok_or_else(|| {
                TriageError::Validation(format!(
                    "PR number must be a positive integer, got {}",
                    raw
                ))
            })
    }

    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for PrNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Inbound triage request, the only input shape the boundary accepts
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TriageRequest {
    /// Pull request number
    pub number: i64,
}

impl TriageRequest {
    pub fn from_json(raw: &str) -> Result<Self, TriageError> {
        serde_json::from_str(raw)
            .map_err(|e| TriageError::Validation(format!("malformed triage request: {}", e)))
    }

    pub fn validate(&self) -> Result<PrNumber, TriageError> {
        PrNumber::new(self.number)
    }
}
