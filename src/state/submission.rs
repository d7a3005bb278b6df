//! Submission lifecycle states and the endpoint wire format

use serde::Deserialize;

/// Lifecycle of one submission attempt
///
/// `Invalid`, `Succeeded`, `Failed` and `Cancelled` are terminal for a
/// single attempt; the controller returns to `Idle` before the next one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Validating,
    Invalid,
    Submitting,
    Polling,
    Succeeded,
    Failed(String),
    Cancelled,
}

impl SubmissionState {
    /// Whether this state ends a submission attempt
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SubmissionState::Invalid
                | SubmissionState::Succeeded
                | SubmissionState::Failed(_)
                | SubmissionState::Cancelled
        )
    }

    /// Whether a submission is currently talking to the server
    ///
    /// While in flight the resubmission trigger stays disabled, which is
    /// the only reentrancy guard the controller needs.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, SubmissionState::Submitting | SubmissionState::Polling)
    }
}

/// Server response body for a submission poll
///
/// The endpoint answers every poll with one of three JSON bodies:
/// `{"status":"success"}`, `{"status":"error","reason":"..."}` or
/// `{"status":"progress","timeout":<ms>}`. Any other shape is a protocol
/// violation and never reaches this type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SubmissionStatus {
    Success,
    Error { reason: String },
    Progress { timeout: u64 },
}
