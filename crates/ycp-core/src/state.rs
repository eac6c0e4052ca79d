//! Submission lifecycle
//!
//! `Idle -> Submitting -> {Succeeded, Failed} -> Idle`. Only one submission
//! may be in flight; outcomes carrying a stale ticket are discarded.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::report::ValidationReport;
use crate::submission::SessionId;

/// Identifies one submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Ticket(u64);

/// Everything the presentation layer needs after a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    pub session_id: SessionId,
    /// Response text after extraction, before normalization.
    pub response_text: String,
    pub report: ValidationReport,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting {
        ticket: Ticket,
    },
    Succeeded(ValidationOutcome),
    Failed {
        message: String,
    },
}

#[derive(Debug, Default)]
pub struct SubmissionTracker {
    state: SubmissionState,
    issued: u64,
}

impl SubmissionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, SubmissionState::Submitting { .. })
    }

    /// Start a submission. Any previous result is discarded.
    pub fn begin(&mut self) -> Result<Ticket> {
        if self.is_submitting() {
            return Err(Error::SubmissionInProgress);
        }
        self.issued += 1;
        let ticket = Ticket(self.issued);
        self.state = SubmissionState::Submitting { ticket };
        Ok(ticket)
    }

    /// Apply the primary call's outcome. Returns `false` when `ticket` is not
    /// the submission currently in flight, in which case nothing changes.
    pub fn resolve(&mut self, ticket: Ticket, outcome: &Result<ValidationOutcome>) -> bool {
        match self.state {
            SubmissionState::Submitting { ticket: current } if current == ticket => {}
            _ => return false,
        }

        self.state = match outcome {
            Ok(result) => SubmissionState::Succeeded(result.clone()),
            Err(err) => SubmissionState::Failed {
                message: err.user_message(),
            },
        };
        true
    }

    /// Give up on the submission holding `ticket` without an outcome.
    /// Returns `false` when that submission is no longer in flight.
    pub fn abandon(&mut self, ticket: Ticket) -> bool {
        match self.state {
            SubmissionState::Submitting { ticket: current } if current == ticket => {
                self.state = SubmissionState::Idle;
                true
            }
            _ => false,
        }
    }

    /// Clear a finished result. An in-flight submission is left alone.
    pub fn reset(&mut self) -> bool {
        if self.is_submitting() {
            return false;
        }
        self.state = SubmissionState::Idle;
        true
    }
}
