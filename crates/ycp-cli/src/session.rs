//! Form session: local validation, then one tracked submission at a time

use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

use ycp_core::{
    Error, Result, SubmissionRequest, SubmissionState, SubmissionTracker, Ticket, ValidationAgent,
    ValidationOutcome,
};

use crate::submitter::Submitter;

fn lock(tracker: &Mutex<SubmissionTracker>) -> MutexGuard<'_, SubmissionTracker> {
    tracker.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Returns the tracker to `Idle` if the submission is dropped before its
/// outcome is applied.
struct InFlight<'a> {
    tracker: &'a Mutex<SubmissionTracker>,
    ticket: Ticket,
    armed: bool,
}

impl InFlight<'_> {
    fn resolve(mut self, outcome: &Result<ValidationOutcome>) -> bool {
        self.armed = false;
        lock(self.tracker).resolve(self.ticket, outcome)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed && lock(self.tracker).abandon(self.ticket) {
            debug!(ticket = ?self.ticket, "submission cancelled before it resolved");
        }
    }
}

pub struct ValidationSession<P: ValidationAgent, S: ValidationAgent + 'static = P> {
    submitter: Submitter<P, S>,
    tracker: Mutex<SubmissionTracker>,
}

impl<P: ValidationAgent, S: ValidationAgent + 'static> ValidationSession<P, S> {
    pub fn new(submitter: Submitter<P, S>) -> Self {
        Self {
            submitter,
            tracker: Mutex::new(SubmissionTracker::new()),
        }
    }

    pub fn submitter(&self) -> &Submitter<P, S> {
        &self.submitter
    }

    fn tracker(&self) -> MutexGuard<'_, SubmissionTracker> {
        lock(&self.tracker)
    }

    pub fn state(&self) -> SubmissionState {
        self.tracker().state().clone()
    }

    /// Validate the form fields and submit them.
    ///
    /// Field errors are returned before any network call and leave the state
    /// untouched. A second call while one is in flight is rejected. Dropping
    /// the returned future mid-flight puts the session back to `Idle`.
    pub async fn submit_form(&self, name: &str, email: &str, idea: &str) -> Result<ValidationOutcome> {
        let request = SubmissionRequest::new(name, email, idea).map_err(Error::Validation)?;

        let ticket = self.tracker().begin()?;
        let in_flight = InFlight {
            tracker: &self.tracker,
            ticket,
            armed: true,
        };
        let outcome = self.submitter.submit(&request).await;

        if !in_flight.resolve(&outcome) {
            debug!(?ticket, "discarding outcome of superseded submission");
        }
        outcome
    }

    /// Back to `Idle` after a finished submission.
    pub fn reset(&self) -> bool {
        self.tracker().reset()
    }
}
