//! Core traits and types for YC-Pilot
//!
//! This crate holds everything about a startup-idea submission that does not
//! touch the network: field validation, the upstream error taxonomy, response
//! classification, the retry policy, report normalization and the submission
//! lifecycle. Agent implementations live in provider crates behind the
//! [`ValidationAgent`] trait, which keeps the orchestration test-friendly.

pub mod agent;
pub mod classify;
pub mod error;
pub mod report;
pub mod retry;
pub mod state;
pub mod submission;


pub use agent::ValidationAgent;
pub use classify::{
    classify_response, classify_transport_error, is_html_content_type, is_json_content_type,
    UpstreamCallResult,
};
pub use error::{Error, ErrorKind, Result, UpstreamFailure};
pub use report::{
    extract_response_text, ActionableInsights, CompetitiveLandscape, CriterionScore,
    DetailedEvaluation, FitBand, QuickVerdict, ScoreBand, SimilarCompany, StructuredReport,
    ValidationReport, YcReadyPitch,
};
pub use retry::{with_retry, RetryPolicy, Retryable};
pub use state::{SubmissionState, SubmissionTracker, Ticket, ValidationOutcome};
pub use submission::{build_prompt, AgentPrompt, FieldErrors, SessionId, SubmissionRequest};
