//! Error types for YC-Pilot

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::submission::FieldErrors;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Category of a failed upstream call.
///
/// Derived once from the status code or transport failure and never changed
/// afterwards. Each kind is bound to exactly one user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidInput,
    AuthError,
    RateLimited,
    ServerUnavailable,
    NetworkError,
    Unknown,
}

impl ErrorKind {
    /// Message shown to end users. Never contains upstream response text.
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorKind::NetworkError => {
                "Unable to connect to our servers. Please check your internet connection and try again."
            }
            ErrorKind::RateLimited => "Too many requests. Please wait a moment before trying again.",
            ErrorKind::InvalidInput => "Please check your input and try again.",
            ErrorKind::ServerUnavailable => {
                "Our validation service is temporarily unavailable. Please try again in a few minutes."
            }
            ErrorKind::AuthError => {
                "There's an issue with our validation service. Please contact support if this persists."
            }
            ErrorKind::Unknown => {
                "We couldn't validate your startup idea right now. Please try again later."
            }
        }
    }

    /// Kind for an HTTP status outside the 2xx range.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => ErrorKind::InvalidInput,
            401 => ErrorKind::AuthError,
            429 => ErrorKind::RateLimited,
            503 => ErrorKind::ServerUnavailable,
            _ => ErrorKind::Unknown,
        }
    }
}

/// A classified failure of one upstream call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamFailure {
    pub kind: ErrorKind,
    pub status: Option<u16>,
    /// Diagnostic detail, may include the upstream body. Not for end users.
    pub message: String,
    /// Set when retrying cannot change the outcome (e.g. a non-JSON response).
    #[serde(default)]
    pub terminal: bool,
}

impl UpstreamFailure {
    pub fn new(kind: ErrorKind, status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            kind,
            status,
            message: message.into(),
            terminal: false,
        }
    }

    /// Transport failure before any response was received.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NetworkError, None, message)
    }

    /// Marks the failure as not worth retrying regardless of its kind.
    pub fn into_terminal(mut self) -> Self {
        self.terminal = true;
        self
    }

    /// Client errors (4xx other than 429) cannot resolve themselves, so they
    /// are surfaced immediately. Transport, rate-limit and server failures
    /// are retried.
    pub fn is_retryable(&self) -> bool {
        if self.terminal {
            return false;
        }
        let client_kind = matches!(
            self.kind,
            ErrorKind::InvalidInput | ErrorKind::AuthError | ErrorKind::Unknown
        );
        let client_status = self
            .status
            .is_some_and(|status| (400..500).contains(&status) && status != 429);
        !(client_kind && client_status)
    }

    pub fn user_message(&self) -> &'static str {
        self.kind.user_message()
    }
}

impl fmt::Display for UpstreamFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{:?} ({}): {}", self.kind, status, self.message),
            None => write!(f, "{:?}: {}", self.kind, self.message),
        }
    }
}

impl std::error::Error for UpstreamFailure {}

/// Core error types for the YC-Pilot system
#[derive(Error, Debug)]
pub enum Error {
    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamFailure),

    #[error("Invalid submission: {0}")]
    Validation(FieldErrors),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("A submission is already in progress")]
    SubmissionInProgress,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Text suitable for showing to the person who submitted the form.
    pub fn user_message(&self) -> String {
        match self {
            Error::Upstream(failure) => failure.user_message().to_string(),
            Error::Validation(fields) => fields.to_string(),
            Error::Configuration(message) => message.clone(),
            Error::SubmissionInProgress => {
                "Your idea is still being analyzed. Please wait for the current result.".to_string()
            }
            _ => ErrorKind::Unknown.user_message().to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
