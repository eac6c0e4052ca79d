//! Response classification
//!
//! Turns one completed HTTP exchange into either the raw success body or a
//! classified [`UpstreamFailure`]. Pure: no I/O, no logging.

use crate::error::{ErrorKind, UpstreamFailure};

/// Outcome of a single upstream call.
pub type UpstreamCallResult = std::result::Result<String, UpstreamFailure>;

/// Message used when a failed response carries no body.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Failed to validate startup idea";

/// Message attached to responses whose content type is not JSON.
pub const NON_JSON_MESSAGE: &str = "non-JSON response";

/// Whether a `Content-Type` header value denotes JSON.
pub fn is_json_content_type(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|value| value.to_ascii_lowercase().contains("application/json"))
}

/// Whether a `Content-Type` header value denotes an HTML page.
pub fn is_html_content_type(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|value| value.to_ascii_lowercase().contains("text/html"))
}

/// Classify a received response.
///
/// HTML pages and non-JSON error responses are terminal failures: a proxy or
/// gateway answering in place of the agent will not fix itself on retry. A
/// successful plain-text answer is the agent's response as is.
pub fn classify_response(status: u16, content_type: Option<&str>, body: String) -> UpstreamCallResult {
    let success = (200..300).contains(&status);

    if is_html_content_type(content_type) || (!success && !is_json_content_type(content_type)) {
        return Err(UpstreamFailure::new(ErrorKind::Unknown, Some(status), NON_JSON_MESSAGE).into_terminal());
    }

    if success {
        return Ok(body);
    }

    let message = if body.trim().is_empty() {
        DEFAULT_FAILURE_MESSAGE.to_string()
    } else {
        body
    };

    Err(UpstreamFailure::new(ErrorKind::from_status(status), Some(status), message))
}

/// Classify a transport error raised before any response arrived.
pub fn classify_transport_error(message: impl Into<String>) -> UpstreamFailure {
    UpstreamFailure::network(message)
}
