//! Orchestration and terminal interface for YC-Pilot

mod export;
mod session;
mod submitter;
mod ui;

#[cfg(test)]
mod testing;

pub use export::{report_file_name, save_report};
pub use session::ValidationSession;
pub use submitter::{Submitter, PROBE_EMAIL, PROBE_IDEA, PROBE_NAME};
pub use ui::{
    confirm, display_banner, display_error, display_report, format_report, print_help, read_form,
    read_line,
};

// Re-export core types
pub use ycp_core::{Error, Result, SubmissionState, ValidationOutcome, ValidationReport};
