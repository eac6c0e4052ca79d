//! Submission input, field validation and session identifiers

use chrono::Utc;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use uuid::Uuid;

/// Minimum trimmed length of the submitter's name.
pub const MIN_NAME_CHARS: usize = 2;

/// Minimum trimmed length of the idea description.
pub const MIN_IDEA_CHARS: usize = 50;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"))
}

/// Per-field validation messages. A field is `None` when it is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idea: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.idea.is_none()
    }

    /// Messages in form order.
    pub fn messages(&self) -> Vec<&str> {
        [&self.name, &self.email, &self.idea]
            .into_iter()
            .filter_map(|m| m.as_deref())
            .collect()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages().join("; "))
    }
}

pub fn validate_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Some("Name is required".to_string())
    } else if trimmed.chars().count() < MIN_NAME_CHARS {
        Some("Name must be at least 2 characters".to_string())
    } else {
        None
    }
}

pub fn validate_email(email: &str) -> Option<String> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        Some("Email is required".to_string())
    } else if !email_pattern().is_match(trimmed) {
        Some("Please enter a valid email address".to_string())
    } else {
        None
    }
}

pub fn validate_idea(idea: &str) -> Option<String> {
    let trimmed = idea.trim();
    if trimmed.is_empty() {
        Some("Startup idea description is required".to_string())
    } else if trimmed.chars().count() < MIN_IDEA_CHARS {
        Some("Please provide a more detailed description (at least 50 characters)".to_string())
    } else {
        None
    }
}

/// A validated startup-idea submission.
///
/// Only constructible through [`SubmissionRequest::new`], so holding one
/// means every field passed local validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionRequest {
    name: String,
    email: String,
    idea: String,
}

impl SubmissionRequest {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        idea: impl Into<String>,
    ) -> std::result::Result<Self, FieldErrors> {
        let (name, email, idea) = (name.into(), email.into(), idea.into());

        let errors = FieldErrors {
            name: validate_name(&name),
            email: validate_email(&email),
            idea: validate_idea(&idea),
        };
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            idea: idea.trim().to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn idea(&self) -> &str {
        &self.idea
    }

    /// The single prompt string sent to the agent.
    pub fn prompt(&self) -> String {
        build_prompt(&self.name, &self.email, &self.idea)
    }
}

/// Prompt format shared by the validated flow and the connectivity probe.
pub fn build_prompt(name: &str, email: &str, idea: &str) -> String {
    format!("Name: {}\nEmail: {}\nStartup Idea: {}", name, email, idea)
}

/// Conversation scope sent to the agent, fresh for every submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// `<prefix>_<unix millis>_<9 random chars>`.
    pub fn generate(prefix: &str) -> Self {
        let suffix: String = Uuid::new_v4().simple().to_string().chars().take(9).collect();
        Self(format!("{}_{}_{}", prefix, Utc::now().timestamp_millis(), suffix))
    }

    pub fn primary() -> Self {
        Self::generate("session")
    }

    pub fn secondary() -> Self {
        Self::generate("secondary_session")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What an agent receives for one submission: the conversation scope and the
/// prompt. The agent adds its own identifier on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentPrompt {
    pub session_id: SessionId,
    pub message: String,
}

impl AgentPrompt {
    pub fn new(session_id: SessionId, message: impl Into<String>) -> Self {
        Self {
            session_id,
            message: message.into(),
        }
    }
}
