//! Credential health check

use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Ok,
    Error,
}

/// Whether the primary agent credentials are configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: HealthState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthStatus {
    fn error(message: impl Into<String>) -> Self {
        Self {
            status: HealthState::Error,
            message: None,
            error: Some(message.into()),
        }
    }

    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        for key in ["LYZR_API_KEY", "LYZR_AGENT_ID"] {
            if lookup(key).is_none_or(|value| value.trim().is_empty()) {
                return Self::error(format!("{} environment variable is not configured", key));
            }
        }

        Self {
            status: HealthState::Ok,
            message: Some("API credentials configured".to_string()),
            error: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == HealthState::Ok
    }
}
