//! Lyzr configuration

use serde::{Deserialize, Serialize};
use std::env;
use ycp_core::{Error, Result};

/// Configuration for one Lyzr agent endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyzrConfig {
    #[serde(skip_serializing)]
    pub api_key: String,
    pub agent_id: String,
    pub endpoint: String,
}

/// Reads a variable, treating empty values as absent.
fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|value| !value.trim().is_empty())
}

impl LyzrConfig {
    pub const DEFAULT_ENDPOINT: &'static str = "https://api.lyzr.ai/v1/chat/completions";

    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Primary agent configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = non_empty(&lookup, "LYZR_API_KEY")
            .ok_or_else(|| Error::Configuration("LYZR_API_KEY not configured".to_string()))?;

        let agent_id = non_empty(&lookup, "LYZR_AGENT_ID")
            .ok_or_else(|| Error::Configuration("LYZR_AGENT_ID not configured".to_string()))?;

        let endpoint = non_empty(&lookup, "LYZR_API_ENDPOINT")
            .unwrap_or_else(|| Self::DEFAULT_ENDPOINT.to_string());

        Ok(Self {
            api_key,
            agent_id,
            endpoint,
        })
    }

    /// Secondary agent configuration. `None` unless key, agent and URL are
    /// all set, which is the normal "not configured" state.
    pub fn secondary_from_env() -> Option<Self> {
        dotenvy::dotenv().ok();
        Self::secondary_from_lookup(|key| env::var(key).ok())
    }

    pub fn secondary_from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Some(Self {
            api_key: non_empty(&lookup, "SECONDARY_API_KEY")?,
            agent_id: non_empty(&lookup, "SECONDARY_AGENT_ID")?,
            endpoint: non_empty(&lookup, "SECONDARY_API_URL")?,
        })
    }

    /// Create configuration with explicit values
    pub fn new(api_key: impl Into<String>, agent_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            agent_id: agent_id.into(),
            endpoint: Self::DEFAULT_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}
