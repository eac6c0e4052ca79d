//! Lyzr agent client implementation

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use ycp_core::{
    classify_response, classify_transport_error, AgentPrompt, Error, Result, UpstreamCallResult,
    ValidationAgent,
};

use crate::config::LyzrConfig;

/// Lyzr Studio agent client
pub struct LyzrClient {
    config: LyzrConfig,
    client: Client,
    label: &'static str,
    log_preview_chars: usize,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    agent_id: &'a str,
    session_id: &'a str,
    message: &'a str,
}

/// First `limit` characters of `text`, marked when cut.
fn preview(text: &str, limit: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(limit).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

impl LyzrClient {
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

    /// Create a client for the primary agent
    pub fn new(config: LyzrConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self {
            config,
            client,
            label: "primary",
            log_preview_chars: 500,
        })
    }

    /// Create a client for the secondary agent. Logs less of each body.
    pub fn secondary(config: LyzrConfig) -> Result<Self> {
        let mut client = Self::new(config)?;
        client.label = "secondary";
        client.log_preview_chars = 200;
        Ok(client)
    }

    /// Create a primary client from environment variables
    pub fn from_env() -> Result<Self> {
        let config = LyzrConfig::from_env()?;
        Self::new(config)
    }

    /// Secondary client from environment variables, if configured.
    pub fn secondary_from_env() -> Result<Option<Self>> {
        LyzrConfig::secondary_from_env().map(Self::secondary).transpose()
    }

    pub fn config(&self) -> &LyzrConfig {
        &self.config
    }
}

#[async_trait]
impl ValidationAgent for LyzrClient {
    async fn send(&self, prompt: &AgentPrompt) -> UpstreamCallResult {
        let body = ChatRequest {
            agent_id: &self.config.agent_id,
            session_id: prompt.session_id.as_str(),
            message: &prompt.message,
        };

        debug!(
            agent = self.label,
            endpoint = %self.config.endpoint,
            agent_id = %self.config.agent_id,
            session_id = %prompt.session_id,
            "sending request"
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("X-API-Key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(agent = self.label, err = %e, "request failed before a response arrived");
                classify_transport_error(e.to_string())
            })?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        let text = response
            .text()
            .await
            .map_err(|e| classify_transport_error(e.to_string()))?;

        debug!(
            agent = self.label,
            status,
            body = %preview(&text, self.log_preview_chars),
            "received response"
        );

        classify_response(status, content_type.as_deref(), text)
    }

    fn agent_id(&self) -> &str {
        &self.config.agent_id
    }

    fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}
