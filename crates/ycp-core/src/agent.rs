//! Validation agent trait

use async_trait::async_trait;

use crate::classify::UpstreamCallResult;
use crate::submission::AgentPrompt;

/// Trait for hosted evaluation agents (e.g., Lyzr Studio).
///
/// One call to [`ValidationAgent::send`] is one HTTP exchange: the
/// implementation classifies the response itself and never retries.
#[async_trait]
pub trait ValidationAgent: Send + Sync {
    /// Send a prompt and return the raw success body or a classified failure.
    async fn send(&self, prompt: &AgentPrompt) -> UpstreamCallResult;

    /// Identifier placed in the outbound payload.
    fn agent_id(&self) -> &str;

    /// Endpoint the agent posts to, for diagnostics.
    fn endpoint(&self) -> &str;
}
