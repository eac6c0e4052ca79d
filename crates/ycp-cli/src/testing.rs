//! Scripted agents for orchestration tests

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use ycp_core::{AgentPrompt, UpstreamCallResult, ValidationAgent};

/// Replies from a queue, then repeats `fallback` forever.
pub(crate) struct ScriptedAgent {
    id: String,
    script: Mutex<VecDeque<UpstreamCallResult>>,
    fallback: UpstreamCallResult,
    latency: Duration,
    calls: AtomicU32,
    prompts: Mutex<Vec<AgentPrompt>>,
}

impl ScriptedAgent {
    pub(crate) fn always(result: UpstreamCallResult) -> Self {
        Self::scripted(Vec::new(), result)
    }

    pub(crate) fn scripted(script: Vec<UpstreamCallResult>, fallback: UpstreamCallResult) -> Self {
        Self {
            id: "scripted-agent".to_string(),
            script: Mutex::new(script.into()),
            fallback,
            latency: Duration::ZERO,
            calls: AtomicU32::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub(crate) fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn prompts(&self) -> Vec<AgentPrompt> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ValidationAgent for ScriptedAgent {
    async fn send(&self, prompt: &AgentPrompt) -> UpstreamCallResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.clone());
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }

    fn agent_id(&self) -> &str {
        &self.id
    }

    fn endpoint(&self) -> &str {
        "scripted://agent"
    }
}
