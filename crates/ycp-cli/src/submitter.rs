//! Submission orchestration
//!
//! One submission issues two calls at once: the primary evaluation, wrapped
//! in the retry policy, and a best-effort copy to the secondary agent whose
//! outcome never reaches the caller.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use ycp_core::{
    build_prompt, extract_response_text, AgentPrompt, Result, RetryPolicy, SessionId,
    SubmissionRequest, UpstreamCallResult, ValidationAgent, ValidationOutcome, ValidationReport,
};

/// Fixed submission used by [`Submitter::probe`].
pub const PROBE_NAME: &str = "Test User";
pub const PROBE_EMAIL: &str = "test@example.com";
pub const PROBE_IDEA: &str = "A simple test idea for API debugging";

/// Submits ideas to a primary agent and mirrors them to an optional
/// secondary agent.
pub struct Submitter<P: ValidationAgent, S: ValidationAgent + 'static = P> {
    primary: P,
    secondary: Option<Arc<S>>,
    retry: RetryPolicy,
    background: Mutex<Vec<JoinHandle<()>>>,
}

impl<P: ValidationAgent + 'static> Submitter<P> {
    /// Create a submitter without a secondary agent
    pub fn new(primary: P) -> Self {
        Self {
            primary,
            secondary: None,
            retry: RetryPolicy::default(),
            background: Mutex::new(Vec::new()),
        }
    }
}

impl<P: ValidationAgent, S: ValidationAgent + 'static> Submitter<P, S> {
    /// Create with a secondary agent. `None` is the "not configured" state.
    pub fn with_secondary(primary: P, secondary: Option<S>) -> Self {
        Self {
            primary,
            secondary: secondary.map(Arc::new),
            retry: RetryPolicy::default(),
            background: Mutex::new(Vec::new()),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn has_secondary(&self) -> bool {
        self.secondary.is_some()
    }

    /// Submit a validated idea and normalize the primary agent's answer.
    ///
    /// The secondary call is started first and left running in the
    /// background; its result is only logged.
    pub async fn submit(&self, request: &SubmissionRequest) -> Result<ValidationOutcome> {
        self.dispatch_secondary(request);

        let session_id = SessionId::primary();
        let prompt = AgentPrompt::new(session_id.clone(), request.prompt());

        info!(
            session_id = %session_id,
            endpoint = self.primary.endpoint(),
            agent_id = self.primary.agent_id(),
            "submitting idea"
        );

        let raw = self.retry.run(|| self.primary.send(&prompt)).await?;

        let response_text = extract_response_text(&raw);
        let report = ValidationReport::from_response(&response_text);
        debug!(
            session_id = %session_id,
            structured = report.is_structured(),
            "normalized response"
        );

        Ok(ValidationOutcome {
            session_id,
            response_text,
            report,
        })
    }

    /// Send the fixed test submission once, skipping local validation, the
    /// retry policy and the secondary agent.
    pub async fn probe(&self) -> UpstreamCallResult {
        let prompt = AgentPrompt::new(
            SessionId::primary(),
            build_prompt(PROBE_NAME, PROBE_EMAIL, PROBE_IDEA),
        );
        self.primary
            .send(&prompt)
            .await
            .map(|raw| extract_response_text(&raw))
    }

    fn dispatch_secondary(&self, request: &SubmissionRequest) {
        let Some(agent) = self.secondary.clone() else {
            debug!("secondary agent not configured, skipping");
            return;
        };

        let prompt = AgentPrompt::new(SessionId::secondary(), request.prompt());
        let handle = tokio::spawn(async move {
            debug!(
                endpoint = agent.endpoint(),
                session_id = %prompt.session_id,
                "calling secondary agent"
            );
            match agent.send(&prompt).await {
                Ok(_) => info!(session_id = %prompt.session_id, "secondary call completed"),
                Err(failure) => warn!(
                    session_id = %prompt.session_id,
                    kind = ?failure.kind,
                    status = ?failure.status,
                    err = %failure,
                    "secondary call failed"
                ),
            }
        });

        let mut background = self.background.lock().unwrap_or_else(PoisonError::into_inner);
        background.retain(|task| !task.is_finished());
        background.push(handle);
    }

    /// Number of secondary calls still running.
    pub fn pending_background(&self) -> usize {
        let background = self.background.lock().unwrap_or_else(PoisonError::into_inner);
        background.iter().filter(|task| !task.is_finished()).count()
    }

    /// Wait up to `limit` for outstanding secondary calls, so a short-lived
    /// process does not cut them off. Calls still running afterwards are
    /// left detached.
    pub async fn flush_background(&self, limit: Duration) {
        let tasks: Vec<JoinHandle<()>> = {
            let mut background = self.background.lock().unwrap_or_else(PoisonError::into_inner);
            background.drain(..).collect()
        };
        if tasks.is_empty() {
            return;
        }

        let wait_all = async {
            for task in tasks {
                if let Err(e) = task.await {
                    warn!(err = %e, "secondary task ended abnormally");
                }
            }
        };
        if tokio::time::timeout(limit, wait_all).await.is_err() {
            warn!(limit_ms = limit.as_millis() as u64, "secondary calls still running at shutdown");
        }
    }
}

#[cfg(test)]
impl<S: ValidationAgent + 'static> Submitter<crate::testing::ScriptedAgent, S> {
    pub(crate) fn primary_calls(&self) -> u32 {
        self.primary.calls()
    }

    pub(crate) fn primary_prompts(&self) -> Vec<AgentPrompt> {
        self.primary.prompts()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedAgent;
    use ycp_core::{Error, ErrorKind, UpstreamFailure};

    const IDEA: &str = "An app that matches retired engineers with early-stage hardware startups";

    fn request() -> SubmissionRequest {
        SubmissionRequest::new("Ana Gomez", "ana@x.com", IDEA).unwrap()
    }

    fn server_error() -> UpstreamCallResult {
        Err(UpstreamFailure::new(ErrorKind::Unknown, Some(500), "Internal Server Error"))
    }

    #[tokio::test]
    async fn test_structured_scenario() {
        let primary = ScriptedAgent::always(Ok(
            r#"{"response":"{\"quick_verdict\":{\"overall_score\":\"8/10\"}}"}"#.to_string(),
        ));
        let submitter = Submitter::new(primary);

        let outcome = submitter.submit(&request()).await.unwrap();
        let score = outcome
            .report
            .structured()
            .and_then(|r| r.quick_verdict.as_ref())
            .and_then(|q| q.overall_score.clone());
        assert_eq!(score.as_deref(), Some("8/10"));
    }

    #[tokio::test]
    async fn test_failing_secondary_does_not_affect_primary() {
        let primary = ScriptedAgent::always(Ok(r#"{"response":"ok"}"#.to_string()));
        let secondary = ScriptedAgent::always(server_error());
        let submitter = Submitter::with_secondary(primary, Some(secondary));

        let outcome = submitter.submit(&request()).await.unwrap();
        assert_eq!(outcome.response_text, "ok");
        assert_eq!(outcome.report, ValidationReport::Opaque("ok".to_string()));

        submitter.flush_background(Duration::from_secs(1)).await;
        let secondary = submitter.secondary.as_ref().unwrap();
        assert_eq!(secondary.calls(), 1);
        assert_eq!(submitter.pending_background(), 0);
    }

    #[tokio::test]
    async fn test_secondary_gets_own_session_and_same_message() {
        let primary = ScriptedAgent::always(Ok(r#"{"response":"ok"}"#.to_string()));
        let secondary = ScriptedAgent::always(Ok("{}".to_string()));
        let submitter = Submitter::with_secondary(primary, Some(secondary));

        let outcome = submitter.submit(&request()).await.unwrap();
        submitter.flush_background(Duration::from_secs(1)).await;

        let mirrored = submitter.secondary.as_ref().unwrap().prompts();
        assert_eq!(mirrored.len(), 1);
        assert!(mirrored[0].session_id.as_str().starts_with("secondary_session_"));
        assert_ne!(mirrored[0].session_id, outcome.session_id);
        assert_eq!(mirrored[0].message, request().prompt());
    }

    #[tokio::test]
    async fn test_primary_failure_is_surfaced_with_secondary_success() {
        let primary = ScriptedAgent::always(Err(UpstreamFailure::new(
            ErrorKind::AuthError,
            Some(401),
            "bad key",
        )));
        let secondary = ScriptedAgent::always(Ok("{}".to_string()));
        let submitter = Submitter::with_secondary(primary, Some(secondary));

        let err = submitter.submit(&request()).await.unwrap_err();
        assert!(matches!(err, Error::Upstream(ref f) if f.kind == ErrorKind::AuthError));
        assert_eq!(err.user_message(), ErrorKind::AuthError.user_message());
        assert_eq!(submitter.primary.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_reuse_session_id() {
        let primary = ScriptedAgent::scripted(
            vec![
                Err(UpstreamFailure::network("reset")),
                Err(UpstreamFailure::new(ErrorKind::ServerUnavailable, Some(503), "busy")),
            ],
            Ok(r#"{"message":"third time lucky"}"#.to_string()),
        );
        let submitter = Submitter::new(primary);

        let outcome = submitter.submit(&request()).await.unwrap();
        assert_eq!(outcome.response_text, "third time lucky");

        let prompts = submitter.primary.prompts();
        assert_eq!(prompts.len(), 3);
        assert!(prompts.iter().all(|p| p.session_id == outcome.session_id));
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_submission_gets_fresh_session() {
        let primary = ScriptedAgent::always(Ok("plain".to_string()));
        let submitter = Submitter::new(primary);

        let first = submitter.submit(&request()).await.unwrap();
        let second = submitter.submit(&request()).await.unwrap();
        assert_ne!(first.session_id, second.session_id);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_exhausts_retry_budget() {
        let primary = ScriptedAgent::always(Err(UpstreamFailure::new(
            ErrorKind::RateLimited,
            Some(429),
            "slow down",
        )));
        let submitter = Submitter::new(primary).with_retry_policy(RetryPolicy::default());

        let err = submitter.submit(&request()).await.unwrap_err();
        assert_eq!(err.user_message(), ErrorKind::RateLimited.user_message());
        assert_eq!(submitter.primary.calls(), 3);
    }

    #[tokio::test]
    async fn test_probe_makes_single_attempt() {
        let primary = ScriptedAgent::always(Err(UpstreamFailure::network("refused")));
        let submitter = Submitter::new(primary);

        let failure = submitter.probe().await.unwrap_err();
        assert_eq!(failure.kind, ErrorKind::NetworkError);
        assert_eq!(submitter.primary.calls(), 1);

        let prompt = &submitter.primary.prompts()[0];
        assert!(prompt.message.contains(PROBE_IDEA));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_secondary_does_not_delay_primary() {
        let primary = ScriptedAgent::always(Ok(r#"{"response":"ok"}"#.to_string()));
        let secondary =
            ScriptedAgent::always(Ok("{}".to_string())).with_latency(Duration::from_secs(5));
        let submitter = Submitter::with_secondary(primary, Some(secondary));

        let start = tokio::time::Instant::now();
        let outcome = submitter.submit(&request()).await.unwrap();
        assert_eq!(outcome.response_text, "ok");
        assert!(start.elapsed() < Duration::from_secs(1));
        assert_eq!(submitter.pending_background(), 1);

        submitter.flush_background(Duration::from_secs(10)).await;
        assert!(start.elapsed() >= Duration::from_secs(5));
        assert_eq!(submitter.secondary.as_ref().unwrap().calls(), 1);
        assert_eq!(submitter.pending_background(), 0);
    }

    #[tokio::test]
    async fn test_without_secondary_nothing_is_spawned() {
        let submitter = Submitter::new(ScriptedAgent::always(Ok("{}".to_string())));
        assert!(!submitter.has_secondary());

        submitter.submit(&request()).await.unwrap();
        assert_eq!(submitter.pending_background(), 0);
    }
}
