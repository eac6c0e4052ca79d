//! Snapshot tests for the Lyzr client

#[cfg(test)]
mod snapshot_tests {
    use crate::{HealthStatus, LyzrClient, LyzrConfig, ValidationAgent};
    use insta::assert_yaml_snapshot;

    #[test]
    fn test_config_snapshot_omits_api_key() {
        let config = LyzrConfig::new("test_api_key_redacted", "agent_123");

        assert_yaml_snapshot!(config, @r###"
        ---
        agent_id: agent_123
        endpoint: "https://api.lyzr.ai/v1/chat/completions"
        "###);
    }

    #[test]
    fn test_health_error_snapshot() {
        let status = HealthStatus::from_lookup(|_| None);

        assert_yaml_snapshot!(status, @r###"
        ---
        status: error
        error: LYZR_API_KEY environment variable is not configured
        "###);
    }

    #[test]
    fn test_health_ok_snapshot() {
        let status = HealthStatus::from_lookup(|_| Some("set".to_string()));

        assert_yaml_snapshot!(status, @r###"
        ---
        status: ok
        message: API credentials configured
        "###);
    }

    #[test]
    fn test_client_exposes_agent_identity() {
        let config = LyzrConfig::new("key", "agent_123").with_endpoint("http://localhost:8080/chat");
        let client = LyzrClient::secondary(config).unwrap();

        assert_eq!(client.agent_id(), "agent_123");
        assert_eq!(client.endpoint(), "http://localhost:8080/chat");
    }
}
