//! Service-specific tests
//!
//! The HTTP services run against a local wiremock server; each service has
//! its own test file.

mod deals_api;

pub mod common {
    use std::time::Duration;

    use wiremock::MockServer;

    use crate::config::PipelineConfig;

    /// Config pointing at the mock server with a short timeout
    pub fn config_for(server: &MockServer) -> PipelineConfig {
        let mut config = PipelineConfig::from_lookup(|_| None)
            .and_then(|config| config.with_api_base_url(&server.uri()))
            .expect("mock server URI is a valid base URL");
        config.request_timeout = Duration::from_millis(500);
        config
    }
}
