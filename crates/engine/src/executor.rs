//! Execution collaborator boundary.
//!
//! The wizard hands a fully validated [`ExecutionRequest`] to a
//! [`ScriptExecutor`] and renders whatever tagged output comes back.
//! [`MockExecutor`] stands in for a real backend.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use scriptdeck_registry::ExecutorConfig;
use scriptdeck_types::{ExecutionRequest, ExecutionResponse};
use scriptdeck_util::redact_payload;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::transcripts;

/// Error reported as `error` on a simulated failure.
pub const SIMULATED_FAILURE: &str = "Connection timeout";

/// Failures that prevent the collaborator from producing any response.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("request has no endpoint")]
    MissingEndpoint,
    /// The background task running the request died.
    #[error("execution task failed: {0}")]
    Task(String),
}

/// Runs one request and reports its outcome.
#[async_trait]
pub trait ScriptExecutor: Send + Sync {
    async fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionResponse, ExecutionError>;
}

/// Synthetic collaborator: waits, then answers with a canned transcript.
#[derive(Debug, Clone)]
pub struct MockExecutor {
    latency: Duration,
    simulate_failure: bool,
}

impl Default for MockExecutor {
    fn default() -> Self {
        Self::from_config(&ExecutorConfig::default())
    }
}

impl MockExecutor {
    pub fn new(latency: Duration, simulate_failure: bool) -> Self {
        Self { latency, simulate_failure }
    }

    pub fn from_config(config: &ExecutorConfig) -> Self {
        Self::new(Duration::from_millis(config.latency_ms), config.simulate_failure)
    }

    /// A collaborator with no artificial delay.
    pub fn immediate() -> Self {
        Self::new(Duration::ZERO, false)
    }

    pub fn failing(mut self, simulate_failure: bool) -> Self {
        self.simulate_failure = simulate_failure;
        self
    }
}

#[async_trait]
impl ScriptExecutor for MockExecutor {
    async fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionResponse, ExecutionError> {
        if request.endpoint.trim().is_empty() {
            return Err(ExecutionError::MissingEndpoint);
        }

        let payload = Value::Object(request.payload.clone().into_iter().collect());
        info!(
            endpoint = %request.endpoint,
            method = %request.method,
            payload = %redact_payload(&payload),
            "executing script"
        );

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if self.simulate_failure {
            warn!(endpoint = %request.endpoint, "simulated execution failure");
            return Ok(ExecutionResponse::failed(SIMULATED_FAILURE, transcripts::failure()));
        }

        let output = transcripts::render(&request.endpoint, &request.payload, Utc::now());
        Ok(ExecutionResponse::succeeded(payload, output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use scriptdeck_types::{HttpMethod, LogTag, classify_output};
    use serde_json::json;

    fn request(endpoint: &str) -> ExecutionRequest {
        let mut payload = IndexMap::new();
        payload.insert("hostname".to_string(), json!("web-1"));
        payload.insert("actionId".to_string(), json!("cleanup"));
        ExecutionRequest::new(endpoint, HttpMethod::Post, payload)
    }

    #[tokio::test]
    async fn success_echoes_payload_without_routing_keys() {
        let response = MockExecutor::immediate().execute(&request("/api/default")).await.expect("response");
        assert!(response.success);
        assert_eq!(response.data, Some(json!({ "hostname": "web-1" })));
        let output = response.output.expect("output");
        let tags: Vec<LogTag> = classify_output(output.trim_end()).into_iter().map(|(tag, _)| tag).collect();
        assert_eq!(tags, [LogTag::Info, LogTag::Info, LogTag::Success]);
    }

    #[tokio::test]
    async fn simulated_failure_reports_error_lines() {
        let response = MockExecutor::immediate()
            .failing(true)
            .execute(&request("/api/system/disk/cleanup"))
            .await
            .expect("response");
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some(SIMULATED_FAILURE));
        assert!(response.data.is_none());
        assert!(response.output.expect("output").starts_with("[ERROR] Failed to execute script"));
    }

    #[tokio::test]
    async fn blank_endpoint_is_rejected() {
        let result = MockExecutor::immediate().execute(&request("  ")).await;
        assert_eq!(result, Err(ExecutionError::MissingEndpoint));
    }

    #[tokio::test(start_paused = true)]
    async fn latency_is_honoured() {
        let executor = MockExecutor::new(Duration::from_millis(1500), false);
        let started = tokio::time::Instant::now();
        executor.execute(&request("/api/default")).await.expect("response");
        assert!(started.elapsed() >= Duration::from_millis(1500));
    }
}
