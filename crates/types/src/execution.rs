//! Request/response contract of the execution collaborator and the bracketed
//! tag convention used by its textual output.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::HttpMethod;

/// Internal routing keys carried alongside form data; never sent as payload.
pub const ROUTING_KEYS: [&str; 4] = ["actionId", "actionName", "endpoint", "method"];

/// A single invocation of an action endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    pub endpoint: String,
    pub method: HttpMethod,
    /// Form values keyed by parameter id, routing keys removed.
    pub payload: IndexMap<String, Value>,
}

impl ExecutionRequest {
    /// Builds a request, dropping any routing keys from `payload`.
    pub fn new(endpoint: impl Into<String>, method: HttpMethod, mut payload: IndexMap<String, Value>) -> Self {
        payload.retain(|key, _| !ROUTING_KEYS.contains(&key.as_str()));
        Self {
            endpoint: endpoint.into(),
            method,
            payload,
        }
    }
}

/// Outcome reported by the execution collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl ExecutionResponse {
    pub fn succeeded(data: Value, output: String) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            output: Some(output),
        }
    }

    pub fn failed(error: impl Into<String>, output: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            output: Some(output),
        }
    }
}

/// Visual class of one output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogTag {
    Success,
    Error,
    Warning,
    Info,
    Plain,
}

impl LogTag {
    /// Bracketed marker written at the start of a tagged line.
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Success => "[SUCCESS]",
            Self::Error => "[ERROR]",
            Self::Warning => "[WARNING]",
            Self::Info => "[INFO]",
            Self::Plain => "",
        }
    }

    /// Classifies a line by the first marker it contains, checked in
    /// success, error, warning, info order.
    pub fn classify(line: &str) -> Self {
        [Self::Success, Self::Error, Self::Warning, Self::Info]
            .into_iter()
            .find(|tag| line.contains(tag.marker()))
            .unwrap_or(Self::Plain)
    }

    /// Formats `message` as a tagged output line (without newline).
    pub fn line(&self, message: impl AsRef<str>) -> String {
        match self {
            Self::Plain => message.as_ref().to_string(),
            tag => format!("{} {}", tag.marker(), message.as_ref()),
        }
    }
}

/// Splits output text into classified lines.
pub fn classify_output(output: &str) -> Vec<(LogTag, &str)> {
    output.split('\n').map(|line| (LogTag::classify(line), line)).collect()
}
