//! TargetConfig - Config Loader output
//!
//! Describes where records are delivered and how they are grouped.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use validator::Validate;

/// Target configuration document
///
/// Unknown keys are ignored: the same file is often shared with the tap
/// or the orchestrator.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct TargetConfig {
    /// REST endpoint every payload is POSTed to (required)
    #[serde(default)]
    #[validate(url(message = "api_url must be an absolute URL"))]
    pub api_url: String,

    /// Raw batch size as written in the document, see [`TargetConfig::batch_size`]
    #[serde(default)]
    pub batch_size: Option<Value>,

    /// Suppress the anonymous usage-statistics call at startup
    #[serde(default)]
    pub disable_collection: bool,

    /// HTTP request timeout in seconds (0 = no timeout)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    300
}

impl TargetConfig {
    /// Create a config targeting `api_url` with every other key at its default
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            request_timeout_secs: default_request_timeout_secs(),
            ..Default::default()
        }
    }

    /// Effective batch size
    ///
    /// A missing, null, non-integer, zero or negative value yields 1,
    /// meaning every record is sent on its own.
    pub fn batch_size(&self) -> usize {
        self.batch_size
            .as_ref()
            .and_then(Value::as_u64)
            .and_then(|n| usize::try_from(n).ok())
            .filter(|n| *n >= 1)
            .unwrap_or(1)
    }

    /// Effective request timeout
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}
