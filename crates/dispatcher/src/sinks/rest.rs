//! RestSink - JSON POST to the configured REST endpoint

use std::time::{Duration, Instant};

use contracts::{BatchSender, Payload, TargetConfig, TargetError};
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, error, instrument};

use crate::error::DispatcherError;
use crate::metrics::SinkMetrics;

/// Configuration for RestSink
#[derive(Debug, Clone)]
pub struct RestSinkConfig {
    /// Endpoint every payload is POSTed to
    pub url: String,
    /// Per-request timeout (None = wait indefinitely)
    pub timeout: Option<Duration>,
    /// User-Agent header value
    pub user_agent: String,
}

impl RestSinkConfig {
    /// Create config from the target configuration
    pub fn from_target_config(config: &TargetConfig) -> Self {
        Self {
            url: config.api_url.clone(),
            timeout: config.request_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_user_agent() -> String {
    format!("target-rest/{}", env!("CARGO_PKG_VERSION"))
}

/// Sink that POSTs every payload as a JSON body
///
/// Any 2xx response is a success. Everything else, including transport
/// failures, is a fatal `Delivery` error; nothing is retried.
pub struct RestSink {
    name: String,
    config: RestSinkConfig,
    client: reqwest::Client,
    metrics: SinkMetrics,
}

impl RestSink {
    /// Create a new RestSink
    #[instrument(name = "rest_sink_new", skip(name, config), fields(url = %config.url))]
    pub fn new(name: impl Into<String>, config: RestSinkConfig) -> Result<Self, DispatcherError> {
        let name = name.into();

        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| DispatcherError::sink_creation(&name, e.to_string()))?;

        debug!(sink = %name, url = %config.url, timeout = ?config.timeout, "RestSink ready");

        Ok(Self {
            name,
            config,
            client,
            metrics: SinkMetrics::new(),
        })
    }

    /// Create from the target configuration (for factory)
    pub fn from_target_config(
        name: impl Into<String>,
        config: &TargetConfig,
    ) -> Result<Self, DispatcherError> {
        Self::new(name, RestSinkConfig::from_target_config(config))
    }

    /// Endpoint URL
    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// Delivery counters
    pub fn metrics(&self) -> &SinkMetrics {
        &self.metrics
    }

    fn serialize_payload(&self, payload: &Payload) -> Result<Vec<u8>, TargetError> {
        serde_json::to_vec(payload).map_err(|e| {
            TargetError::delivery_transport(&self.config.url, format!("json error: {e}"))
        })
    }

    async fn post(&self, body: Vec<u8>) -> Result<reqwest::StatusCode, TargetError> {
        let response = self
            .client
            .post(&self.config.url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| TargetError::delivery_transport(&self.config.url, error_chain(&e)))?;

        Ok(response.status())
    }
}

impl BatchSender for RestSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "rest_sink_send",
        skip(self, payload),
        fields(sink = %self.name, records = payload.len())
    )]
    async fn send(&mut self, payload: &Payload) -> Result<(), TargetError> {
        if payload.is_empty() {
            debug!(sink = %self.name, "Empty batch, nothing to send");
            return Ok(());
        }

        let body = self.serialize_payload(payload)?;
        let bytes = body.len();
        let started = Instant::now();

        let status = match self.post(body).await {
            Ok(status) => status,
            Err(e) => {
                self.metrics.inc_failure_count();
                error!(sink = %self.name, url = %self.config.url, error = %e, "Request failed");
                return Err(e);
            }
        };

        if !status.is_success() {
            self.metrics.inc_failure_count();
            error!(
                sink = %self.name,
                url = %self.config.url,
                status = status.as_u16(),
                "REST API rejected payload"
            );
            return Err(TargetError::delivery_status(&self.config.url, status.as_u16()));
        }

        self.metrics.record_send(payload.len(), bytes);
        debug!(
            sink = %self.name,
            status = status.as_u16(),
            bytes,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Sent"
        );
        Ok(())
    }
}

/// Flatten an error and its sources into one line
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
