//! LogSink - logs payload summary via tracing instead of delivering it

use contracts::{BatchSender, Payload, TargetError};
use tracing::{info, instrument};

use crate::metrics::SinkMetrics;

/// Sink that logs payload summaries (dry runs and debugging)
pub struct LogSink {
    name: String,
    metrics: SinkMetrics,
}

impl LogSink {
    /// Create a new LogSink with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metrics: SinkMetrics::new(),
        }
    }

    /// Delivery counters
    pub fn metrics(&self) -> &SinkMetrics {
        &self.metrics
    }

    fn log_payload_summary(&self, payload: &Payload, bytes: usize) {
        let shape = match payload {
            Payload::Single(_) => "object",
            Payload::Batch(_) => "array",
        };

        info!(
            sink = %self.name,
            records = payload.len(),
            shape,
            bytes,
            "Payload received"
        );
    }
}

impl BatchSender for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "log_sink_send",
        skip(self, payload),
        fields(sink = %self.name, records = payload.len())
    )]
    async fn send(&mut self, payload: &Payload) -> Result<(), TargetError> {
        let bytes = serde_json::to_vec(payload).map(|b| b.len()).unwrap_or(0);
        self.log_payload_summary(payload, bytes);
        self.metrics.record_send(payload.len(), bytes);
        Ok(())
    }
}
