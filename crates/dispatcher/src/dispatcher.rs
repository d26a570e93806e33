//! Sink factory - builds the sender the pipeline delivers to

use contracts::{BatchSender, Payload, TargetConfig, TargetError};
use tracing::{info, instrument};

use crate::error::DispatcherError;
use crate::metrics::MetricsSnapshot;
use crate::sinks::{LogSink, RestSink};

/// Which sink to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SinkKind {
    /// POST payloads to `api_url`
    #[default]
    Rest,
    /// Only log payload summaries (dry run)
    Log,
}

/// Sender selected at startup
pub enum TargetSink {
    Rest(RestSink),
    Log(LogSink),
}

impl TargetSink {
    /// Delivery counters of the underlying sink
    pub fn metrics(&self) -> MetricsSnapshot {
        match self {
            Self::Rest(sink) => sink.metrics().snapshot(),
            Self::Log(sink) => sink.metrics().snapshot(),
        }
    }
}

impl BatchSender for TargetSink {
    fn name(&self) -> &str {
        match self {
            Self::Rest(sink) => sink.name(),
            Self::Log(sink) => sink.name(),
        }
    }

    async fn send(&mut self, payload: &Payload) -> Result<(), TargetError> {
        match self {
            Self::Rest(sink) => sink.send(payload).await,
            Self::Log(sink) => sink.send(payload).await,
        }
    }
}

/// Create the sink for this run from configuration
#[instrument(name = "dispatcher_create_sink", skip(config), fields(url = %config.api_url))]
pub fn create_sink(config: &TargetConfig, kind: SinkKind) -> Result<TargetSink, DispatcherError> {
    let sink = match kind {
        SinkKind::Rest => TargetSink::Rest(RestSink::from_target_config("rest", config)?),
        SinkKind::Log => TargetSink::Log(LogSink::new("log")),
    };

    info!(sink = sink.name(), kind = ?kind, "Sink created");
    Ok(sink)
}
