//! Run statistics

use std::time::Duration;

use contracts::MessageKind;
use observability::{RunningStats, StatsSummary};
use serde_json::Value;

/// Counters collected over one run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Input lines read (including the failing one, if any)
    pub lines_read: u64,
    /// Input bytes consumed, newlines included
    pub bytes_read: u64,
    pub schema_messages: u64,
    pub record_messages: u64,
    pub state_messages: u64,
    pub activate_version_messages: u64,
    /// Records that passed validation and entered the batch
    pub records_accepted: u64,
    /// Successful sender calls
    pub sends: u64,
    /// Records carried by successful sender calls
    pub records_sent: u64,
    /// Distinct streams with a schema at the end of the run
    pub streams_declared: usize,
    /// Wall time spent inside the sender
    pub send_latency: RunningStats,
    /// Total run duration
    pub duration: Duration,
}

impl RunSummary {
    pub(crate) fn count_message(&mut self, kind: MessageKind) {
        match kind {
            MessageKind::Schema => self.schema_messages += 1,
            MessageKind::Record => self.record_messages += 1,
            MessageKind::State => self.state_messages += 1,
            MessageKind::ActivateVersion => self.activate_version_messages += 1,
        }
    }

    pub(crate) fn record_send(&mut self, records: usize, latency: Duration) {
        self.sends += 1;
        self.records_sent += records as u64;
        self.send_latency.push(latency.as_secs_f64() * 1000.0);
    }

    /// Total decoded messages
    pub fn messages(&self) -> u64 {
        self.schema_messages
            + self.record_messages
            + self.state_messages
            + self.activate_version_messages
    }

    /// Send latency statistics in milliseconds
    pub fn latency_ms(&self) -> StatsSummary {
        self.send_latency.summary()
    }

    /// Records sent per second of run time
    pub fn records_per_sec(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.records_sent as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Last checkpoint seen, reset by any later accepted record
    pub checkpoint: Option<Value>,
    pub summary: RunSummary,
}
