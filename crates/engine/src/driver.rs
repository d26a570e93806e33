//! Pipeline driver
//!
//! Pulls one line at a time, decodes it and routes the message to the
//! registry, the batch or the checkpoint. Every step is awaited before the
//! next line is read, and the first error ends the run.

use std::time::Instant;

use contracts::{BatchSender, Message, RecordMessage, SchemaMessage, TargetConfig, TargetError};
use dispatcher::BatchAccumulator;
use ingestion::{decode, InputLine, LineSource};
use schema_registry::SchemaRegistry;
use serde_json::Value;
use tokio::io::AsyncBufRead;
use tracing::{debug, error, info, instrument, warn};

use crate::summary::{RunOutcome, RunSummary};

/// Sequential message pipeline for one run
pub struct Driver<S> {
    registry: SchemaRegistry,
    batch: BatchAccumulator,
    sender: S,
    checkpoint: Option<Value>,
    summary: RunSummary,
}

impl<S: BatchSender> Driver<S> {
    /// Create a driver delivering through `sender`, flushing every `batch_size` records
    pub fn new(sender: S, batch_size: usize) -> Self {
        Self {
            registry: SchemaRegistry::new(),
            batch: BatchAccumulator::new(batch_size),
            sender,
            checkpoint: None,
            summary: RunSummary::default(),
        }
    }

    /// Create a driver using the normalized batch size of `config`
    pub fn from_config(sender: S, config: &TargetConfig) -> Self {
        Self::new(sender, config.batch_size())
    }

    /// Current checkpoint
    pub fn checkpoint(&self) -> Option<&Value> {
        self.checkpoint.as_ref()
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Records buffered and not yet sent
    pub fn pending(&self) -> usize {
        self.batch.len()
    }

    pub fn sender(&self) -> &S {
        &self.sender
    }

    /// Drain `source`, then flush the remainder
    ///
    /// The driver stays usable afterwards for inspecting the sender.
    ///
    /// # Errors
    /// The first error of any kind; no further line is read after it.
    #[instrument(name = "driver_run", skip_all)]
    pub async fn run<R>(&mut self, mut source: LineSource<R>) -> Result<RunOutcome, TargetError>
    where
        R: AsyncBufRead + Unpin + Send,
    {
        let started = Instant::now();
        info!(
            sender = self.sender.name(),
            batch_size = self.batch.batch_size(),
            "Pipeline started"
        );

        loop {
            let line = match source.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    let e = TargetError::from(e);
                    self.report(None, &e);
                    return Err(e);
                }
            };

            self.summary.lines_read = source.line_count();
            self.summary.bytes_read = source.byte_count();
            if let Err(e) = self.process_line(&line).await {
                self.report(Some(line.number), &e);
                return Err(e);
            }
        }

        if let Err(e) = self.finish().await {
            self.report(None, &e);
            return Err(e);
        }

        self.summary.duration = started.elapsed();
        self.summary.streams_declared = self.registry.len();

        info!(
            lines = self.summary.lines_read,
            messages = self.summary.messages(),
            records_accepted = self.summary.records_accepted,
            sends = self.summary.sends,
            records_sent = self.summary.records_sent,
            bytes_read = self.summary.bytes_read,
            records_per_sec = format!("{:.1}", self.summary.records_per_sec()),
            streams = self.summary.streams_declared,
            send_latency_ms = %self.summary.latency_ms(),
            duration_secs = self.summary.duration.as_secs_f64(),
            "Pipeline completed"
        );

        Ok(RunOutcome {
            checkpoint: self.checkpoint.clone(),
            summary: self.summary.clone(),
        })
    }

    /// Decode and handle one input line
    pub async fn process_line(&mut self, line: &InputLine) -> Result<(), TargetError> {
        let message = decode(&line.text)?;
        self.handle(message).await
    }

    /// Handle one decoded message
    pub async fn handle(&mut self, message: Message) -> Result<(), TargetError> {
        let kind = message.kind();
        self.summary.count_message(kind);
        observability::record_message_received(kind.as_str());

        match message {
            Message::Schema(schema) => self.handle_schema(schema),
            Message::Record(record) => self.handle_record(record).await,
            Message::State(state) => {
                debug!(value = %state.value, "Setting state");
                // null carries no checkpoint
                self.checkpoint = if state.value.is_null() {
                    None
                } else {
                    Some(state.value)
                };
                Ok(())
            }
            Message::ActivateVersion(activate) => {
                warn!(
                    stream = %activate.stream,
                    version = activate.version,
                    "ACTIVATE_VERSION message ignored"
                );
                Ok(())
            }
        }
    }

    /// Send whatever is still buffered
    pub async fn finish(&mut self) -> Result<(), TargetError> {
        if !self.batch.is_empty() {
            debug!(records = self.batch.len(), "Flushing remaining records");
            self.flush().await?;
        }
        Ok(())
    }

    fn handle_schema(&mut self, message: SchemaMessage) -> Result<(), TargetError> {
        let SchemaMessage {
            stream,
            schema,
            key_properties,
            ..
        } = message;

        self.registry.declare(&stream, schema, key_properties)?;
        observability::record_schema_declared(&stream, self.registry.len());
        Ok(())
    }

    async fn handle_record(&mut self, message: RecordMessage) -> Result<(), TargetError> {
        let record = Value::Object(message.record);
        self.registry.validate(&message.stream, &record)?;

        self.batch.add(record);
        self.summary.records_accepted += 1;
        observability::record_record_accepted(&message.stream);

        if self.batch.is_full() {
            self.flush().await?;
        }

        self.checkpoint = None;
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), TargetError> {
        let Some(payload) = self.batch.take() else {
            return Ok(());
        };

        let records = payload.len();
        let started = Instant::now();
        self.sender.send(&payload).await?;
        let latency = started.elapsed();

        self.summary.record_send(records, latency);
        observability::record_batch_sent(
            self.sender.name(),
            records,
            latency.as_secs_f64() * 1000.0,
        );
        debug!(records, latency_ms = latency.as_millis() as u64, "Batch sent");
        Ok(())
    }

    fn report(&self, line: Option<u64>, err: &TargetError) {
        observability::record_pipeline_error(err.kind());
        match line {
            Some(line) => error!(line, kind = err.kind(), error = %err, "Pipeline failed"),
            None => error!(kind = err.kind(), error = %err, "Pipeline failed"),
        }
    }
}
