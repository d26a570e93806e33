//! BatchAccumulator - groups validated records into payloads

use contracts::Payload;
use serde_json::Value;

/// In-progress batch of validated records
///
/// Records from all streams share one batch, in arrival order.
#[derive(Debug)]
pub struct BatchAccumulator {
    batch_size: usize,
    records: Vec<Value>,
}

impl BatchAccumulator {
    /// Create an accumulator flushing every `batch_size` records
    ///
    /// A size of 0 is treated as 1 (unbatched).
    pub fn new(batch_size: usize) -> Self {
        let batch_size = batch_size.max(1);
        Self {
            batch_size,
            records: Vec::with_capacity(batch_size.min(1024)),
        }
    }

    /// Append a record, returning the new batch size
    pub fn add(&mut self, record: Value) -> usize {
        self.records.push(record);
        self.records.len()
    }

    /// Whether the threshold has been reached
    pub fn is_full(&self) -> bool {
        self.records.len() >= self.batch_size
    }

    /// Take everything buffered as one payload, leaving the batch empty
    ///
    /// Unbatched mode yields a single object, batched mode an array
    /// (even for a short final remainder).
    pub fn take(&mut self) -> Option<Payload> {
        if self.records.is_empty() {
            return None;
        }

        if self.batch_size == 1 && self.records.len() == 1 {
            return self.records.pop().map(Payload::Single);
        }

        Some(Payload::Batch(std::mem::take(&mut self.records)))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }
}
