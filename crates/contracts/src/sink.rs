//! BatchSender trait - delivery interface of the target
//!
//! Defines the abstract interface the pipeline driver hands payloads to.

use crate::{Payload, TargetError};

/// Outbound delivery trait
///
/// All sender implementations must implement this trait.
#[trait_variant::make(BatchSender: Send)]
pub trait LocalBatchSender {
    /// Sender name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Deliver one payload
    ///
    /// # Errors
    /// Returns `TargetError::Delivery` on any non-success outcome.
    /// Callers treat it as fatal: no retry, no partial acknowledgement.
    async fn send(&mut self, payload: &Payload) -> Result<(), TargetError>;
}
