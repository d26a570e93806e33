//! # Contracts
//!
//! Frozen interface contracts shared by every crate of the target:
//! the tap message protocol, the delivery payload, the sender trait,
//! the target configuration and the unified error type.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Wire model
//! - Input is one JSON object per line, tagged by its `type` field
//! - Output is the last checkpoint value, one JSON line on stdout

mod config;
mod error;
mod message;
mod payload;
mod sink;

pub use config::*;
pub use error::*;
pub use message::*;
pub use payload::*;
pub use sink::*;
