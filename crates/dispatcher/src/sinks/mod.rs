//! Sink implementations
//!
//! Contains RestSink and LogSink.

mod log;
mod rest;

pub use self::log::LogSink;
pub use self::rest::{RestSink, RestSinkConfig};
