//! # Ingestion
//!
//! Tap message ingestion module.
//!
//! Responsibilities:
//! - Read the input stream one line at a time, in order
//! - Decode each line into a typed `Message`
//! - Reject malformed JSON (`Parse`) and malformed messages (`Protocol`)
//!
//! ## Usage Example
//!
//! ```ignore
//! use ingestion::{decode, LineSource};
//!
//! let mut source = LineSource::stdin();
//! while let Some(line) = source.next_line().await? {
//!     let message = decode(&line.text)?;
//!     // Dispatch message
//! }
//! ```

mod decoder;
mod source;

// Re-exports
pub use contracts::{Message, MessageKind};
pub use decoder::{decode, decode_value};
pub use source::{InputLine, LineSource};
