//! Tap message protocol
//!
//! One line of input carries exactly one message, discriminated by its `type` field.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A single data record (always a JSON object)
pub type Record = Map<String, Value>;

/// Message received from the tap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    /// Declares (or redeclares) the schema of a stream
    Schema(SchemaMessage),
    /// One data record of a stream
    Record(RecordMessage),
    /// Opaque checkpoint emitted by the tap
    State(StateMessage),
    /// Version activation signal (recognized but not acted upon)
    ActivateVersion(ActivateVersionMessage),
}

/// SCHEMA message body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaMessage {
    pub stream: String,

    /// JSON Schema document (Draft 4)
    pub schema: Value,

    /// Field names forming the natural key, in order
    pub key_properties: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bookmark_properties: Option<Vec<String>>,
}

/// RECORD message body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMessage {
    pub stream: String,

    pub record: Record,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_extracted: Option<String>,
}

/// STATE message body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateMessage {
    pub value: Value,
}

/// ACTIVATE_VERSION message body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivateVersionMessage {
    pub stream: String,
    pub version: i64,
}

/// Message kind, without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Schema,
    Record,
    State,
    ActivateVersion,
}

impl MessageKind {
    /// Wire name of the kind (value of the `type` field)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Schema => "SCHEMA",
            Self::Record => "RECORD",
            Self::State => "STATE",
            Self::ActivateVersion => "ACTIVATE_VERSION",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Message {
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::Schema(_) => MessageKind::Schema,
            Self::Record(_) => MessageKind::Record,
            Self::State(_) => MessageKind::State,
            Self::ActivateVersion(_) => MessageKind::ActivateVersion,
        }
    }

    /// Stream the message belongs to, if any
    pub fn stream(&self) -> Option<&str> {
        match self {
            Self::Schema(m) => Some(&m.stream),
            Self::Record(m) => Some(&m.stream),
            Self::ActivateVersion(m) => Some(&m.stream),
            Self::State(_) => None,
        }
    }
}
