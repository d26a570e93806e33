//! Layered error definitions
//!
//! Categorized by source: config / protocol / schema / delivery

use thiserror::Error;

/// Longest slice of an offending input line kept inside an error
const MAX_LINE_EXCERPT: usize = 200;

/// Unified error type
///
/// Every variant is fatal for the run: nothing is retried and nothing is swallowed.
#[derive(Debug, Error)]
pub enum TargetError {
    // ===== Configuration Errors =====
    /// Configuration file could not be parsed
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Missing or invalid configuration key
    #[error("config error at '{field}': {message}")]
    Config { field: String, message: String },

    // ===== Protocol Errors =====
    /// Input line is not valid JSON
    #[error("unable to parse line as JSON: {message} (line: {line})")]
    Parse { line: String, message: String },

    /// Well-formed JSON that is not a valid tap message
    #[error("protocol error: {message}")]
    Protocol { message: String },

    // ===== Schema Errors =====
    /// A RECORD arrived before any SCHEMA for its stream
    #[error("a record for stream '{stream}' was encountered before a corresponding schema")]
    UnknownStream { stream: String },

    /// The declared schema document could not be compiled
    #[error("invalid schema for stream '{stream}': {message}")]
    SchemaCompile { stream: String, message: String },

    /// Record does not conform to the stream schema
    #[error("record for stream '{stream}' failed validation at '{path}': {message}")]
    Validation {
        stream: String,
        path: String,
        message: String,
    },

    // ===== Delivery Errors =====
    /// REST endpoint rejected the payload or could not be reached
    #[error("delivery to '{url}' failed: {}", describe_delivery(*status, message))]
    Delivery {
        url: String,
        status: Option<u16>,
        message: String,
    },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_delivery(status: Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("returned status code {code}"),
        None => message.to_string(),
    }
}

impl TargetError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration key error
    pub fn config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create JSON parse error, keeping an excerpt of the offending line
    pub fn parse(line: &str, message: impl Into<String>) -> Self {
        Self::Parse {
            line: excerpt(line),
            message: message.into(),
        }
    }

    /// Create protocol error
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Create unknown stream error
    pub fn unknown_stream(stream: impl Into<String>) -> Self {
        Self::UnknownStream {
            stream: stream.into(),
        }
    }

    /// Create schema compile error
    pub fn schema_compile(stream: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SchemaCompile {
            stream: stream.into(),
            message: message.into(),
        }
    }

    /// Create record validation error
    pub fn validation(
        stream: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Validation {
            stream: stream.into(),
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create delivery error for a non-success HTTP status
    pub fn delivery_status(url: impl Into<String>, status: u16) -> Self {
        Self::Delivery {
            url: url.into(),
            status: Some(status),
            message: format!("status code {status}"),
        }
    }

    /// Create delivery error for a transport failure
    pub fn delivery_transport(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Delivery {
            url: url.into(),
            status: None,
            message: message.into(),
        }
    }

    /// Short machine-friendly name of the error kind (used as a log/metric label)
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConfigParse { .. } | Self::Config { .. } => "config",
            Self::Parse { .. } => "parse",
            Self::Protocol { .. } => "protocol",
            Self::UnknownStream { .. } => "unknown_stream",
            Self::SchemaCompile { .. } => "schema_compile",
            Self::Validation { .. } => "validation",
            Self::Delivery { .. } => "delivery",
            Self::Io(_) => "io",
        }
    }
}

fn excerpt(line: &str) -> String {
    match line.char_indices().nth(MAX_LINE_EXCERPT) {
        Some((idx, _)) => format!("{}...", &line[..idx]),
        None => line.to_string(),
    }
}
