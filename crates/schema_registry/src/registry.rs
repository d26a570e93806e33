//! Per-stream schema registry
//!
//! Holds the latest declared schema of every stream together with its
//! compiled validator and key properties.

use std::collections::HashMap;
use std::fmt;

use contracts::TargetError;
use jsonschema::Validator;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::multiple_of;

/// Validation errors reported per rejected record
const MAX_REPORTED_ERRORS: usize = 5;

/// State kept for one declared stream
pub struct StreamState {
    /// JSON Schema document as declared
    pub schema: Value,
    /// Compiled Draft 4 validator for `schema`
    validator: Validator,
    /// Natural key field names, in declared order
    pub key_properties: Vec<String>,
}

impl fmt::Debug for StreamState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamState")
            .field("schema", &self.schema)
            .field("key_properties", &self.key_properties)
            .finish_non_exhaustive()
    }
}

impl StreamState {
    /// Compile `schema` into a new stream state
    ///
    /// `format` keywords are annotations only, matching the Draft 4
    /// behaviour taps are written against. `multipleOf` is checked in exact
    /// decimal arithmetic.
    fn compile(stream: &str, schema: Value, key_properties: Vec<String>) -> Result<Self, TargetError> {
        let validator = jsonschema::draft4::options()
            .should_validate_formats(false)
            .with_keyword(multiple_of::KEYWORD, multiple_of::factory)
            .build(&schema)
            .map_err(|e| TargetError::schema_compile(stream, e.to_string()))?;

        Ok(Self {
            schema,
            validator,
            key_properties,
        })
    }

    /// Whether `record` conforms to the schema
    pub fn is_valid(&self, record: &Value) -> bool {
        self.validator.is_valid(record)
    }
}

/// Registry of declared streams
///
/// Entries are created or overwritten by SCHEMA messages and never removed
/// during a run.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    streams: HashMap<String, StreamState>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare (or redeclare) a stream
    ///
    /// # Errors
    /// `SchemaCompile` if the schema document cannot be compiled; the previous
    /// state of the stream (if any) is left untouched in that case.
    #[instrument(name = "registry_declare", skip(self, schema, key_properties))]
    pub fn declare(
        &mut self,
        stream: &str,
        schema: Value,
        key_properties: Vec<String>,
    ) -> Result<(), TargetError> {
        let state = StreamState::compile(stream, schema, key_properties)?;
        let replaced = self.streams.insert(stream.to_string(), state).is_some();

        debug!(
            stream,
            replaced,
            key_properties = ?self.key_properties(stream),
            "Schema declared"
        );
        Ok(())
    }

    /// Validate a record against the latest schema of `stream`
    ///
    /// # Errors
    /// - `UnknownStream` if no schema was declared for `stream`
    /// - `Validation` with the offending path and constraint(s)
    pub fn validate(&self, stream: &str, record: &Value) -> Result<(), TargetError> {
        let state = self
            .streams
            .get(stream)
            .ok_or_else(|| TargetError::unknown_stream(stream))?;

        let mut errors = state.validator.iter_errors(record).peekable();
        let Some(first) = errors.peek() else {
            return Ok(());
        };
        let path = display_path(&first.instance_path.to_string());

        let messages: Vec<String> = errors
            .take(MAX_REPORTED_ERRORS)
            .map(|e| format!("{} (at {})", e, display_path(&e.instance_path.to_string())))
            .collect();

        Err(TargetError::validation(stream, path, messages.join("; ")))
    }

    /// State of a declared stream
    pub fn get(&self, stream: &str) -> Option<&StreamState> {
        self.streams.get(stream)
    }

    /// Key properties of a declared stream
    pub fn key_properties(&self, stream: &str) -> Option<&[String]> {
        self.streams.get(stream).map(|s| s.key_properties.as_slice())
    }

    pub fn contains(&self, stream: &str) -> bool {
        self.streams.contains_key(stream)
    }

    /// Names of declared streams (no particular order)
    pub fn streams(&self) -> impl Iterator<Item = &str> {
        self.streams.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }
}

fn display_path(pointer: &str) -> String {
    if pointer.is_empty() {
        "/".to_string()
    } else {
        pointer.to_string()
    }
}
