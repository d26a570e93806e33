//! Payload - what a single sender call delivers

use serde::Serialize;
use serde_json::Value;

/// Body of one outbound request
///
/// Serialized as-is: a single record becomes a JSON object,
/// a batch becomes a JSON array of objects. Every carried value is a
/// record object that already passed schema validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    /// Unbatched mode (batch size 1)
    Single(Value),
    /// Batched mode, records in arrival order
    Batch(Vec<Value>),
}

impl Payload {
    /// Number of records carried
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Batch(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over the carried records
    pub fn records(&self) -> impl Iterator<Item = &Value> {
        let records: &[Value] = match self {
            Self::Single(record) => std::slice::from_ref(record),
            Self::Batch(records) => records,
        };
        records.iter()
    }
}
