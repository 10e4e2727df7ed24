//! StatusTable - 順序付きのステータス行の列

use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::record::StatusRecord;

/// Ordered, immutable sequence of [`StatusRecord`]s.
///
/// Insertion order is significant and is never re-sorted. Cloning is a cheap
/// reference-counted snapshot, so readers can hold on to a table while the
/// model moves on to a newer one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusTable {
    records: Arc<[StatusRecord]>,
}

impl StatusTable {
    pub fn new(records: Vec<StatusRecord>) -> Self {
        Self {
            records: Arc::from(records),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Decode a table from publisher JSON.
    ///
    /// - array: each element becomes a record (non-objects become empty records)
    /// - anything else: empty table
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Array(items) => items.iter().map(StatusRecord::from_json).collect(),
            Value::Null => Self::empty(),
            other => {
                tracing::debug!(kind = json_kind(other), "status table is not an array");
                Self::empty()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[StatusRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StatusRecord> {
        self.records.iter()
    }
}

impl Default for StatusTable {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Vec<StatusRecord>> for StatusTable {
    fn from(records: Vec<StatusRecord>) -> Self {
        Self::new(records)
    }
}

impl FromIterator<StatusRecord> for StatusTable {
    fn from_iter<I: IntoIterator<Item = StatusRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a StatusTable {
    type Item = &'a StatusRecord;
    type IntoIter = std::slice::Iter<'a, StatusRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for StatusTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.records.iter())
    }
}

impl<'de> Deserialize<'de> for StatusTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_json(&value))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
