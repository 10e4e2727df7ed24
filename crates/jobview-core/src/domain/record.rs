//! StatusRecord - ジョブ 1 件分のステータス行
//!
//! # 学習ポイント
//! - `#[serde(deserialize_with = ...)]` による寛容なデコード
//! - 既知ラベル + 自由形式フォールバックの enum

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Execution state label of a unit of work.
///
/// Known labels map to dedicated variants; anything else is kept verbatim in
/// `Other` so that the rendered label is always exactly what the publisher sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordStatus {
    /// No label was provided (renders as an empty cell).
    #[default]
    Unset,
    Pending,
    Running,
    Done,
    Failed,
    Other(String),
}

impl RecordStatus {
    pub fn as_str(&self) -> &str {
        match self {
            RecordStatus::Unset => "",
            RecordStatus::Pending => "pending",
            RecordStatus::Running => "running",
            RecordStatus::Done => "done",
            RecordStatus::Failed => "failed",
            RecordStatus::Other(label) => label,
        }
    }

    /// Is the unit of work still alive (not finished either way)?
    pub fn is_alive(&self) -> bool {
        matches!(self, RecordStatus::Pending | RecordStatus::Running)
    }
}

impl From<String> for RecordStatus {
    fn from(label: String) -> Self {
        match label.as_str() {
            "" => RecordStatus::Unset,
            "pending" => RecordStatus::Pending,
            "running" => RecordStatus::Running,
            "done" => RecordStatus::Done,
            "failed" => RecordStatus::Failed,
            _ => RecordStatus::Other(label),
        }
    }
}

impl From<&str> for RecordStatus {
    fn from(label: &str) -> Self {
        RecordStatus::from(label.to_string())
    }
}

impl From<RecordStatus> for String {
    fn from(status: RecordStatus) -> Self {
        match status {
            RecordStatus::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of job status: `status`, `name`, `stats`, `flags`.
///
/// Decoding is lenient: missing fields become empty strings, unknown fields
/// are ignored and non-string scalars are stringified. A malformed record
/// therefore never fails to decode; it just renders with empty cells.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatusRecord {
    #[serde(default, deserialize_with = "lenient_status")]
    status: RecordStatus,
    #[serde(default, deserialize_with = "lenient_string")]
    name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    stats: String,
    #[serde(default, deserialize_with = "lenient_string")]
    flags: String,
}

impl StatusRecord {
    pub fn new(status: impl Into<RecordStatus>, name: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            name: name.into(),
            stats: String::new(),
            flags: String::new(),
        }
    }

    pub fn with_stats(mut self, stats: impl Into<String>) -> Self {
        self.stats = stats.into();
        self
    }

    pub fn with_flags(mut self, flags: impl Into<String>) -> Self {
        self.flags = flags.into();
        self
    }

    /// Decode a record from an arbitrary JSON value.
    ///
    /// Non-object values yield a fully empty record.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Object(_) => Self::deserialize(value).unwrap_or_default(),
            _ => Self::default(),
        }
    }

    pub fn status(&self) -> &RecordStatus {
        &self.status
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stats(&self) -> &str {
        &self.stats
    }

    pub fn flags(&self) -> &str {
        &self.flags
    }

    /// Field values in display column order: status, name, stats, flags.
    pub fn columns(&self) -> [&str; 4] {
        [self.status.as_str(), &self.name, &self.stats, &self.flags]
    }
}

fn stringify(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(stringify)
}

fn lenient_status<'de, D>(deserializer: D) -> Result<RecordStatus, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_string(deserializer).map(RecordStatus::from)
}
