//! Component records.
//!
//! [`ComponentRecord`] is the unit of output: four fields, in a fixed order,
//! regardless of which category produced it.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::timestamp::Timestamp;

// ============================================================================
// Record Identifier
// ============================================================================

/// An upstream record identifier.
///
/// Identifiers are opaque: they are exported exactly as received and never
/// renumbered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    /// Integer identifier.
    Number(i64),
    /// Any other identifier, as text.
    Text(String),
}

impl RecordId {
    /// Builds an identifier from an upstream JSON value.
    ///
    /// Mongo-style `{"$oid": "..."}` objects are unwrapped; `null` becomes an
    /// empty identifier.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Number(n) => n
                .as_i64()
                .map_or_else(|| Self::Text(n.to_string()), Self::Number),
            Value::String(s) => Self::Text(s.clone()),
            Value::Null => Self::Text(String::new()),
            Value::Object(map) => match map.get("$oid") {
                Some(Value::String(oid)) => Self::Text(oid.clone()),
                _ => Self::Text(value.to_string()),
            },
            other => Self::Text(other.to_string()),
        }
    }

    /// Returns true if the upstream record carried no identifier.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

// ============================================================================
// Component Record
// ============================================================================

/// A normalized catalog record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentRecord {
    /// Upstream identifier.
    pub id: RecordId,
    /// Display name, possibly empty.
    #[serde(default)]
    pub name: String,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    /// Last update time, the date filter key.
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

impl ComponentRecord {
    /// Column names, in export order.
    pub const COLUMNS: [&'static str; 4] = ["id", "name", "created_at", "updated_at"];

    /// Creates a record without timestamps.
    pub fn new(id: impl Into<RecordId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Sets the creation time.
    #[must_use]
    pub fn with_created_at(mut self, ts: impl Into<Timestamp>) -> Self {
        self.created_at = Some(ts.into());
        self
    }

    /// Sets the last update time.
    #[must_use]
    pub fn with_updated_at(mut self, ts: impl Into<Timestamp>) -> Self {
        self.updated_at = Some(ts.into());
        self
    }

    /// Returns the last update instant, if present and interpretable.
    pub fn updated_at_datetime(&self) -> Option<DateTime<Utc>> {
        self.updated_at.as_ref().and_then(Timestamp::as_datetime)
    }

    /// Renders the four export fields in [`Self::COLUMNS`] order.
    pub fn to_fields(&self) -> [String; 4] {
        [
            self.id.to_string(),
            self.name.clone(),
            self.created_at.as_ref().map(Timestamp::render).unwrap_or_default(),
            self.updated_at.as_ref().map(Timestamp::render).unwrap_or_default(),
        ]
    }
}

// ============================================================================
// Tests
// ============================================================================
