//! Raw record parsing and normalization.
//!
//! The platform is not consistent about field names: ids show up as `id` or
//! Mongo-style `_id`, names as `name` or `title`, timestamps in snake or camel
//! case. [`RawRecord`] accepts all of them and [`RawRecord::normalize`] picks
//! the first usable value for each of the four exported fields.

use complist_core::{ComponentRecord, RecordId, Timestamp};
use complist_fetch::{extract_items, FetchError};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// A record as the platform sends it. Unknown fields are dropped.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default, rename = "_id")]
    object_id: Option<Value>,
    #[serde(default)]
    name: Option<Value>,
    #[serde(default)]
    title: Option<Value>,
    #[serde(default)]
    created_at: Option<Value>,
    #[serde(default, rename = "createdAt")]
    created_at_camel: Option<Value>,
    #[serde(default)]
    updated_at: Option<Value>,
    #[serde(default, rename = "updatedAt")]
    updated_at_camel: Option<Value>,
}

impl RawRecord {
    /// Converts into the exported record shape.
    ///
    /// A missing id becomes an empty id, a missing name an empty string, and
    /// missing timestamps stay `None`.
    pub fn normalize(self) -> ComponentRecord {
        let id = first_present(self.id, self.object_id)
            .map_or_else(|| RecordId::Text(String::new()), |v| RecordId::from_json(&v));
        let name = first_present(self.name, self.title)
            .map(|v| text_of(&v))
            .unwrap_or_default();

        ComponentRecord {
            id,
            name,
            created_at: timestamp_of(self.created_at, self.created_at_camel),
            updated_at: timestamp_of(self.updated_at, self.updated_at_camel),
        }
    }
}

/// Parses a list response into normalized records, preserving order.
///
/// # Errors
///
/// Returns [`FetchError::InvalidResponse`] if the body is not a list
/// response.
pub fn parse_records(body: &Value) -> Result<Vec<ComponentRecord>, FetchError> {
    let items = extract_items(body)?;
    debug!(count = items.len(), "Parsing records");

    items
        .into_iter()
        .map(|item| {
            serde_json::from_value::<RawRecord>(Value::Object(item))
                .map(RawRecord::normalize)
                .map_err(|e| FetchError::InvalidResponse(format!("Invalid record: {e}")))
        })
        .collect()
}

/// Renders a JSON scalar as plain text. `null` is empty.
pub(crate) fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn first_present(a: Option<Value>, b: Option<Value>) -> Option<Value> {
    a.filter(|v| !v.is_null()).or(b.filter(|v| !v.is_null()))
}

fn timestamp_of(snake: Option<Value>, camel: Option<Value>) -> Option<Timestamp> {
    snake
        .as_ref()
        .and_then(Timestamp::from_json)
        .or_else(|| camel.as_ref().and_then(Timestamp::from_json))
}
