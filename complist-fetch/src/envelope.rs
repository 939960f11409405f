//! Response envelope handling.
//!
//! List endpoints answer either with a bare JSON array or with an object that
//! wraps the list under `data`, `items`, or `result`.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::FetchError;

/// Keys that may hold the record list, in lookup order.
const LIST_KEYS: &[&str] = &["data", "items", "result"];

/// Extracts the record objects from a list response.
///
/// An object without any list key yields an empty list. Entries that are not
/// objects are skipped.
///
/// # Errors
///
/// Returns [`FetchError::InvalidResponse`] if the body is neither an array
/// nor an object.
pub fn extract_items(body: &Value) -> Result<Vec<Map<String, Value>>, FetchError> {
    let list = match body {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => LIST_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array))
            .map_or(&[][..], Vec::as_slice),
        other => {
            return Err(FetchError::InvalidResponse(format!(
                "expected a JSON array or object, got {}",
                json_kind(other)
            )));
        }
    };

    let items: Vec<Map<String, Value>> = list
        .iter()
        .filter_map(|item| item.as_object().cloned())
        .collect();

    if items.len() != list.len() {
        debug!(skipped = list.len() - items.len(), "Skipped non-object list entries");
    }

    Ok(items)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
