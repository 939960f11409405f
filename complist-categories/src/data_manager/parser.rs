//! Table-group lookup response parser.

use complist_fetch::{extract_items, FetchError};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::parser::text_of;

/// A table group as listed by the lookup endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableGroup {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default, rename = "_id")]
    object_id: Option<Value>,
    #[serde(default)]
    name: Option<Value>,
}

impl TableGroup {
    /// Returns the identifier sent as `tablegroup_id`, if any.
    ///
    /// `null` and empty strings do not count.
    pub fn id(&self) -> Option<&Value> {
        [self.id.as_ref(), self.object_id.as_ref()]
            .into_iter()
            .flatten()
            .find(|v| match v {
                Value::Null => false,
                Value::String(s) => !s.is_empty(),
                _ => true,
            })
    }

    /// Returns the table group name, or an empty string.
    pub fn name(&self) -> String {
        self.name.as_ref().map(text_of).unwrap_or_default()
    }
}

/// Parses a table-group lookup response.
///
/// # Errors
///
/// Returns [`FetchError::InvalidResponse`] if the body is not a list
/// response.
pub fn parse_table_groups(body: &Value) -> Result<Vec<TableGroup>, FetchError> {
    let items = extract_items(body)?;
    debug!(count = items.len(), "Parsing table groups");

    items
        .into_iter()
        .map(|item| {
            serde_json::from_value(Value::Object(item))
                .map_err(|e| FetchError::InvalidResponse(format!("Invalid table group: {e}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_table_groups() {
        let body = json!({"data": [
            {"id": 11, "name": "Customers"},
            {"_id": "tg-2", "name": "Orders", "tables": 4},
            {"name": "Orphan"}
        ]});

        let groups = parse_table_groups(&body).unwrap();
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].id(), Some(&json!(11)));
        assert_eq!(groups[0].name(), "Customers");
        assert_eq!(groups[1].id(), Some(&json!("tg-2")));
        assert_eq!(groups[2].id(), None);
    }

    #[test]
    fn test_empty_id_is_missing() {
        let groups = parse_table_groups(&json!([{"id": "", "name": "x"}, {"id": null}])).unwrap();
        assert!(groups.iter().all(|g| g.id().is_none()));
    }

    #[test]
    fn test_empty_lookup() {
        assert!(parse_table_groups(&json!({"data": []})).unwrap().is_empty());
        assert!(parse_table_groups(&json!({})).unwrap().is_empty());
    }
}
