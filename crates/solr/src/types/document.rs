//! Document records.

use serde_json::{Map, Value};

/// A document: field name to value.
pub type Document = Map<String, Value>;

/// Returns the identifier stored under `unique_key`, treating `null` as absent.
pub fn identifier<'a>(doc: &'a Document, unique_key: &str) -> Option<&'a Value> {
    doc.get(unique_key).filter(|v| !v.is_null())
}

/// Returns true if the document carries an identifier under `unique_key`.
pub fn has_identifier(doc: &Document, unique_key: &str) -> bool {
    identifier(doc, unique_key).is_some()
}

/// Renders an identifier value as the plain string used in queries.
pub fn identifier_text(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Builds a document from a JSON object value. Non-objects yield `None`.
pub fn from_value(value: Value) -> Option<Document> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}
