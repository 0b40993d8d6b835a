//! Records — loading exported client and user documents.
//!
//! Two layouts are accepted: a JSON array of documents, or a JSON object
//! mapping document id → document (the shape of a collection dump). In the
//! second layout the id is copied into the document's `uid` field unless the
//! document already carries one.

use std::path::Path;

use serde_json::Value;

use crate::error::RecordsError;

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parse a record collection from JSON text.
pub fn parse_records(text: &str) -> Result<Vec<Value>, RecordsError> {
    match serde_json::from_str::<Value>(text)? {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(_) => Ok(item),
                _ => Err(RecordsError::NotAnObject(index.to_string())),
            })
            .collect(),
        Value::Object(documents) => documents
            .into_iter()
            .map(|(id, document)| match document {
                Value::Object(mut fields) => {
                    fields.entry("uid").or_insert_with(|| Value::String(id));
                    Ok(Value::Object(fields))
                }
                _ => Err(RecordsError::NotAnObject(id)),
            })
            .collect(),
        other => Err(RecordsError::NotACollection(kind_name(&other))),
    }
}

/// Read and parse a record collection from a file.
pub fn load_records(path: &Path) -> Result<Vec<Value>, RecordsError> {
    let text = std::fs::read_to_string(path).map_err(|source| RecordsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records = parse_records(&text)?;
    tracing::debug!(path = %path.display(), count = records.len(), "records: loaded");
    Ok(records)
}
