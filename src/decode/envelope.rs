//! Record extraction from response envelopes

use crate::types::{JsonValue, Record};

/// Envelope key holding the records
pub const DATA_KEY: &str = "data";

/// Record key holding the primary key
pub const ID_KEY: &str = "id";

/// Extract the records of one page.
///
/// A missing or `null` `data` yields no records. A single object under
/// `data` is returned as one record.
pub fn parse_records(body: &JsonValue) -> Vec<Record> {
    match body.get(DATA_KEY) {
        Some(JsonValue::Array(records)) => records.clone(),
        None | Some(JsonValue::Null) => Vec::new(),
        Some(record) => vec![record.clone()],
    }
}

/// The `id` of a record as a string.
///
/// JSON:API ids are strings, but numeric ids are accepted as well.
/// Anything else (missing, null, empty, nested) has no usable id.
pub fn record_id(record: &Record) -> Option<String> {
    match record.get(ID_KEY)? {
        JsonValue::String(id) if !id.is_empty() => Some(id.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
