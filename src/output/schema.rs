//! Arrow schema inference and JSON to Arrow conversion

use crate::error::{Error, Result};
use crate::types::Record;
use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Infer an Arrow schema from the top-level keys of a set of records.
///
/// Columns appear in first-seen order and are all nullable. Nested values
/// and keys whose types disagree across records become `Utf8`.
pub fn infer_schema(records: &[Record]) -> Schema {
    let mut order: Vec<String> = Vec::new();
    let mut types: HashMap<String, DataType> = HashMap::new();

    for record in records {
        let Value::Object(obj) = record else { continue };
        for (key, value) in obj {
            let inferred = infer_type(value);
            match types.get_mut(key) {
                Some(existing) => *existing = merge_types(existing, &inferred),
                None => {
                    order.push(key.clone());
                    types.insert(key.clone(), inferred);
                }
            }
        }
    }

    let fields: Vec<Field> = order
        .into_iter()
        .map(|name| {
            let data_type = match types.remove(&name) {
                Some(DataType::Null) | None => DataType::Utf8,
                Some(data_type) => data_type,
            };
            Field::new(name, data_type, true)
        })
        .collect();

    Schema::new(fields)
}

/// Convert records to an Arrow RecordBatch
///
/// Uses the provided schema or infers one from the records.
pub fn records_to_batch(records: &[Record], schema: Option<&Schema>) -> Result<RecordBatch> {
    let schema = Arc::new(match schema {
        Some(schema) => schema.clone(),
        None => infer_schema(records),
    });

    if records.is_empty() {
        return Ok(RecordBatch::new_empty(schema));
    }

    let columns = schema
        .fields()
        .iter()
        .map(|field| {
            let values: Vec<Option<&Value>> = records
                .iter()
                .map(|record| record.get(field.name()).filter(|v| !v.is_null()))
                .collect();
            build_array(&values, field.data_type())
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(RecordBatch::try_new(schema, columns)?)
}

pub(super) fn infer_type(value: &Value) -> DataType {
    match value {
        Value::Null => DataType::Null,
        Value::Bool(_) => DataType::Boolean,
        Value::Number(n) if n.is_i64() => DataType::Int64,
        Value::Number(_) => DataType::Float64,
        Value::String(_) | Value::Array(_) | Value::Object(_) => DataType::Utf8,
    }
}

fn merge_types(existing: &DataType, incoming: &DataType) -> DataType {
    match (existing, incoming) {
        (a, b) if a == b => a.clone(),
        (DataType::Null, other) | (other, DataType::Null) => other.clone(),
        (DataType::Int64, DataType::Float64) | (DataType::Float64, DataType::Int64) => {
            DataType::Float64
        }
        _ => DataType::Utf8,
    }
}

fn build_array(values: &[Option<&Value>], data_type: &DataType) -> Result<ArrayRef> {
    let array: ArrayRef = match data_type {
        DataType::Boolean => Arc::new(
            values
                .iter()
                .map(|v| v.and_then(Value::as_bool))
                .collect::<BooleanArray>(),
        ),
        DataType::Int64 => Arc::new(
            values
                .iter()
                .map(|v| v.and_then(Value::as_i64))
                .collect::<Int64Array>(),
        ),
        DataType::Float64 => Arc::new(
            values
                .iter()
                .map(|v| v.and_then(Value::as_f64))
                .collect::<Float64Array>(),
        ),
        DataType::Utf8 => Arc::new(
            values
                .iter()
                .map(|v| {
                    v.map(|v| match v {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                })
                .collect::<StringArray>(),
        ),
        other => {
            return Err(Error::output(format!(
                "Unsupported column type {other:?}"
            )))
        }
    };
    Ok(array)
}
