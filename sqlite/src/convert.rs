//! Conversion from SQLite values and rows to the JSON-shaped result model.

use litestudio_core::Row;
use rusqlite::types::ValueRef;
use serde_json::{Number, Value};

/// Converts one SQLite cell into a JSON value.
///
/// INTEGER and REAL become numbers (a non-finite REAL becomes `null`), TEXT
/// becomes a string (lossily decoded if it is not valid UTF-8), and BLOB
/// becomes an array of byte values.
pub(crate) fn value_to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Number(i.into()),
        ValueRef::Real(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => {
            Value::Array(bytes.iter().map(|b| Value::Number((*b).into())).collect())
        }
    }
}

/// Zips column names against one row's positional values.
///
/// A repeated column name keeps its first position and the value of its
/// last occurrence.
pub(crate) fn row_to_object(columns: &[String], row: &rusqlite::Row<'_>) -> rusqlite::Result<Row> {
    let mut object = Row::new();
    for (index, name) in columns.iter().enumerate() {
        object.insert(name.clone(), value_to_json(row.get_ref(index)?));
    }
    Ok(object)
}
