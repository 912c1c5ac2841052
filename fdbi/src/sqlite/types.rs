//! Type conversion utilities for SQLite

use rusqlite::types::{Value as SqliteValue, ValueRef};

use crate::error::{Error, Result};
use crate::traits::{DATETIME_FORMAT, DATE_FORMAT, TIME_FORMAT};
use crate::value::Value;

/// Convert fdbi Value to a SQLite value
pub fn to_sqlite_value(value: Value) -> SqliteValue {
    match value {
        Value::Null => SqliteValue::Null,
        Value::Bool(v) => SqliteValue::Integer(i64::from(v)),
        Value::I64(v) => SqliteValue::Integer(v),
        Value::F64(v) => SqliteValue::Real(v),
        Value::String(v) => SqliteValue::Text(v),
        Value::Bytes(v) => SqliteValue::Blob(v),
        // Dates are stored as ISO-8601 text, which sorts and compares correctly
        Value::Date(v) => SqliteValue::Text(v.format(DATE_FORMAT).to_string()),
        Value::DateTime(v) => SqliteValue::Text(v.format(DATETIME_FORMAT).to_string()),
        Value::Time(v) => SqliteValue::Text(v.format(TIME_FORMAT).to_string()),
        Value::Json(v) => SqliteValue::Text(v.to_string()),
    }
}

/// Convert a SQLite column value to fdbi Value
pub fn from_sqlite_value(value: ValueRef<'_>) -> Result<Value> {
    match value {
        ValueRef::Null => Ok(Value::Null),
        ValueRef::Integer(v) => Ok(Value::I64(v)),
        ValueRef::Real(v) => Ok(Value::F64(v)),
        ValueRef::Text(v) => std::str::from_utf8(v)
            .map(|s| Value::String(s.to_string()))
            .map_err(|e| Error::TypeConversion {
                expected: "utf-8 text",
                actual: e.to_string(),
            }),
        ValueRef::Blob(v) => Ok(Value::Bytes(v.to_vec())),
    }
}
