//! FromValue trait for converting database values to Rust types

use crate::error::{Error, Result};
use crate::value::Value;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";
pub(crate) const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
pub(crate) const TIME_FORMAT: &str = "%H:%M:%S%.f";

/// Trait for types that can be constructed from a database value.
///
/// Implemented for common Rust types; implement it manually for custom
/// types (e.g., enums stored as text).
pub trait FromValue: Sized {
    /// Convert a database value to this type.
    fn from_value(value: Value) -> Result<Self>;
}

fn mismatch<T>(expected: &'static str, value: &Value) -> Result<T> {
    Err(Error::TypeConversion {
        expected,
        actual: value.type_name().to_string(),
    })
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bool(v) => Ok(v),
            Value::I64(v) => Ok(v != 0),
            _ => mismatch("bool", &value),
        }
    }
}

macro_rules! integer_from_value {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self> {
                    match value {
                        Value::I64(v) => v.try_into().map_err(|_| Error::TypeConversion {
                            expected: stringify!($ty),
                            actual: format!("i64({}) out of range", v),
                        }),
                        Value::Bool(v) => Ok(<$ty>::from(v)),
                        _ => mismatch(stringify!($ty), &value),
                    }
                }
            }
        )*
    };
}

integer_from_value!(i8, i16, i32, i64, u8, u16, u32, u64);

impl FromValue for f32 {
    fn from_value(value: Value) -> Result<Self> {
        f64::from_value(value).map(|v| v as f32)
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::F64(v) => Ok(v),
            // SQLite returns whole REAL values stored in INTEGER affinity columns as integers
            Value::I64(v) => Ok(v as f64),
            _ => mismatch("f64", &value),
        }
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::String(v) => Ok(v),
            Value::Bytes(v) => String::from_utf8(v).map_err(|e| Error::TypeConversion {
                expected: "utf8 string",
                actual: format!("invalid utf8: {}", e),
            }),
            _ => mismatch("string", &value),
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bytes(v) => Ok(v),
            Value::String(v) => Ok(v.into_bytes()),
            _ => mismatch("bytes", &value),
        }
    }
}

impl FromValue for NaiveDate {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Date(v) => Ok(v),
            Value::DateTime(v) => Ok(v.date()),
            Value::String(v) => match NaiveDate::parse_from_str(&v, DATE_FORMAT) {
                Ok(date) => Ok(date),
                Err(_) => NaiveDateTime::from_value(Value::String(v)).map(|dt| dt.date()),
            },
            _ => mismatch("date", &value),
        }
    }
}

impl FromValue for NaiveDateTime {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::DateTime(v) => Ok(v),
            Value::Date(v) => midnight(v),
            Value::String(v) => {
                if let Ok(dt) = NaiveDateTime::parse_from_str(&v, DATETIME_FORMAT) {
                    return Ok(dt);
                }
                if let Ok(dt) = NaiveDateTime::parse_from_str(&v, "%Y-%m-%dT%H:%M:%S%.f") {
                    return Ok(dt);
                }
                match NaiveDate::parse_from_str(&v, DATE_FORMAT) {
                    Ok(date) => midnight(date),
                    Err(_) => Err(Error::TypeConversion {
                        expected: "datetime",
                        actual: format!("invalid datetime string: {}", v),
                    }),
                }
            }
            _ => mismatch("datetime", &value),
        }
    }
}

fn midnight(date: NaiveDate) -> Result<NaiveDateTime> {
    date.and_hms_opt(0, 0, 0).ok_or_else(|| Error::TypeConversion {
        expected: "datetime",
        actual: date.to_string(),
    })
}

impl FromValue for NaiveTime {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Time(v) => Ok(v),
            Value::DateTime(v) => Ok(v.time()),
            Value::String(v) => {
                NaiveTime::parse_from_str(&v, TIME_FORMAT).map_err(|_| Error::TypeConversion {
                    expected: "time",
                    actual: format!("invalid time string: {}", v),
                })
            }
            _ => mismatch("time", &value),
        }
    }
}

impl FromValue for serde_json::Value {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Json(v) => Ok(v),
            Value::String(v) => serde_json::from_str(&v).map_err(|e| Error::TypeConversion {
                expected: "json",
                actual: format!("invalid json: {}", e),
            }),
            _ => mismatch("json", &value),
        }
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            _ => Ok(Some(T::from_value(value)?)),
        }
    }
}
