//! Loosely-typed upstream field values
//!
//! The catalog API returns identifiers as strings or numbers and flags as
//! booleans or strings, depending on the endpoint. `Scalar` keeps whatever
//! arrived so it can be written to a typed spreadsheet cell, and `None` is
//! used for anything absent or null until the output boundary renders it.

use crate::SENTINEL;
use serde_json::{Map, Value};
use std::fmt;

/// A single upstream field value
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    /// Converts a JSON value, returning `None` for null
    ///
    /// Arrays and objects are kept as their compact JSON text.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .or_else(|| n.as_f64().map(Self::Float)),
            Value::String(s) => Some(Self::Text(s.clone())),
            other => Some(Self::Text(other.to_string())),
        }
    }

    /// Reads `key` from a JSON object
    pub fn field(object: &Map<String, Value>, key: &str) -> Option<Self> {
        object.get(key).and_then(Self::from_json)
    }

    /// Renders an optional value, substituting the sentinel when absent
    pub fn or_sentinel(value: Option<&Scalar>) -> Scalar {
        value
            .cloned()
            .unwrap_or_else(|| Scalar::Text(SENTINEL.to_string()))
    }

    /// Renders an optional value as text, substituting the sentinel when absent
    pub fn text_or_sentinel(value: Option<&Scalar>) -> String {
        value
            .map(ToString::to_string)
            .unwrap_or_else(|| SENTINEL.to_string())
    }

    /// Parses the value as a whole number, accepting `3`, `3.0` and `"3"`
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(*f as i64),
            Self::Text(s) => {
                let trimmed = s.trim();
                trimmed.parse::<i64>().ok().or_else(|| {
                    trimmed
                        .parse::<f64>()
                        .ok()
                        .filter(|f| f.fract() == 0.0 && f.is_finite())
                        .map(|f| f as i64)
                })
            }
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{}", s),
            Self::Int(i) => write!(f, "{}", i),
            // Whole floats (e.g. ids read back from a spreadsheet) print without decimals
            Self::Float(v) if v.fract() == 0.0 && v.abs() < 1e15 => write!(f, "{}", *v as i64),
            Self::Float(v) => write!(f, "{}", v),
            Self::Bool(true) => write!(f, "True"),
            Self::Bool(false) => write!(f, "False"),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}
