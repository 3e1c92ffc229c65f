use serde::{Deserialize, Serialize};
use std::fmt;

/// A value carried by a KNX group object or a HomeKit characteristic.
///
/// Both sides of the bridge speak in loosely typed values (a KNX DPT5 mode
/// code and a HomeKit enum are both plain integers), so a single untagged
/// representation is shared and the translators decide how to read it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    /// Boolean value (DPT1 switches, HomeKit `On`).
    Boolean(bool),

    /// Integer value (enum codes, raw 8-bit values, percentages).
    Integer(i64),

    /// Floating point value (temperatures).
    Float(f64),

    /// Text value.
    Text(String),
}

impl FieldValue {
    /// Interpret the value as a switch state.
    ///
    /// Numbers are true when non-zero. Text has no boolean reading.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(b) => Some(*b),
            FieldValue::Integer(i) => Some(*i != 0),
            FieldValue::Float(f) => Some(*f != 0.0),
            FieldValue::Text(_) => None,
        }
    }

    /// Interpret the value as an integer.
    ///
    /// Floats qualify only when they carry no fractional part.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Boolean(b) => Some(i64::from(*b)),
            FieldValue::Integer(i) => Some(*i),
            FieldValue::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(*f as i64),
            FieldValue::Float(_) | FieldValue::Text(_) => None,
        }
    }

    /// Interpret the value as a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Float(f) if f.is_finite() => Some(*f),
            FieldValue::Float(_) | FieldValue::Text(_) => None,
        }
    }

    /// Short name of the variant, used in validation messages.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Boolean(_) => "boolean",
            FieldValue::Integer(_) => "integer",
            FieldValue::Float(_) => "float",
            FieldValue::Text(_) => "text",
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Boolean(b) => write!(f, "{}", b),
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Boolean(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Integer(v)
    }
}

impl From<u8> for FieldValue {
    fn from(v: u8) -> Self {
        FieldValue::Integer(i64::from(v))
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}
