//! KNX datapoint type tags.
//!
//! Only the tag travels with a bus write; turning values into telegram bytes
//! is left to the bus driver.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::value::FieldValue;

/// Smallest value representable as a KNX 2-byte float.
const DPT9_MIN: f64 = -671_088.64;
/// Largest value representable as a KNX 2-byte float.
const DPT9_MAX: f64 = 670_760.96;

/// Datapoint encoding declared for a group object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dpt {
    /// 1-bit boolean (DPT 1.xxx).
    Dpt1,
    /// 8-bit unsigned value or enum code (DPT 5.xxx).
    Dpt5,
    /// 8-bit scaled percentage, 0..=255 on the wire (DPT 5.001).
    Dpt5_001,
    /// 2-byte float (DPT 9.xxx).
    Dpt9,
}

impl Dpt {
    /// Canonical configuration spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Dpt::Dpt1 => "DPT1",
            Dpt::Dpt5 => "DPT5",
            Dpt::Dpt5_001 => "DPT5.001",
            Dpt::Dpt9 => "DPT9",
        }
    }

    /// Whether `value` fits the value domain of this encoding.
    pub fn accepts(&self, value: &FieldValue) -> bool {
        match self {
            Dpt::Dpt1 => match value {
                FieldValue::Boolean(_) => true,
                other => matches!(other.as_i64(), Some(0 | 1)),
            },
            Dpt::Dpt5 | Dpt::Dpt5_001 => match value {
                FieldValue::Boolean(_) | FieldValue::Text(_) => false,
                other => matches!(other.as_i64(), Some(0..=255)),
            },
            Dpt::Dpt9 => match value {
                FieldValue::Text(_) => false,
                other => other
                    .as_f64()
                    .is_some_and(|v| (DPT9_MIN..=DPT9_MAX).contains(&v)),
            },
        }
    }
}

impl fmt::Display for Dpt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Dpt {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        let body = normalized
            .strip_prefix("DPT")
            .map(|rest| rest.trim_start_matches(['-', ' ', '_']))
            .unwrap_or(normalized.as_str());

        let (main, sub) = match body.split_once(['.', '-']) {
            Some((main, sub)) => (main, Some(sub)),
            None => (body, None),
        };

        match (main, sub) {
            ("1", _) => Ok(Dpt::Dpt1),
            ("5", None) => Ok(Dpt::Dpt5),
            ("5", Some("001" | "1")) => Ok(Dpt::Dpt5_001),
            ("5", Some(_)) => Ok(Dpt::Dpt5),
            ("9", _) => Ok(Dpt::Dpt9),
            _ => Err(Error::Dpt(s.to_string())),
        }
    }
}

impl Serialize for Dpt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Dpt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
