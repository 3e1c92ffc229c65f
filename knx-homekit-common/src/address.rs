//! KNX group addresses in three-level notation (`main/middle/sub`).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A KNX group address packed as 5 bits main, 3 bits middle, 8 bits sub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupAddress(u16);

impl GroupAddress {
    /// Build an address from its three levels.
    pub fn new(main: u8, middle: u8, sub: u8) -> Result<Self, Error> {
        if main > 31 {
            return Err(Error::address(
                format!("{}/{}/{}", main, middle, sub),
                format!("main group must be 0-31, got {}", main),
            ));
        }
        if middle > 7 {
            return Err(Error::address(
                format!("{}/{}/{}", main, middle, sub),
                format!("middle group must be 0-7, got {}", middle),
            ));
        }

        Ok(Self(
            (u16::from(main) << 11) | (u16::from(middle) << 8) | u16::from(sub),
        ))
    }

    /// Raw 16-bit representation.
    pub fn raw(&self) -> u16 {
        self.0
    }

    pub fn main(&self) -> u8 {
        ((self.0 >> 11) & 0x1F) as u8
    }

    pub fn middle(&self) -> u8 {
        ((self.0 >> 8) & 0x07) as u8
    }

    pub fn sub(&self) -> u8 {
        (self.0 & 0xFF) as u8
    }
}

impl From<u16> for GroupAddress {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

impl fmt::Display for GroupAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.main(), self.middle(), self.sub())
    }
}

impl FromStr for GroupAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('/').collect();

        if parts.len() != 3 {
            return Err(Error::address(s, "expected main/middle/sub"));
        }

        let level = |name: &str, part: &str| -> Result<u8, Error> {
            part.parse::<u8>()
                .map_err(|_| Error::address(s, format!("invalid {} group '{}'", name, part)))
        };

        let main = level("main", parts[0])?;
        let middle = level("middle", parts[1])?;
        let sub = level("sub", parts[2])?;

        Self::new(main, middle, sub).map_err(|e| match e {
            Error::Address { reason, .. } => Error::address(s, reason),
            other => other,
        })
    }
}

impl Serialize for GroupAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GroupAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
