//! Autonomous system numbers.

use super::FieldError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A 32-bit AS number, rendered as `AS<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Asn(u32);

impl Asn {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn into_u32(self) -> u32 {
        self.0
    }

    /// Parse either the `AS<n>` form or a bare number.
    ///
    /// Used by lookups, where callers commonly omit the prefix. Upstream
    /// records always go through the strict [`FromStr`] impl.
    pub fn parse_lenient(s: &str) -> Result<Self, FieldError> {
        if s.starts_with("AS") {
            s.parse()
        } else {
            format!("AS{}", s).parse()
        }
    }
}

impl FromStr for Asn {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FieldError::InvalidAsn {
            value: s.to_string(),
        };
        let digits = s.strip_prefix("AS").ok_or_else(invalid)?;
        // u32::from_str accepts a leading '+'
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        digits.parse::<u32>().map(Asn).map_err(|_| invalid())
    }
}

impl fmt::Display for Asn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AS{}", self.0)
    }
}

impl Serialize for Asn {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Asn {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
