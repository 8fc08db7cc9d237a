//! The VRP record and its projection keys.

use super::{Asn, FieldError, Prefix};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Upper bound for maxLength (IPv6 width).
pub const MAX_LENGTH_LIMIT: u8 = 128;

/// A maxLength value within `0..=128`.
///
/// Not checked against the prefix length of the record it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct MaxLength(u8);

impl MaxLength {
    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for MaxLength {
    type Error = FieldError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (0..=i64::from(MAX_LENGTH_LIMIT)).contains(&value) {
            Ok(MaxLength(value as u8))
        } else {
            Err(FieldError::MaxLengthOutOfRange { value })
        }
    }
}

impl From<MaxLength> for u8 {
    fn from(value: MaxLength) -> Self {
        value.0
    }
}

/// A single Validated ROA Payload.
///
/// Fields are declared in lexicographic key order so the serialized form
/// is the same as a sorted-key JSON encoding; the content hash relies on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VrpRecord {
    asn: Asn,
    #[serde(rename = "maxLength")]
    max_length: MaxLength,
    prefix: Prefix,
    #[serde(rename = "ta")]
    trust_anchor: String,
}

/// Deduplication key: every field of the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DedupKey<'a> {
    pub asn: Asn,
    pub prefix: &'a Prefix,
    pub max_length: MaxLength,
    pub trust_anchor: &'a str,
}

/// Diff matching key: the record without its trust anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchKey {
    pub asn: Asn,
    pub prefix: Prefix,
    pub max_length: MaxLength,
}

impl VrpRecord {
    pub fn new(
        asn: Asn,
        prefix: Prefix,
        max_length: MaxLength,
        trust_anchor: impl Into<String>,
    ) -> Self {
        Self {
            asn,
            max_length,
            prefix,
            trust_anchor: trust_anchor.into(),
        }
    }

    pub fn asn(&self) -> Asn {
        self.asn
    }

    pub fn prefix(&self) -> &Prefix {
        &self.prefix
    }

    pub fn max_length(&self) -> MaxLength {
        self.max_length
    }

    pub fn trust_anchor(&self) -> &str {
        &self.trust_anchor
    }

    pub fn dedup_key(&self) -> DedupKey<'_> {
        DedupKey {
            asn: self.asn,
            prefix: &self.prefix,
            max_length: self.max_length,
            trust_anchor: &self.trust_anchor,
        }
    }

    pub fn match_key(&self) -> MatchKey {
        MatchKey {
            asn: self.asn,
            prefix: self.prefix,
            max_length: self.max_length,
        }
    }

    /// Sort key of the canonical order: prefix text, ASN text, maxLength,
    /// then trust anchor to break ties between otherwise equal records.
    pub fn canonical_sort_key(&self) -> (String, String, u8, String) {
        (
            self.prefix.to_string(),
            self.asn.to_string(),
            self.max_length.value(),
            self.trust_anchor.clone(),
        )
    }

    /// Compare two records in canonical order.
    pub fn canonical_cmp(&self, other: &Self) -> Ordering {
        self.canonical_sort_key().cmp(&other.canonical_sort_key())
    }
}

impl TryFrom<(&str, &str, i64, &str)> for VrpRecord {
    type Error = FieldError;

    /// Build from upstream text fields `(asn, prefix, maxLength, ta)`.
    fn try_from((asn, prefix, max_length, ta): (&str, &str, i64, &str)) -> Result<Self, Self::Error> {
        Ok(Self::new(
            asn.parse()?,
            prefix.parse()?,
            MaxLength::try_from(max_length)?,
            ta,
        ))
    }
}
