//! VRP domain model.
//!
//! Every type here validates on construction and on deserialization, so a
//! value that exists is well-formed. Field-level failures are reported as
//! [`FieldError`]; the canonicalizer attaches record indices to them.

pub mod asn;
pub mod metadata;
pub mod prefix;
pub mod timestamp;
pub mod vrp;

use thiserror::Error;

pub use asn::Asn;
pub use metadata::UpstreamMetadata;
pub use prefix::Prefix;
pub use vrp::{DedupKey, MatchKey, MaxLength, VrpRecord};

/// A single field of a VRP failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("ASN {value:?} must be 'AS' followed by an unsigned 32-bit integer")]
    InvalidAsn { value: String },

    #[error("prefix {value:?} is not a valid CIDR network: {reason}")]
    InvalidPrefix { value: String, reason: String },

    #[error("prefix {value:?} has host bits set")]
    HostBitsSet { value: String },

    #[error("maxLength {value} must be within 0..=128")]
    MaxLengthOutOfRange { value: i64 },
}

impl FieldError {
    /// Upstream field name this error refers to
    pub fn field(&self) -> &'static str {
        match self {
            FieldError::InvalidAsn { .. } => "asn",
            FieldError::InvalidPrefix { .. } | FieldError::HostBitsSet { .. } => "prefix",
            FieldError::MaxLengthOutOfRange { .. } => "maxLength",
        }
    }
}
