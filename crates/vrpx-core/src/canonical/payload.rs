//! Upstream document decoding.
//!
//! The validator publishes `{metadata: {generated}, roas: [...]}`. Decoding
//! only checks JSON shape and types; field semantics are checked by
//! [`super::validation`].

use crate::errors::{Result, VrpxError};
use serde::{Deserialize, Serialize};

/// Raw ROA entry exactly as the validator emits it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRoa {
    pub asn: String,
    pub prefix: String,
    #[serde(rename = "maxLength")]
    pub max_length: i64,
    pub ta: String,
}

impl RawRoa {
    pub fn new(asn: &str, prefix: &str, max_length: i64, ta: &str) -> Self {
        Self {
            asn: asn.to_string(),
            prefix: prefix.to_string(),
            max_length,
            ta: ta.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMetadata {
    pub generated: i64,
}

/// A decoded upstream document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamBatch {
    pub metadata: RawMetadata,
    pub roas: Vec<RawRoa>,
}

/// Decode an upstream document.
///
/// # Errors
///
/// - `VrpxError::MalformedPayload` if the bytes are not JSON of the expected
///   shape (missing keys, wrong types, negative or fractional maxLength)
/// - `VrpxError::InvalidGenerated` if `metadata.generated` is not positive
pub fn parse_payload(bytes: &[u8]) -> Result<UpstreamBatch> {
    let batch: UpstreamBatch =
        serde_json::from_slice(bytes).map_err(|e| VrpxError::MalformedPayload {
            reason: e.to_string(),
        })?;

    if batch.metadata.generated <= 0 {
        return Err(VrpxError::InvalidGenerated {
            value: batch.metadata.generated,
        });
    }

    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_document() {
        let doc = br#"{
            "metadata": {"generated": 1700000000},
            "roas": [
                {"asn": "AS13335", "prefix": "1.1.1.0/24", "maxLength": 24, "ta": "apnic"}
            ]
        }"#;
        let batch = parse_payload(doc).unwrap();
        assert_eq!(batch.metadata.generated, 1_700_000_000);
        assert_eq!(batch.roas.len(), 1);
        assert_eq!(batch.roas[0].asn, "AS13335");
        assert_eq!(batch.roas[0].max_length, 24);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let doc = br#"{
            "metadata": {"generated": 1, "buildtime": "x"},
            "roas": [{"asn": "AS1", "prefix": "10.0.0.0/8", "maxLength": 8, "ta": "t", "source": []}]
        }"#;
        assert!(parse_payload(doc).is_ok());
    }

    #[test]
    fn test_wrong_types_rejected() {
        let doc = br#"{"metadata": {"generated": 1},
            "roas": [{"asn": 1, "prefix": "10.0.0.0/8", "maxLength": 8, "ta": "t"}]}"#;
        assert!(matches!(
            parse_payload(doc),
            Err(VrpxError::MalformedPayload { .. })
        ));

        let doc = br#"{"metadata": {"generated": 1},
            "roas": [{"asn": "AS1", "prefix": "10.0.0.0/8", "maxLength": "8", "ta": "t"}]}"#;
        assert!(parse_payload(doc).is_err());
    }

    #[test]
    fn test_missing_roas_rejected() {
        assert!(parse_payload(br#"{"metadata": {"generated": 1}}"#).is_err());
        assert!(parse_payload(b"not json").is_err());
    }

    #[test]
    fn test_non_positive_generated_rejected() {
        let doc = br#"{"metadata": {"generated": 0}, "roas": []}"#;
        assert_eq!(
            parse_payload(doc).unwrap_err(),
            VrpxError::InvalidGenerated { value: 0 }
        );
    }
}
