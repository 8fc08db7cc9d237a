//! Content hash computation for canonical snapshots.
//!
//! The hash is SHA-256 over a sorted-key JSON encoding of the record
//! sequence with `", "` and `": "` separators and every non-ASCII or DEL
//! character written as a `\uXXXX` escape (UTF-16 surrogate pairs above the
//! BMP). Legacy state directories carry hashes in this encoding, so they load
//! unchanged. Record fields serialize in key
//! order, so the bytes depend only on the sequence.
//!
//! ## Determinism Guarantees
//!
//! - Same sequence → same hash
//! - Different order → different hash (canonicalization fixes the order
//!   before this is called)

use crate::errors::Result;
use crate::model::VrpRecord;
use serde::Serialize;
use serde_json::ser::Formatter;
use sha2::{Digest, Sha256};
use std::io::{self, Write};

/// Compute the content hash of a canonical VRP sequence.
///
/// ## Returns
///
/// Hex-encoded SHA-256 digest (64 characters)
///
/// ## Errors
///
/// Returns `VrpxError::Serialization` if JSON serialization fails.
///
/// ## Example
///
/// ```
/// use vrpx_core::snapshot::compute_content_hash;
///
/// let hash = compute_content_hash(&[]).unwrap();
/// assert_eq!(hash.len(), 64);
/// ```
pub fn compute_content_hash(records: &[VrpRecord]) -> Result<String> {
    Ok(hash_bytes(&encode_for_hash(records)?))
}

/// The exact bytes [`compute_content_hash`] digests.
///
/// # Errors
///
/// Returns `VrpxError::Serialization` if JSON serialization fails.
pub fn encode_for_hash(records: &[VrpRecord]) -> Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(records.len() * 80 + 2);
    let mut serializer = serde_json::Serializer::with_formatter(&mut bytes, HashFormatter);
    records.serialize(&mut serializer)?;
    Ok(bytes)
}

/// Single-line JSON with spaced separators and ASCII-only output.
struct HashFormatter;

impl Formatter for HashFormatter {
    fn begin_array_value<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut plain = 0;
        for (at, c) in fragment.char_indices() {
            if (' '..='~').contains(&c) {
                continue;
            }
            writer.write_all(&fragment.as_bytes()[plain..at])?;
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            plain = at + c.len_utf8();
        }
        writer.write_all(&fragment.as_bytes()[plain..])
    }
}

/// Hash bytes using SHA-256.
fn hash_bytes(input: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input);
    hex::encode(hasher.finalize())
}
