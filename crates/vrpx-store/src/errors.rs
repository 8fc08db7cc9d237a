//! Error handling for vrpx-store
//!
//! Wraps vrpx-core ExError with store-specific helpers

use std::path::Path;
use vrpx_core::errors::{ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create an IO error for a state file
pub fn io_error(operation: &str, path: &Path, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation)
        .with_path(path.display().to_string())
        .with_message(err.to_string())
}

/// Create a corrupt-state error for a state file that exists but cannot be trusted
pub fn corrupt_state(operation: &str, path: &Path, reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::CorruptState)
        .with_op(operation)
        .with_path(path.display().to_string())
        .with_message(reason)
}

/// Create a serialization error
pub fn serialization_error(operation: &str, err: impl std::fmt::Display) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op(operation)
        .with_message(err.to_string())
}
