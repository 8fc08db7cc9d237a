use crate::canonical::ValidationError;
use thiserror::Error;
use vrpx_core_types::CycleId;

/// Result type alias using VrpxError
pub type Result<T> = std::result::Result<T, VrpxError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// This taxonomy provides a stable, structured classification of all errors
/// in the VRPX system. Each kind maps to a stable error code that can be
/// used for programmatic error handling, testing, and exit-status mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Upstream input
    /// A batch failed per-record validation (whole batch rejected)
    Validation,
    /// The upstream document is not the expected JSON shape
    InvalidInput,
    /// The upstream source could not deliver a document
    ExternalSource,

    // Lookup
    NotFound,

    // Persistence
    /// Persisted state exists but is inconsistent with itself
    CorruptState,
    Io,
    Serialization,
    Persistence,

    // Runtime
    /// A lock guarding engine state was poisoned by a panicking writer
    Concurrency,
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::Validation => "ERR_VALIDATION",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::ExternalSource => "ERR_EXTERNAL_SOURCE",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::CorruptState => "ERR_CORRUPT_STATE",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Concurrency => "ERR_CONCURRENCY",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Whether an error of this kind leaves persisted state untrustworthy.
    ///
    /// Fatal kinds must stop the process; the others only discard the
    /// current batch and keep the previous snapshot authoritative.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ExErrorKind::CorruptState
                | ExErrorKind::Io
                | ExErrorKind::Persistence
                | ExErrorKind::Concurrency
                | ExErrorKind::Internal
        )
    }
}

/// Canonical structured error type
///
/// This error type provides a structured representation of errors with
/// classification fields for programmatic handling and rich context for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<String>,
    serial: Option<u64>,
    cycle_id: Option<CycleId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            serial: None,
            cycle_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add file path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add serial context
    pub fn with_serial(mut self, serial: u64) -> Self {
        self.serial = Some(serial);
        self
    }

    /// Add cycle correlation context
    pub fn with_cycle_id(mut self, cycle_id: CycleId) -> Self {
        self.cycle_id = Some(cycle_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Whether this error must stop the process
    pub fn is_fatal(&self) -> bool {
        self.kind.is_fatal()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the path context, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the serial context, if any
    pub fn serial(&self) -> Option<u64> {
        self.serial
    }

    /// Get the cycle ID context, if any
    pub fn cycle_id(&self) -> Option<&CycleId> {
        self.cycle_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        if let Some(serial) = self.serial {
            write!(f, " (serial: {})", serial)?;
        }
        if let Some(source) = &self.source {
            write!(f, "; caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain error taxonomy for the pure VRPX kernel
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VrpxError {
    /// One or more records in a batch failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The upstream document does not have the expected shape
    #[error("Malformed upstream payload: {reason}")]
    MalformedPayload { reason: String },

    /// `metadata.generated` is not a positive unix timestamp
    #[error("Invalid generated timestamp: {value}")]
    InvalidGenerated { value: i64 },

    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Conversion from VrpxError to ExError
impl From<VrpxError> for ExError {
    fn from(err: VrpxError) -> Self {
        match err {
            VrpxError::Validation(validation) => ExError::new(ExErrorKind::Validation)
                .with_op("canonicalize")
                .with_message(validation.to_string()),

            VrpxError::MalformedPayload { reason } => ExError::new(ExErrorKind::InvalidInput)
                .with_op("parse_payload")
                .with_message(reason),

            VrpxError::InvalidGenerated { value } => ExError::new(ExErrorKind::InvalidInput)
                .with_op("parse_payload")
                .with_message(format!(
                    "metadata.generated must be a positive unix timestamp, got {}",
                    value
                )),

            VrpxError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            VrpxError::Internal { message } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to VrpxError
impl From<serde_json::Error> for VrpxError {
    fn from(err: serde_json::Error) -> Self {
        VrpxError::Serialization {
            message: err.to_string(),
        }
    }
}
