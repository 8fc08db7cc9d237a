//! Where upstream VRP documents come from.

use std::path::{Path, PathBuf};
use vrpx_core::errors::{ExError, ExErrorKind};
use vrpx_store::Result;

/// A supplier of raw upstream documents (`{metadata, roas}` JSON).
///
/// Implementations own their timeouts; a failed fetch is reported as
/// `ExErrorKind::ExternalSource` and never touches engine state.
pub trait VrpSource: Send + Sync {
    /// Fetch the latest document.
    ///
    /// # Errors
    ///
    /// `ExErrorKind::ExternalSource` if no document could be obtained.
    fn fetch(&self) -> Result<Vec<u8>>;

    /// Human-readable origin used in log lines
    fn describe(&self) -> String;
}

/// Reads the document from a file that a validator export job rewrites.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl VrpSource for FileSource {
    fn fetch(&self) -> Result<Vec<u8>> {
        std::fs::read(&self.path).map_err(|e| {
            ExError::new(ExErrorKind::ExternalSource)
                .with_op("fetch_vrps")
                .with_path(self.path.display().to_string())
                .with_message(e.to_string())
        })
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}
