//! Atomic write primitives
//!
//! Uses temp→rename pattern to ensure no partial writes

use crate::errors::{io_error, Result};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::Path;

/// Atomically write bytes to a file
///
/// The bytes go to a `.tmp` sibling which is flushed to disk and then
/// renamed over the target. Readers see either the old or the new file.
pub fn atomic_write(target_path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error("create_state_dir", parent, e))?;
    }

    let temp_path = target_path.with_extension("tmp");

    let mut file = File::create(&temp_path).map_err(|e| io_error("create_temp", &temp_path, e))?;
    file.write_all(content)
        .map_err(|e| io_error("write_temp", &temp_path, e))?;
    file.sync_all()
        .map_err(|e| io_error("sync_temp", &temp_path, e))?;
    drop(file);

    fs::rename(&temp_path, target_path).map_err(|e| io_error("rename_temp", target_path, e))?;

    Ok(())
}

/// Read a file, returning `None` if it does not exist
pub fn read_optional(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(io_error("read_state_file", path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write_replaces_content() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("state_metadata.json");

        atomic_write(&target, b"{\"serial\":1}").unwrap();
        atomic_write(&target, b"{\"serial\":2}").unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"{\"serial\":2}");
    }

    #[test]
    fn test_atomic_write_creates_parent() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("diffs").join("diff_0000000001.json");

        atomic_write(&target, b"{}").unwrap();

        assert!(target.exists());
    }

    #[test]
    fn test_no_tmp_files_after_write() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("current_snapshot.json");

        atomic_write(&target, b"[]").unwrap();

        let leftovers = fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "tmp"))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn test_read_optional_missing_is_none() {
        let temp_dir = TempDir::new().unwrap();
        assert!(read_optional(&temp_dir.path().join("absent.json"))
            .unwrap()
            .is_none());
    }
}
