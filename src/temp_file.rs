//! Scoped temporary file that is removed when dropped

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Owns a file path for the duration of one run
///
/// The file is deleted when the guard is dropped, on success, on error, and on panic
/// unwinding. A file that was never created is not an error, and a failed removal is
/// logged rather than raised.
#[derive(Debug)]
pub struct TempFile {
    path: PathBuf,
}

impl TempFile {
    /// Take ownership of `path`; nothing is created yet
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path the file lives at
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = ?self.path, "removed temporary image"),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = ?self.path, "temporary image was never created")
            }
            Err(e) => warn!(path = ?self.path, error = %e, "failed to remove temporary image"),
        }
    }
}
