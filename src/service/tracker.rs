use crate::models::error::{BackupError, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, UNIX_EPOCH};

/// In-memory record of the last modification timestamp seen per file.
///
/// A timestamp is recorded the moment a file is found due, before the upload
/// is attempted or confirmed. A failed upload therefore leaves the file
/// marked as seen, and it will not be retried until its timestamp moves
/// again. The map is never persisted; a restart re-uploads everything the
/// next scan finds.
#[derive(Debug, Default)]
pub struct ChangeTracker {
    seen: HashMap<PathBuf, Duration>,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self {
            seen: HashMap::new(),
        }
    }

    /// Reads the file's current modification time and reports whether it is
    /// due for backup, recording the new timestamp when it is.
    pub fn check(&mut self, path: &Path) -> Result<bool> {
        let metadata = fs::metadata(path).map_err(|cause| BackupError::Metadata {
            path: path.to_path_buf(),
            cause,
        })?;
        let modified = metadata
            .modified()
            .map_err(|cause| BackupError::Metadata {
                path: path.to_path_buf(),
                cause,
            })?
            .duration_since(UNIX_EPOCH)
            .map_err(|cause| BackupError::ModificationTime {
                path: path.to_path_buf(),
                cause,
            })?;
        Ok(self.mark(path, modified))
    }

    /// Due iff the path is unseen or the stored timestamp is strictly older.
    /// Inserts only when due.
    pub fn mark(&mut self, path: &Path, modified: Duration) -> bool {
        match self.seen.get(path) {
            Some(last) if *last >= modified => false,
            _ => {
                self.seen.insert(path.to_path_buf(), modified);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
