//! Snapshot persistence
//!
//! The whole user sequence is stored as one JSON blob under a fixed key.
//! Loading is lenient: a missing or malformed blob yields an empty
//! snapshot, never an error. Saving serializes the complete snapshot so
//! the file always reflects the last committed in-memory state.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{Result, StoreError};
use crate::types::Snapshot;

/// Fixed key the snapshot blob is stored under
pub const STORAGE_KEY: &str = "line-item-mgt-users";

#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted snapshot.
    ///
    /// A missing file is a fresh start; a file that cannot be read or
    /// parsed is discarded with a warning. Both yield an empty snapshot.
    pub fn load(&self) -> Snapshot {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Snapshot::default(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read snapshot blob");
                return Snapshot::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "discarding malformed snapshot blob");
                Snapshot::default()
            }
        }
    }

    /// Write the snapshot blob, creating parent directories if needed
    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(StoreError::Io)?;
        }

        let blob = serde_json::to_string(snapshot).map_err(StoreError::Serialize)?;
        std::fs::write(&self.path, blob).map_err(StoreError::Io)?;
        Ok(())
    }
}
