//! Durable key-value storage for the grid state.
//!
//! One JSON document under the well-known [`STATE_KEY`](crate::state::STATE_KEY)
//! inside a caller-chosen directory. A missing or unparseable document is
//! "no saved state": the caller falls back to default grid construction and
//! the degradation is reported on the log side channel, never as an error.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::WarpError;
use crate::state::{WarpState, STATE_KEY};

/// File-backed store for the persisted [`WarpState`].
#[derive(Debug, Clone)]
pub struct StateStore {
    dir: PathBuf,
}

impl StateStore {
    /// Creates a store rooted at `dir`. The directory is created lazily on
    /// first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the state document.
    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{STATE_KEY}.json"))
    }

    /// Writes the state, creating the directory if needed.
    pub fn save(&self, state: &WarpState) -> Result<(), WarpError> {
        fs::create_dir_all(&self.dir).map_err(|e| WarpError::Io(e.to_string()))?;
        let json = serde_json::to_string_pretty(state)
            .map_err(|e| WarpError::Serialization(e.to_string()))?;
        fs::write(self.path(), json).map_err(|e| WarpError::Io(e.to_string()))
    }

    /// Reads the stored state.
    ///
    /// Returns `Ok(None)` when no document exists or the document fails to
    /// parse (the malformed file is logged and left in place); only a
    /// genuine read failure is an error.
    pub fn load(&self) -> Result<Option<WarpState>, WarpError> {
        let path = self.path();
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(WarpError::Io(e.to_string())),
        };
        match serde_json::from_str(&json) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                log::warn!("ignoring malformed state at {}: {e}", path.display());
                Ok(None)
            }
        }
    }

    /// Removes the stored state. Removing an absent document is a no-op.
    pub fn clear(&self) -> Result<(), WarpError> {
        match fs::remove_file(self.path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(WarpError::Io(e.to_string())),
        }
    }

    /// The directory this store is rooted at.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
