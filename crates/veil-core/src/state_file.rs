//! On-disk snapshots of hidden windows.
//!
//! Both the hidden set (`hidden.json`) and the restart-resume snapshot
//! (`resume.json`) use the same document: a versioned list of
//! [`HiddenEntry`] records. Writes go to a temporary sibling and are
//! renamed into place so a crash never leaves a half-written file.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::desktop::Desktop;
use crate::error::PersistenceError;
use crate::store::HiddenEntry;

const FORMAT_VERSION: u32 = 1;

/// Returns the per-user data directory: `%LOCALAPPDATA%\veil`.
pub fn data_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("veil"))
}

/// Returns the hidden set path: `%LOCALAPPDATA%\veil\hidden.json`.
pub fn hidden_path() -> Option<PathBuf> {
    data_dir().map(|d| d.join("hidden.json"))
}

/// Returns the restart-resume snapshot path: `%LOCALAPPDATA%\veil\resume.json`.
pub fn resume_path() -> Option<PathBuf> {
    data_dir().map(|d| d.join("resume.json"))
}

#[derive(Debug, Serialize, Deserialize)]
struct StateDocument {
    version: u32,
    windows: Vec<HiddenEntry>,
}

/// A JSON state file at a fixed path.
#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Reads the file. Returns `Ok(None)` if it does not exist.
    pub fn load(&self) -> Result<Option<Vec<HiddenEntry>>, PersistenceError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(PersistenceError::io(&self.path, e)),
        };

        let doc: StateDocument =
            serde_json::from_str(&content).map_err(|e| PersistenceError::format(&self.path, e))?;
        if doc.version != FORMAT_VERSION {
            crate::log_warn!(
                "{}: unknown format version {}, reading anyway",
                self.path.display(),
                doc.version
            );
        }
        Ok(Some(doc.windows))
    }

    /// Replaces the file contents with `windows`.
    ///
    /// An empty list deletes the file: absence means nothing is hidden.
    pub fn save(&self, windows: &[HiddenEntry]) -> Result<(), PersistenceError> {
        if windows.is_empty() {
            return self.remove();
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| PersistenceError::io(parent, e))?;
        }

        let doc = StateDocument {
            version: FORMAT_VERSION,
            windows: windows.to_vec(),
        };
        let json = serde_json::to_string_pretty(&doc)
            .map_err(|e| PersistenceError::format(&self.path, e))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| PersistenceError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| PersistenceError::io(&self.path, e))?;
        Ok(())
    }

    /// Deletes the file. A missing file is not an error.
    pub fn remove(&self) -> Result<(), PersistenceError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PersistenceError::io(&self.path, e)),
        }
    }
}

/// Splits records read from disk into those still safe to act upon and
/// those that are not.
///
/// Handles are not stable across restarts, so a record survives only if
/// its handle is live *and* the window currently carries the recorded
/// title. Anything else is most likely a reused handle.
pub fn partition_valid<D: Desktop>(
    desktop: &D,
    records: Vec<HiddenEntry>,
) -> (Vec<HiddenEntry>, Vec<HiddenEntry>) {
    records.into_iter().partition(|entry| {
        desktop.is_live(entry.window.handle)
            && desktop.title(entry.window.handle).as_deref() == Some(entry.window.title.as_str())
    })
}
