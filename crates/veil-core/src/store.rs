//! The authoritative set of windows this process has hidden.
//!
//! Entries are keyed by a monotonically assigned [`HiddenId`]; the title
//! is display metadata plus a secondary lookup key. A title still appears
//! at most once: recording a window replaces any entry with the same
//! title (last-hidden-wins) or the same handle.
//!
//! Every mutation is written through to the backing [`StateFile`] before
//! the call returns. The in-memory set stays authoritative even if that
//! write fails; the error is returned so the caller can surface it.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::desktop::Desktop;
use crate::error::PersistenceError;
use crate::state_file::{self, StateFile};
use crate::window::WindowRef;

/// Internal identity of a hidden-set entry, bound at hide time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HiddenId(pub u64);

impl fmt::Display for HiddenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Who asked for a window to be hidden.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HideOrigin {
    /// Hidden by an explicit user request.
    #[default]
    Manual,
    /// Hidden by the auto-detection scan.
    Auto,
}

impl fmt::Display for HideOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manual => f.write_str("manual"),
            Self::Auto => f.write_str("auto"),
        }
    }
}

/// One hidden window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiddenEntry {
    pub id: HiddenId,
    #[serde(flatten)]
    pub window: WindowRef,
    #[serde(default)]
    pub origin: HideOrigin,
}

/// What the OS currently says about a hidden entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Live and not visible.
    Hidden,
    /// Live but shown again by someone else.
    Visible,
    /// The handle no longer names a window.
    Closed,
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hidden => f.write_str("hidden"),
            Self::Visible => f.write_str("visible"),
            Self::Closed => f.write_str("closed"),
        }
    }
}

impl HiddenEntry {
    pub fn status<D: Desktop>(&self, desktop: &D) -> EntryStatus {
        let handle = self.window.handle;
        if !desktop.is_live(handle) {
            EntryStatus::Closed
        } else if desktop.is_visible(handle) {
            EntryStatus::Visible
        } else {
            EntryStatus::Hidden
        }
    }
}

#[derive(Debug)]
pub struct VisibilityStore {
    entries: BTreeMap<HiddenId, HiddenEntry>,
    next_id: u64,
    file: Option<StateFile>,
}

impl VisibilityStore {
    /// Creates an empty store with no backing file.
    pub fn in_memory() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_id: 1,
            file: None,
        }
    }

    /// Opens the store backed by `file`, keeping only records that are
    /// still valid on this desktop.
    ///
    /// A read failure never prevents startup: the store opens empty and
    /// the error is handed back for the caller to report.
    pub fn open<D: Desktop>(file: StateFile, desktop: &D) -> (Self, Option<PersistenceError>) {
        let mut store = Self {
            file: Some(file),
            ..Self::in_memory()
        };

        let records = match store.file.as_ref().map(StateFile::load) {
            Some(Ok(Some(records))) => records,
            Some(Ok(None)) | None => return (store, None),
            Some(Err(e)) => {
                crate::log_error!("Failed to read hidden set, starting empty: {e}");
                return (store, Some(e));
            }
        };

        let (kept, dropped) = state_file::partition_valid(desktop, records);
        for entry in &dropped {
            crate::log_info!(
                "Dropping stale hidden entry {} {} (closed or handle reused)",
                entry.id,
                entry.window
            );
        }

        store.next_id = kept.iter().map(|e| e.id.0 + 1).max().unwrap_or(1);
        store.entries = kept.into_iter().map(|e| (e.id, e)).collect();

        let warning = if dropped.is_empty() {
            None
        } else {
            store.persist().err()
        };
        (store, warning)
    }

    /// Records `window` as hidden and returns its new id.
    ///
    /// Replaces any existing entry with the same title or handle.
    pub fn record(
        &mut self,
        window: WindowRef,
        origin: HideOrigin,
    ) -> Result<HiddenId, PersistenceError> {
        self.entries
            .retain(|_, e| e.window.title != window.title && e.window.handle != window.handle);

        let id = HiddenId(self.next_id);
        self.next_id += 1;
        self.entries.insert(id, HiddenEntry { id, window, origin });

        self.persist()?;
        Ok(id)
    }

    /// Removes the entry titled `title`, if any.
    pub fn forget(&mut self, title: &str) -> Result<Option<HiddenEntry>, PersistenceError> {
        match self.get(title).map(|e| e.id) {
            Some(id) => self.forget_id(id),
            None => Ok(None),
        }
    }

    /// Removes the entry with `id`, if any.
    pub fn forget_id(&mut self, id: HiddenId) -> Result<Option<HiddenEntry>, PersistenceError> {
        let Some(removed) = self.entries.remove(&id) else {
            return Ok(None);
        };
        self.persist()?;
        Ok(Some(removed))
    }

    pub fn get(&self, title: &str) -> Option<&HiddenEntry> {
        self.entries.values().find(|e| e.window.title == title)
    }

    pub fn get_id(&self, id: HiddenId) -> Option<&HiddenEntry> {
        self.entries.get(&id)
    }

    pub fn contains(&self, title: &str) -> bool {
        self.get(title).is_some()
    }

    /// Returns a point-in-time copy of all entries, oldest first.
    pub fn snapshot(&self) -> Vec<HiddenEntry> {
        self.entries.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self) -> Result<(), PersistenceError> {
        let Some(file) = &self.file else {
            return Ok(());
        };
        file.save(&self.snapshot())
    }
}
