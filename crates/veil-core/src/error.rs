use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::hotkey::HotkeyError;
use crate::window::Handle;

/// A boxed error type for platform plumbing (pipes, threads, process
/// management) where callers only report the failure.
pub type WindowResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Errors produced by hide/show operations on a single window.
#[derive(Debug, Error)]
pub enum VeilError {
    /// The target is this process's own window. No OS call was made.
    #[error("refusing to act on own window \"{0}\"")]
    SelfTarget(String),

    /// The title is not in the hidden set. Nothing changed.
    #[error("no hidden window titled \"{0}\"")]
    NotFound(String),

    /// The recorded handle no longer names a window. The entry has
    /// already been dropped from the hidden set.
    #[error("window \"{title}\" ({handle}) no longer exists; removed from the hidden set")]
    StaleHandle { title: String, handle: Handle },

    /// No currently visible window has this title.
    #[error("no visible window titled \"{0}\"")]
    NoSuchWindow(String),

    #[error(transparent)]
    Os(#[from] OsError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Hotkey(#[from] HotkeyError),
}

impl VeilError {
    /// Informational outcomes that are reported to the user but are not
    /// faults (the window was closed while hidden).
    pub fn is_informational(&self) -> bool {
        matches!(self, Self::StaleHandle { .. })
    }
}

/// The OS visibility call that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsOp {
    Hide,
    Show,
}

impl fmt::Display for OsOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hide => f.write_str("hide"),
            Self::Show => f.write_str("show"),
        }
    }
}

/// A hide or show system call failed.
#[derive(Debug, Clone, Error)]
#[error("{op} failed for window {handle}: {reason}")]
pub struct OsError {
    pub op: OsOp,
    pub handle: Handle,
    pub reason: String,
}

impl OsError {
    pub fn new(op: OsOp, handle: Handle, reason: impl Into<String>) -> Self {
        Self {
            op,
            handle,
            reason: reason.into(),
        }
    }
}

/// Reading or writing a state file failed.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An existing file that does not parse is never overwritten.
    #[error("{reason}; refusing to overwrite it")]
    Unparsable { path: PathBuf, reason: String },
}

impl PersistenceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn format(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Format {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_handle_is_informational() {
        // Arrange
        let stale = VeilError::StaleHandle {
            title: "Notepad".into(),
            handle: Handle(7),
        };
        let missing = VeilError::NotFound("Notepad".into());

        // Act / Assert
        assert!(stale.is_informational());
        assert!(!missing.is_informational());
    }

    #[test]
    fn os_error_names_operation_and_handle() {
        // Arrange
        let err = OsError::new(OsOp::Show, Handle(0xFF), "access denied");

        // Act
        let text = err.to_string();

        // Assert
        assert_eq!(text, "show failed for window 0xFF: access denied");
    }
}
