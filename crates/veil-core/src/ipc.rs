use serde::{Deserialize, Serialize};

use crate::store::{EntryStatus, HiddenEntry, HiddenId, HideOrigin};
use crate::window::{Handle, WindowRef};

/// The named pipe path used for IPC between CLI and daemon.
pub const PIPE_NAME: &str = r"\\.\pipe\veil";

/// A command sent from the CLI to the daemon.
///
/// These are serialized as JSON and sent over the named pipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command")]
pub enum Command {
    /// Request the daemon to stop.
    Stop,
    /// Request the daemon's current status.
    Status,
    /// Hide the visible window with this title.
    Hide { title: String },
    /// Show the hidden window with this title.
    Show { title: String },
    /// Show the hidden entry with this id, as listed by `hidden`.
    ShowId { id: HiddenId },
    /// Run the bulk hide/restore toggle, as the hotkey would.
    Toggle,
    /// Run one auto-hide scan now instead of waiting for the next tick.
    Scan,
    /// List currently visible windows.
    Windows,
    /// List the hidden set with live status.
    Hidden,
    /// Rebind the toggle hotkey and save it to the config file.
    SetHotkey { hotkey: String },
}

/// A response sent from the daemon back to the CLI.
#[derive(Debug, Serialize, Deserialize)]
pub struct Response {
    /// Whether the command succeeded.
    pub status: ResponseStatus,
    /// Optional human-readable message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Window listing for `Windows` and `Hidden`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub windows: Vec<WindowInfo>,
}

/// Status of a daemon response.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Ok,
    Error,
}

/// One row of a window listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowInfo {
    pub handle: Handle,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<HiddenId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<HideOrigin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<EntryStatus>,
}

impl From<&WindowRef> for WindowInfo {
    fn from(window: &WindowRef) -> Self {
        Self {
            handle: window.handle,
            title: window.title.clone(),
            id: None,
            origin: None,
            state: None,
        }
    }
}

impl WindowInfo {
    pub fn hidden(entry: &HiddenEntry, state: EntryStatus) -> Self {
        Self {
            id: Some(entry.id),
            origin: Some(entry.origin),
            state: Some(state),
            ..Self::from(&entry.window)
        }
    }
}

impl Response {
    /// Creates a successful response with no message.
    pub fn ok() -> Self {
        Self {
            status: ResponseStatus::Ok,
            message: None,
            windows: Vec::new(),
        }
    }

    /// Creates a successful response with a message.
    pub fn ok_with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::ok()
        }
    }

    /// Creates an error response with a message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            message: Some(message.into()),
            windows: Vec::new(),
        }
    }

    /// Creates a successful response carrying a window listing.
    pub fn with_windows(windows: Vec<WindowInfo>) -> Self {
        Self {
            windows,
            ..Self::ok()
        }
    }
}
