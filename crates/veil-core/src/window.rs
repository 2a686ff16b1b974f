use std::fmt;

use serde::{Deserialize, Serialize};

/// An opaque OS window identifier.
///
/// On Windows this is the numeric value of an `HWND`. The OS reuses
/// handle values after a window is destroyed, so a `Handle` is only a
/// lookup key: it never proves the window it once named still exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Handle(pub usize);

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:X}", self.0)
    }
}

/// A window as observed at one point in time.
///
/// The title is captured when the window is enumerated and may be stale
/// by the time the reference is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRef {
    pub handle: Handle,
    pub title: String,
}

impl WindowRef {
    pub fn new(handle: Handle, title: impl Into<String>) -> Self {
        Self {
            handle,
            title: title.into(),
        }
    }
}

impl fmt::Display for WindowRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" ({})", self.title, self.handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_displays_as_hex() {
        // Assert
        assert_eq!(Handle(0x1A2B).to_string(), "0x1A2B");
    }

    #[test]
    fn handle_serializes_as_plain_number() {
        // Arrange
        let window = WindowRef::new(Handle(42), "Notepad");

        // Act
        let json = serde_json::to_string(&window).unwrap();

        // Assert
        assert_eq!(json, r#"{"handle":42,"title":"Notepad"}"#);
    }
}
