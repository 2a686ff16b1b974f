//! The global toggle hotkey: its textual form and the unregister-then-
//! register rebind sequence.
//!
//! Platform crates provide a [`HotkeyRegistrar`]; [`HotkeyBinding`]
//! owns the rebind ordering so it can be tested without an OS.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Keyboard modifier keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Alt,
    Shift,
    Ctrl,
    Win,
}

impl Modifier {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "alt" => Some(Self::Alt),
            "shift" => Some(Self::Shift),
            "ctrl" | "control" => Some(Self::Ctrl),
            "win" | "super" | "windows" => Some(Self::Win),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Alt => "alt",
            Self::Shift => "shift",
            Self::Ctrl => "ctrl",
            Self::Win => "win",
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HotkeyError {
    #[error("invalid hotkey \"{0}\": expected modifiers and one key, e.g. \"ctrl+alt+h\"")]
    InvalidFormat(String),
    #[error("unknown key name \"{0}\"")]
    UnknownKey(String),
    #[error("could not register hotkey \"{0}\" (already taken by another program?)")]
    RegistrationFailed(String),
}

/// A key combination such as `ctrl+alt+h`.
///
/// Parsing is case-insensitive and order-insensitive for modifiers; the
/// canonical text form lists modifiers in ctrl, alt, shift, win order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hotkey {
    pub modifiers: Vec<Modifier>,
    pub key: String,
}

impl FromStr for Hotkey {
    type Err = HotkeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let parts: Vec<&str> = normalized.split('+').map(str::trim).collect();
        let invalid = || HotkeyError::InvalidFormat(s.trim().to_string());

        let Some((key, mods)) = parts.split_last() else {
            return Err(invalid());
        };
        if key.is_empty() || Modifier::parse(key).is_some() {
            return Err(invalid());
        }

        let mut modifiers = Vec::new();
        for m in mods {
            let modifier = Modifier::parse(m).ok_or_else(invalid)?;
            if !modifiers.contains(&modifier) {
                modifiers.push(modifier);
            }
        }
        if modifiers.is_empty() {
            return Err(invalid());
        }

        const ORDER: [Modifier; 4] = [Modifier::Ctrl, Modifier::Alt, Modifier::Shift, Modifier::Win];
        modifiers.sort_by_key(|m| ORDER.iter().position(|o| o == m));

        Ok(Self {
            modifiers,
            key: key.to_string(),
        })
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for m in &self.modifiers {
            write!(f, "{}+", m.as_str())?;
        }
        f.write_str(&self.key)
    }
}

/// Registers and unregisters one system-wide key combination.
pub trait HotkeyRegistrar {
    fn register(&mut self, hotkey: &Hotkey) -> Result<(), HotkeyError>;
    fn unregister(&mut self, hotkey: &Hotkey);
}

/// The single active toggle hotkey.
pub struct HotkeyBinding<R: HotkeyRegistrar> {
    registrar: R,
    current: Option<Hotkey>,
}

impl<R: HotkeyRegistrar> HotkeyBinding<R> {
    pub fn new(registrar: R) -> Self {
        Self {
            registrar,
            current: None,
        }
    }

    pub fn current(&self) -> Option<&Hotkey> {
        self.current.as_ref()
    }

    pub fn registrar(&self) -> &R {
        &self.registrar
    }

    /// Replaces the active combination with `hotkey`.
    ///
    /// The old combination is unregistered before the new one is
    /// registered. If registration fails the old one is put back and the
    /// error returned, so exactly one combination stays active.
    pub fn rebind(&mut self, hotkey: Hotkey) -> Result<(), HotkeyError> {
        if self.current.as_ref() == Some(&hotkey) {
            return Ok(());
        }

        if let Some(old) = &self.current {
            self.registrar.unregister(old);
        }

        if let Err(e) = self.registrar.register(&hotkey) {
            if let Some(old) = &self.current
                && let Err(restore) = self.registrar.register(old)
            {
                crate::log_error!("Lost hotkey {old} while rebinding: {restore}");
                self.current = None;
            }
            return Err(e);
        }

        crate::log_info!("Toggle hotkey bound to {hotkey}");
        self.current = Some(hotkey);
        Ok(())
    }

    /// Unregisters the active combination, if any.
    pub fn clear(&mut self) {
        if let Some(old) = self.current.take() {
            self.registrar.unregister(&old);
        }
    }
}

impl<R: HotkeyRegistrar> Drop for HotkeyBinding<R> {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tracks which combinations are live, like the OS would.
    #[derive(Default)]
    struct FakeRegistrar {
        active: Vec<String>,
        taken: Vec<String>,
    }

    impl HotkeyRegistrar for FakeRegistrar {
        fn register(&mut self, hotkey: &Hotkey) -> Result<(), HotkeyError> {
            let text = hotkey.to_string();
            if self.taken.contains(&text) {
                return Err(HotkeyError::RegistrationFailed(text));
            }
            self.active.push(text);
            Ok(())
        }

        fn unregister(&mut self, hotkey: &Hotkey) {
            let text = hotkey.to_string();
            self.active.retain(|h| *h != text);
        }
    }

    fn hk(s: &str) -> Hotkey {
        s.parse().unwrap()
    }

    #[test]
    fn parses_and_canonicalizes() {
        // Act
        let hotkey: Hotkey = " Alt+CTRL+H ".parse().unwrap();

        // Assert
        assert_eq!(hotkey.modifiers, vec![Modifier::Ctrl, Modifier::Alt]);
        assert_eq!(hotkey.key, "h");
        assert_eq!(hotkey.to_string(), "ctrl+alt+h");
    }

    #[test]
    fn rejects_malformed_strings() {
        // Assert
        assert!("h".parse::<Hotkey>().is_err());
        assert!("ctrl+alt".parse::<Hotkey>().is_err());
        assert!("ctrl++".parse::<Hotkey>().is_err());
        assert!("hyper+h".parse::<Hotkey>().is_err());
        assert!("".parse::<Hotkey>().is_err());
    }

    #[test]
    fn rebind_swaps_active_combination() {
        // Arrange
        let mut binding = HotkeyBinding::new(FakeRegistrar::default());
        binding.rebind(hk("ctrl+alt+h")).unwrap();

        // Act
        binding.rebind(hk("ctrl+alt+j")).unwrap();

        // Assert
        assert_eq!(binding.registrar().active, vec!["ctrl+alt+j".to_string()]);
        assert_eq!(binding.current(), Some(&hk("ctrl+alt+j")));
    }

    #[test]
    fn failed_rebind_keeps_old_combination() {
        // Arrange
        let registrar = FakeRegistrar {
            taken: vec!["ctrl+alt+j".into()],
            ..Default::default()
        };
        let mut binding = HotkeyBinding::new(registrar);
        binding.rebind(hk("ctrl+alt+h")).unwrap();

        // Act
        let result = binding.rebind(hk("ctrl+alt+j"));

        // Assert
        assert!(matches!(result, Err(HotkeyError::RegistrationFailed(_))));
        assert_eq!(binding.registrar().active, vec!["ctrl+alt+h".to_string()]);
        assert_eq!(binding.current(), Some(&hk("ctrl+alt+h")));
    }

    #[test]
    fn rebind_to_same_combination_is_noop() {
        // Arrange
        let mut binding = HotkeyBinding::new(FakeRegistrar::default());
        binding.rebind(hk("ctrl+alt+h")).unwrap();

        // Act
        binding.rebind(hk("alt+ctrl+h")).unwrap();

        // Assert
        assert_eq!(binding.registrar().active.len(), 1);
    }
}
