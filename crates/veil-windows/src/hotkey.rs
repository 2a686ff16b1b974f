use std::sync::mpsc::Sender;

use veil_core::hotkey::Modifier;
use veil_core::{Hotkey, HotkeyBinding, HotkeyError, HotkeyRegistrar};
use windows::Win32::UI::Input::KeyboardAndMouse::{
    HOT_KEY_MODIFIERS, MOD_ALT, MOD_CONTROL, MOD_NOREPEAT, MOD_SHIFT, MOD_WIN, RegisterHotKey,
    UnregisterHotKey,
};

/// Veil binds exactly one system-wide combination.
const TOGGLE_HOTKEY_ID: i32 = 1;

/// Registers the toggle hotkey on the calling thread's message queue.
///
/// `RegisterHotKey` ties the binding to the thread that calls it, so a
/// registrar must only ever be used from the message-pump thread.
#[derive(Debug, Default)]
pub struct Win32Registrar;

impl HotkeyRegistrar for Win32Registrar {
    fn register(&mut self, hotkey: &Hotkey) -> Result<(), HotkeyError> {
        let vk =
            vk_from_name(&hotkey.key).ok_or_else(|| HotkeyError::UnknownKey(hotkey.key.clone()))?;

        let mut modifiers = MOD_NOREPEAT;
        for m in &hotkey.modifiers {
            modifiers |= modifier_to_flag(*m);
        }

        // SAFETY: RegisterHotKey registers a system-wide hotkey on the
        // current thread's message queue. It fails if another program
        // already owns the combination.
        unsafe { RegisterHotKey(None, TOGGLE_HOTKEY_ID, modifiers, vk) }
            .map_err(|_| HotkeyError::RegistrationFailed(hotkey.to_string()))
    }

    fn unregister(&mut self, _hotkey: &Hotkey) {
        // SAFETY: UnregisterHotKey removes our own registration by id.
        unsafe {
            let _ = UnregisterHotKey(None, TOGGLE_HOTKEY_ID);
        }
    }
}

/// Owns the toggle binding and turns `WM_HOTKEY` into toggle signals.
pub struct HotkeyManager {
    binding: HotkeyBinding<Win32Registrar>,
    sender: Sender<()>,
}

impl HotkeyManager {
    /// Creates a manager with nothing bound. Presses are sent through
    /// `sender`.
    pub fn new(sender: Sender<()>) -> Self {
        Self {
            binding: HotkeyBinding::new(Win32Registrar),
            sender,
        }
    }

    pub fn binding(&mut self) -> &mut HotkeyBinding<Win32Registrar> {
        &mut self.binding
    }

    /// Called from the message pump when a `WM_HOTKEY` message arrives.
    pub fn dispatch(&self, hotkey_id: i32) {
        if hotkey_id == TOGGLE_HOTKEY_ID {
            let _ = self.sender.send(());
        }
    }
}

fn modifier_to_flag(modifier: Modifier) -> HOT_KEY_MODIFIERS {
    match modifier {
        Modifier::Alt => MOD_ALT,
        Modifier::Shift => MOD_SHIFT,
        Modifier::Ctrl => MOD_CONTROL,
        Modifier::Win => MOD_WIN,
    }
}

/// Maps a key name to a Windows virtual key code, case-insensitively.
///
/// Letters, digits, F1 to F24 and a handful of named keys are known.
pub fn vk_from_name(name: &str) -> Option<u32> {
    let upper = name.to_ascii_uppercase();

    if let [ch] = upper.as_bytes()
        && (ch.is_ascii_uppercase() || ch.is_ascii_digit())
    {
        return Some(u32::from(*ch));
    }

    if let Some(n) = upper.strip_prefix('F').and_then(|rest| rest.parse::<u32>().ok())
        && (1..=24).contains(&n)
    {
        return Some(0x70 + n - 1); // VK_F1
    }

    let vk = match upper.as_str() {
        "SPACE" => 0x20,
        "ENTER" | "RETURN" => 0x0D,
        "TAB" => 0x09,
        "ESC" | "ESCAPE" => 0x1B,
        "BACKSPACE" => 0x08,
        "INSERT" | "INS" => 0x2D,
        "DELETE" | "DEL" => 0x2E,
        "HOME" => 0x24,
        "END" => 0x23,
        "PAGEUP" => 0x21,
        "PAGEDOWN" => 0x22,
        "LEFT" => 0x25,
        "UP" => 0x26,
        "RIGHT" => 0x27,
        "DOWN" => 0x28,
        "PAUSE" => 0x13,
        "SCROLLLOCK" => 0x91,
        "BACKTICK" | "GRAVE" => 0xC0,
        "MINUS" => 0xBD,
        "EQUALS" | "PLUS" => 0xBB,
        _ => return None,
    };
    Some(vk)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_and_digits_map_to_their_ascii_code() {
        // Assert
        assert_eq!(vk_from_name("h"), Some(0x48));
        assert_eq!(vk_from_name("J"), Some(0x4A));
        assert_eq!(vk_from_name("7"), Some(0x37));
    }

    #[test]
    fn function_keys_cover_f1_to_f24() {
        // Assert
        assert_eq!(vk_from_name("f1"), Some(0x70));
        assert_eq!(vk_from_name("F24"), Some(0x87));
        assert_eq!(vk_from_name("f25"), None);
        assert_eq!(vk_from_name("f"), Some(0x46));
    }

    #[test]
    fn unknown_names_are_rejected() {
        // Assert
        assert_eq!(vk_from_name("hyper"), None);
        assert_eq!(vk_from_name(""), None);
    }
}
