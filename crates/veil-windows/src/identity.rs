use veil_core::Handle;
use windows::Win32::UI::WindowsAndMessaging::GetForegroundWindow;

use crate::window::Window;

/// Claims the foreground window (the terminal `veil` was typed into) as
/// this instance's own window and gives it the self-identity title.
///
/// The handle is returned even if retitling fails, since hides protect
/// it by handle as well. Returns `None` when nothing has focus.
pub fn claim_foreground(title: &str) -> Option<Handle> {
    // SAFETY: GetForegroundWindow takes no arguments and returns a null
    // handle when no window has focus.
    let hwnd = unsafe { GetForegroundWindow() };
    if hwnd.is_invalid() {
        return None;
    }

    let window = Window::new(hwnd);
    if let Err(e) = window.set_title(title) {
        veil_core::log_warn!("Could not retitle the launching window: {e}");
    }
    Some(window.handle())
}
