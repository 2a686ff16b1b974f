use veil_core::WindowRef;

use windows::Win32::Foundation::{HWND, LPARAM};
use windows::Win32::UI::WindowsAndMessaging::{EnumWindows, IsWindowVisible};
use windows::core::BOOL;

use crate::window::Window;

/// Enumerates all visible top-level windows that have a title.
///
/// This calls the Win32 `EnumWindows` API, which iterates over every
/// top-level window and invokes a callback for each one. A failure of
/// the enumeration itself is logged and whatever was collected so far is
/// returned; a window whose title cannot be read is simply skipped.
pub fn visible_windows() -> Vec<WindowRef> {
    let mut windows: Vec<WindowRef> = Vec::new();

    // SAFETY: EnumWindows calls our callback for each top-level window.
    // We pass a pointer to our Vec as LPARAM (user data). The callback
    // casts it back to &mut Vec<WindowRef>. This is safe because
    // EnumWindows runs synchronously, so the Vec outlives the call.
    let result = unsafe {
        EnumWindows(
            Some(enum_window_callback),
            LPARAM(&mut windows as *mut _ as isize),
        )
    };

    if let Err(e) = result {
        veil_core::log_warn!(
            "EnumWindows stopped early after {} windows: {e}",
            windows.len()
        );
    }

    windows
}

/// Callback invoked by `EnumWindows` for each top-level window.
///
/// Always returns `TRUE` so one odd window never ends enumeration.
unsafe extern "system" fn enum_window_callback(hwnd: HWND, lparam: LPARAM) -> BOOL {
    // SAFETY: lparam is a pointer to our Vec<WindowRef>, cast from visible_windows().
    let windows = unsafe { &mut *(lparam.0 as *mut Vec<WindowRef>) };

    // SAFETY: IsWindowVisible is a read-only query.
    if unsafe { IsWindowVisible(hwnd).as_bool() } {
        let window = Window::new(hwnd);
        let title = window.title();
        if !title.is_empty() {
            windows.push(WindowRef::new(window.handle(), title));
        }
    }

    BOOL(1) // TRUE: keep enumerating
}
