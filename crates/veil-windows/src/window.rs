use veil_core::{Handle, WindowResult};

use windows::Win32::Foundation::HWND;
use windows::Win32::UI::WindowsAndMessaging::{
    GetWindowTextLengthW, GetWindowTextW, IsWindow, IsWindowVisible, SW_HIDE, SW_SHOW,
    SetWindowTextW, ShowWindow,
};
use windows::core::HSTRING;

/// A top-level window on the Windows platform, wrapping a Win32 `HWND`.
///
/// `HWND` is an opaque handle: a number that identifies a window to the
/// OS. Nothing is cached; every query goes to the OS.
#[derive(Debug, Clone, Copy)]
pub struct Window {
    hwnd: HWND,
}

impl Window {
    /// Creates a new `Window` from a raw `HWND`.
    pub fn new(hwnd: HWND) -> Self {
        Self { hwnd }
    }

    /// Creates a `Window` from a platform-agnostic handle.
    pub fn from_handle(handle: Handle) -> Self {
        Self {
            hwnd: HWND(handle.0 as *mut _),
        }
    }

    pub fn handle(&self) -> Handle {
        Handle(self.hwnd.0 as usize)
    }

    /// Returns whether the handle still names a window.
    pub fn is_live(&self) -> bool {
        // SAFETY: IsWindow accepts any value and only reports whether it
        // identifies an existing window.
        unsafe { IsWindow(Some(self.hwnd)).as_bool() }
    }

    /// Returns whether the window has the `WS_VISIBLE` style.
    ///
    /// A destroyed window is never visible.
    pub fn is_visible(&self) -> bool {
        // SAFETY: IsWindowVisible is a simple query that returns a BOOL.
        unsafe { IsWindowVisible(self.hwnd).as_bool() }
    }

    /// Returns the window title, or an empty string if it has none.
    pub fn title(&self) -> String {
        // SAFETY: GetWindowTextLengthW and GetWindowTextW read window
        // text without modifying state. Both return 0 for dead handles.
        unsafe {
            let length = GetWindowTextLengthW(self.hwnd);
            if length <= 0 {
                return String::new();
            }

            // +1 for the null terminator that Windows requires
            let mut buffer = vec![0u16; (length + 1) as usize];
            let copied = GetWindowTextW(self.hwnd, &mut buffer);
            String::from_utf16_lossy(&buffer[..copied.max(0) as usize])
        }
    }

    /// Replaces the window title.
    pub fn set_title(&self, title: &str) -> WindowResult<()> {
        // SAFETY: SetWindowTextW copies the string; the HSTRING outlives
        // the call.
        unsafe { SetWindowTextW(self.hwnd, &HSTRING::from(title))? };
        Ok(())
    }

    /// Hides the window without destroying it.
    pub fn hide(&self) {
        // SAFETY: ShowWindow with SW_HIDE only changes visibility. Its
        // return value is the previous visibility, not an error.
        unsafe {
            let _ = ShowWindow(self.hwnd, SW_HIDE);
        }
    }

    /// Shows a previously hidden window.
    pub fn show(&self) {
        // SAFETY: as for `hide`.
        unsafe {
            let _ = ShowWindow(self.hwnd, SW_SHOW);
        }
    }
}
