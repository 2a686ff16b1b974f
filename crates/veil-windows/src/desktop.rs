use veil_core::{Desktop, Handle, OsError, OsOp, WindowRef};

use crate::enumerate;
use crate::window::Window;

/// The live Windows desktop.
///
/// `ShowWindow` reports the previous visibility rather than success, so
/// each hide/show is confirmed by re-reading the window state.
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32Desktop;

impl Win32Desktop {
    fn set_visible(op: OsOp, handle: Handle, visible: bool) -> Result<(), OsError> {
        let window = Window::from_handle(handle);
        if !window.is_live() {
            return Err(OsError::new(op, handle, "invalid window handle"));
        }

        if visible {
            window.show();
        } else {
            window.hide();
        }

        if window.is_visible() != visible {
            // Typically UIPI: the window belongs to a process running at
            // a higher integrity level.
            return Err(OsError::new(
                op,
                handle,
                "window did not change visibility (access denied?)",
            ));
        }
        Ok(())
    }
}

impl Desktop for Win32Desktop {
    fn visible_windows(&self) -> Vec<WindowRef> {
        enumerate::visible_windows()
    }

    fn is_live(&self, handle: Handle) -> bool {
        Window::from_handle(handle).is_live()
    }

    fn is_visible(&self, handle: Handle) -> bool {
        let window = Window::from_handle(handle);
        window.is_live() && window.is_visible()
    }

    fn title(&self, handle: Handle) -> Option<String> {
        let window = Window::from_handle(handle);
        window.is_live().then(|| window.title())
    }

    fn hide(&self, handle: Handle) -> Result<(), OsError> {
        Self::set_visible(OsOp::Hide, handle, false)
    }

    fn show(&self, handle: Handle) -> Result<(), OsError> {
        Self::set_visible(OsOp::Show, handle, true)
    }
}
