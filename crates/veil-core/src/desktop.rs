//! The seam between the visibility state machine and the OS.
//!
//! A [`Desktop`] bundles the three OS-facing collaborators: the window
//! enumerator, the handle validity oracle, and the raw hide/show calls.
//! `veil-windows` implements it over Win32; tests use an in-memory fake.

use crate::error::OsError;
use crate::window::{Handle, WindowRef};

pub trait Desktop {
    /// Lists every currently visible top-level window with a non-empty
    /// title, in OS enumeration order.
    ///
    /// Never fails as a whole: a window whose metadata cannot be read is
    /// skipped and enumeration continues.
    fn visible_windows(&self) -> Vec<WindowRef>;

    /// Returns whether `handle` still denotes some window.
    ///
    /// Best effort only: the OS may have reused the handle value for an
    /// unrelated window.
    fn is_live(&self, handle: Handle) -> bool;

    /// Returns whether `handle` is a live, visible window.
    ///
    /// Returns `false` for dead handles instead of failing.
    fn is_visible(&self, handle: Handle) -> bool;

    /// Returns the current title of `handle`, or `None` if it is dead.
    fn title(&self, handle: Handle) -> Option<String>;

    /// Issues one OS hide command.
    fn hide(&self, handle: Handle) -> Result<(), OsError>;

    /// Issues one OS show command.
    fn show(&self, handle: Handle) -> Result<(), OsError>;
}

impl<D: Desktop + ?Sized> Desktop for &D {
    fn visible_windows(&self) -> Vec<WindowRef> {
        (**self).visible_windows()
    }

    fn is_live(&self, handle: Handle) -> bool {
        (**self).is_live(handle)
    }

    fn is_visible(&self, handle: Handle) -> bool {
        (**self).is_visible(handle)
    }

    fn title(&self, handle: Handle) -> Option<String> {
        (**self).title(handle)
    }

    fn hide(&self, handle: Handle) -> Result<(), OsError> {
        (**self).hide(handle)
    }

    fn show(&self, handle: Handle) -> Result<(), OsError> {
        (**self).show(handle)
    }
}
