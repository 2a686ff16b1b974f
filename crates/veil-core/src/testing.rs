//! In-memory [`Desktop`] used by unit tests.

use std::cell::RefCell;
use std::collections::HashSet;
use std::path::Path;

use crate::desktop::Desktop;
use crate::error::{OsError, OsOp};
use crate::state_file::StateFile;
use crate::window::{Handle, WindowRef};

#[derive(Debug, Clone)]
struct FakeWindow {
    handle: Handle,
    title: String,
    visible: bool,
}

#[derive(Debug, Default)]
struct FakeState {
    windows: Vec<FakeWindow>,
    calls: Vec<(OsOp, Handle)>,
    failing: HashSet<Handle>,
}

/// A scripted desktop that records every OS visibility call.
#[derive(Debug, Default)]
pub(crate) struct FakeDesktop {
    state: RefCell<FakeState>,
}

impl FakeDesktop {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Adds a live, visible window.
    pub(crate) fn add(&self, handle: usize, title: &str) {
        self.push(handle, title, true);
    }

    /// Adds a live window that is already hidden.
    pub(crate) fn add_hidden(&self, handle: usize, title: &str) {
        self.push(handle, title, false);
    }

    /// Destroys a window; its handle stops being live.
    pub(crate) fn close(&self, handle: usize) {
        self.state
            .borrow_mut()
            .windows
            .retain(|w| w.handle != Handle(handle));
    }

    /// Makes every hide/show call on `handle` fail.
    pub(crate) fn fail_on(&self, handle: usize) {
        self.state.borrow_mut().failing.insert(Handle(handle));
    }

    pub(crate) fn calls(&self) -> Vec<(OsOp, Handle)> {
        self.state.borrow().calls.clone()
    }

    pub(crate) fn visible_titles(&self) -> Vec<String> {
        self.visible_windows().into_iter().map(|w| w.title).collect()
    }

    fn push(&self, handle: usize, title: &str, visible: bool) {
        self.state.borrow_mut().windows.push(FakeWindow {
            handle: Handle(handle),
            title: title.into(),
            visible,
        });
    }

    fn set_visible(&self, op: OsOp, handle: Handle, visible: bool) -> Result<(), OsError> {
        let mut state = self.state.borrow_mut();
        state.calls.push((op, handle));
        if state.failing.contains(&handle) {
            return Err(OsError::new(op, handle, "scripted failure"));
        }
        match state.windows.iter_mut().find(|w| w.handle == handle) {
            Some(w) => {
                w.visible = visible;
                Ok(())
            }
            None => Err(OsError::new(op, handle, "invalid window handle")),
        }
    }
}

impl Desktop for FakeDesktop {
    fn visible_windows(&self) -> Vec<WindowRef> {
        self.state
            .borrow()
            .windows
            .iter()
            .filter(|w| w.visible && !w.title.is_empty())
            .map(|w| WindowRef::new(w.handle, w.title.clone()))
            .collect()
    }

    fn is_live(&self, handle: Handle) -> bool {
        self.state.borrow().windows.iter().any(|w| w.handle == handle)
    }

    fn is_visible(&self, handle: Handle) -> bool {
        self.state
            .borrow()
            .windows
            .iter()
            .any(|w| w.handle == handle && w.visible)
    }

    fn title(&self, handle: Handle) -> Option<String> {
        self.state
            .borrow()
            .windows
            .iter()
            .find(|w| w.handle == handle)
            .map(|w| w.title.clone())
    }

    fn hide(&self, handle: Handle) -> Result<(), OsError> {
        self.set_visible(OsOp::Hide, handle, false)
    }

    fn show(&self, handle: Handle) -> Result<(), OsError> {
        self.set_visible(OsOp::Show, handle, true)
    }
}

/// A state file under `dir` that can never be written: its parent
/// directory is a regular file.
pub(crate) fn unwritable_file(dir: &Path) -> StateFile {
    let blocker = dir.join("not-a-directory");
    std::fs::write(&blocker, "").unwrap();
    StateFile::new(blocker.join("hidden.json"))
}
