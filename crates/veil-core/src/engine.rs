//! Applies visibility transitions to the OS and keeps the hidden set in
//! step with them.

use crate::desktop::Desktop;
use crate::error::VeilError;
use crate::store::{HiddenEntry, HiddenId, HideOrigin, VisibilityStore};
use crate::window::{Handle, WindowRef};

/// The hide/show engine for one desktop and one self identity.
///
/// Cheap to construct; borrow it for the duration of an operation.
pub struct Engine<'a, D: Desktop> {
    desktop: &'a D,
    self_title: &'a str,
    own_window: Option<Handle>,
}

impl<'a, D: Desktop> Engine<'a, D> {
    pub fn new(desktop: &'a D, self_title: &'a str) -> Self {
        Self {
            desktop,
            self_title,
            own_window: None,
        }
    }

    /// Also treats `handle` as this process's own window, whatever its
    /// title says.
    pub fn with_own_window(mut self, handle: Option<Handle>) -> Self {
        self.own_window = handle;
        self
    }

    pub fn desktop(&self) -> &'a D {
        self.desktop
    }

    /// Returns whether `window` is this process's own window: the
    /// claimed handle, or a window whose observed or current title is the
    /// self title.
    pub fn is_self(&self, window: &WindowRef) -> bool {
        if self.own_window == Some(window.handle) {
            return true;
        }
        if self.self_title.is_empty() {
            return false;
        }
        window.title == self.self_title
            || self.desktop.title(window.handle).as_deref() == Some(self.self_title)
    }

    /// Hides `window` at the OS level without recording it.
    pub fn conceal(&self, window: &WindowRef) -> Result<(), VeilError> {
        if self.is_self(window) {
            return Err(VeilError::SelfTarget(window.title.clone()));
        }
        self.desktop.hide(window.handle)?;
        Ok(())
    }

    /// Shows `window` at the OS level without touching the hidden set.
    pub fn reveal(&self, window: &WindowRef) -> Result<(), VeilError> {
        self.desktop.show(window.handle)?;
        Ok(())
    }

    /// Hides `window` and records it in `store`.
    ///
    /// Hiding a title that is already recorded refreshes its entry.
    pub fn hide(
        &self,
        store: &mut VisibilityStore,
        window: &WindowRef,
        origin: HideOrigin,
    ) -> Result<HiddenId, VeilError> {
        self.conceal(window)?;
        let id = store.record(window.clone(), origin)?;
        crate::log_info!("Hid {window} as {id} ({origin:?})");
        Ok(id)
    }

    /// Shows the hidden window titled `title` and forgets it.
    pub fn show(&self, store: &mut VisibilityStore, title: &str) -> Result<WindowRef, VeilError> {
        let entry = store
            .get(title)
            .cloned()
            .ok_or_else(|| VeilError::NotFound(title.to_string()))?;
        self.show_entry(store, entry)
    }

    /// Shows the hidden window with `id` and forgets it.
    pub fn show_id(&self, store: &mut VisibilityStore, id: HiddenId) -> Result<WindowRef, VeilError> {
        let entry = store
            .get_id(id)
            .cloned()
            .ok_or_else(|| VeilError::NotFound(id.to_string()))?;
        self.show_entry(store, entry)
    }

    fn show_entry(
        &self,
        store: &mut VisibilityStore,
        entry: HiddenEntry,
    ) -> Result<WindowRef, VeilError> {
        let window = entry.window;

        if !self.desktop.is_live(window.handle) {
            crate::log_info!("{window} is gone, dropping {}", entry.id);
            if let Err(e) = store.forget_id(entry.id) {
                crate::log_error!("Failed to persist removal of {}: {e}", entry.id);
            }
            return Err(VeilError::StaleHandle {
                title: window.title,
                handle: window.handle,
            });
        }

        self.reveal(&window)?;
        store.forget_id(entry.id)?;
        crate::log_info!("Showed {window}");
        Ok(window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OsOp;
    use crate::testing::{FakeDesktop, unwritable_file};

    const SELF: &str = "Manager";

    #[test]
    fn hide_then_show_restores_visibility_and_clears_entry() {
        // Arrange
        let desktop = FakeDesktop::new();
        desktop.add(1, "Notepad");
        let engine = Engine::new(&desktop, SELF);
        let mut store = VisibilityStore::in_memory();
        let notepad = WindowRef::new(Handle(1), "Notepad");

        // Act
        engine.hide(&mut store, &notepad, HideOrigin::Manual).unwrap();
        let hidden_visible = desktop.is_visible(Handle(1));
        let shown = engine.show(&mut store, "Notepad").unwrap();

        // Assert
        assert!(!hidden_visible);
        assert_eq!(shown, notepad);
        assert!(desktop.is_visible(Handle(1)));
        assert!(!store.contains("Notepad"));
        assert_eq!(
            desktop.calls(),
            vec![(OsOp::Hide, Handle(1)), (OsOp::Show, Handle(1))]
        );
    }

    #[test]
    fn hide_self_is_rejected_without_os_call_or_mutation() {
        // Arrange
        let desktop = FakeDesktop::new();
        desktop.add(1, SELF);
        let engine = Engine::new(&desktop, SELF);
        let mut store = VisibilityStore::in_memory();

        // Act
        let result = engine.hide(&mut store, &WindowRef::new(Handle(1), SELF), HideOrigin::Manual);

        // Assert
        assert!(matches!(result, Err(VeilError::SelfTarget(_))));
        assert!(desktop.calls().is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn hide_rejects_handle_whose_live_title_is_self() {
        // Arrange
        let desktop = FakeDesktop::new();
        desktop.add(1, SELF);
        let engine = Engine::new(&desktop, SELF);
        let mut store = VisibilityStore::in_memory();

        // Act
        let result = engine.hide(
            &mut store,
            &WindowRef::new(Handle(1), "stale title"),
            HideOrigin::Manual,
        );

        // Assert
        assert!(matches!(result, Err(VeilError::SelfTarget(_))));
        assert!(desktop.calls().is_empty());
    }

    #[test]
    fn show_unknown_title_is_not_found() {
        // Arrange
        let desktop = FakeDesktop::new();
        let engine = Engine::new(&desktop, SELF);
        let mut store = VisibilityStore::in_memory();

        // Act
        let result = engine.show(&mut store, "Notepad");

        // Assert
        assert!(matches!(result, Err(VeilError::NotFound(t)) if t == "Notepad"));
        assert!(desktop.calls().is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn show_dead_handle_is_stale_and_self_heals() {
        // Arrange
        let desktop = FakeDesktop::new();
        let engine = Engine::new(&desktop, SELF);
        let mut store = VisibilityStore::in_memory();
        store
            .record(WindowRef::new(Handle(1), "Notepad"), HideOrigin::Manual)
            .unwrap();

        // Act
        let result = engine.show(&mut store, "Notepad");

        // Assert
        assert!(matches!(result, Err(VeilError::StaleHandle { .. })));
        assert!(!store.contains("Notepad"));
        assert!(desktop.calls().is_empty());
    }

    #[test]
    fn hide_twice_refreshes_entry() {
        // Arrange
        let desktop = FakeDesktop::new();
        desktop.add(1, "Notepad");
        desktop.add(2, "Notepad");
        let engine = Engine::new(&desktop, SELF);
        let mut store = VisibilityStore::in_memory();

        // Act
        engine
            .hide(&mut store, &WindowRef::new(Handle(1), "Notepad"), HideOrigin::Manual)
            .unwrap();
        engine
            .hide(&mut store, &WindowRef::new(Handle(2), "Notepad"), HideOrigin::Manual)
            .unwrap();

        // Assert
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("Notepad").unwrap().window.handle, Handle(2));
    }

    #[test]
    fn failed_os_hide_leaves_store_untouched() {
        // Arrange
        let desktop = FakeDesktop::new();
        desktop.add(1, "Notepad");
        desktop.fail_on(1);
        let engine = Engine::new(&desktop, SELF);
        let mut store = VisibilityStore::in_memory();

        // Act
        let result = engine.hide(
            &mut store,
            &WindowRef::new(Handle(1), "Notepad"),
            HideOrigin::Manual,
        );

        // Assert
        assert!(matches!(result, Err(VeilError::Os(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn show_by_id_targets_exact_entry() {
        // Arrange
        let desktop = FakeDesktop::new();
        desktop.add_hidden(1, "Notepad");
        let engine = Engine::new(&desktop, SELF);
        let mut store = VisibilityStore::in_memory();
        let id = store
            .record(WindowRef::new(Handle(1), "Notepad"), HideOrigin::Manual)
            .unwrap();

        // Act
        let shown = engine.show_id(&mut store, id).unwrap();

        // Assert
        assert_eq!(shown.handle, Handle(1));
        assert!(store.is_empty());
    }

    #[test]
    fn own_window_is_protected_under_any_title() {
        // Arrange
        let desktop = FakeDesktop::new();
        desktop.add(1, "Windows PowerShell");
        let engine = Engine::new(&desktop, SELF).with_own_window(Some(Handle(1)));
        let mut store = VisibilityStore::in_memory();

        // Act
        let result = engine.hide(
            &mut store,
            &WindowRef::new(Handle(1), "Windows PowerShell"),
            HideOrigin::Manual,
        );

        // Assert
        assert!(matches!(result, Err(VeilError::SelfTarget(_))));
        assert!(desktop.calls().is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn unsaved_hide_is_reported_but_still_applied() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let desktop = FakeDesktop::new();
        desktop.add(1, "Notepad");
        let (mut store, _) = VisibilityStore::open(unwritable_file(dir.path()), &desktop);
        let engine = Engine::new(&desktop, SELF);

        // Act
        let result = engine.hide(
            &mut store,
            &WindowRef::new(Handle(1), "Notepad"),
            HideOrigin::Manual,
        );

        // Assert
        assert!(matches!(result, Err(VeilError::Persistence(_))));
        assert!(!desktop.is_visible(Handle(1)));
        assert!(store.contains("Notepad"));
    }
}
