//! Periodic auto-hide scan.
//!
//! Each cycle runs two passes in a fixed order: detect-new hides every
//! enumerated window whose title is on the target list and not yet
//! hidden, then reap-dead drops hidden entries whose handles have died.
//! A user closing a hidden window is a normal outcome, so reaping is
//! never reported as a failure.

use crate::desktop::Desktop;
use crate::engine::Engine;
use crate::error::VeilError;
use crate::store::{HiddenEntry, HideOrigin, VisibilityStore};
use crate::window::WindowRef;

/// Exact-title matching criteria for auto-hide.
#[derive(Debug, Clone, Default)]
pub struct AutoHidePolicy {
    targets: Vec<String>,
}

/// Outcome of one scan cycle.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub hidden: Vec<WindowRef>,
    pub failed: Vec<crate::report::WindowFailure>,
    pub reaped: Vec<HiddenEntry>,
}

impl ScanReport {
    pub fn is_quiet(&self) -> bool {
        self.hidden.is_empty() && self.failed.is_empty() && self.reaped.is_empty()
    }
}

impl AutoHidePolicy {
    pub fn new(targets: Vec<String>) -> Self {
        Self { targets }
    }

    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    pub fn matches(&self, title: &str) -> bool {
        self.targets.iter().any(|t| t == title)
    }

    /// Runs detect-new over `windows`, then reap-dead over `store`.
    pub fn scan<D: Desktop>(
        &self,
        windows: &[WindowRef],
        engine: &Engine<'_, D>,
        store: &mut VisibilityStore,
    ) -> ScanReport {
        let mut report = ScanReport::default();
        self.detect_new(windows, engine, store, &mut report);
        reap_dead(engine.desktop(), store, &mut report);
        report
    }

    fn detect_new<D: Desktop>(
        &self,
        windows: &[WindowRef],
        engine: &Engine<'_, D>,
        store: &mut VisibilityStore,
        report: &mut ScanReport,
    ) {
        for window in windows {
            if !self.matches(&window.title)
                || store.contains(&window.title)
                || engine.is_self(window)
            {
                continue;
            }

            match engine.hide(store, window, HideOrigin::Auto) {
                Ok(_) => report.hidden.push(window.clone()),
                Err(VeilError::Persistence(e)) => {
                    // Hidden and recorded in memory; only the save failed.
                    crate::log_error!("Auto-hid {window} but could not save the hidden set: {e}");
                    report.hidden.push(window.clone());
                }
                Err(error) => {
                    crate::log_warn!("Auto-hide of {window} failed: {error}");
                    report.failed.push(crate::report::WindowFailure {
                        window: window.clone(),
                        error,
                    });
                }
            }
        }
    }
}

/// Drops every hidden entry whose handle is no longer live.
///
/// Repeated passes are idempotent: an entry is removed at most once.
pub fn reap_dead<D: Desktop>(desktop: &D, store: &mut VisibilityStore, report: &mut ScanReport) {
    for entry in store.snapshot() {
        if desktop.is_live(entry.window.handle) {
            continue;
        }
        match store.forget_id(entry.id) {
            Ok(Some(removed)) => {
                crate::log_info!("Hidden window {} closed, removed {}", removed.window, removed.id);
                report.reaped.push(removed);
            }
            Ok(None) => {}
            Err(e) => {
                // The in-memory removal already happened.
                crate::log_error!("Failed to persist removal of {}: {e}", entry.id);
                report.reaped.push(entry);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OsOp;
    use crate::testing::{FakeDesktop, unwritable_file};
    use crate::window::Handle;

    const SELF: &str = "Manager";

    #[test]
    fn scan_hides_only_target_titles() {
        // Arrange
        let desktop = FakeDesktop::new();
        desktop.add(1, "Notepad");
        desktop.add(2, "Calculator");
        let engine = Engine::new(&desktop, SELF);
        let policy = AutoHidePolicy::new(vec!["Notepad".into()]);
        let mut store = VisibilityStore::in_memory();
        let windows = desktop.visible_windows();

        // Act
        let report = policy.scan(&windows, &engine, &mut store);

        // Assert
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("Notepad").unwrap().window.handle, Handle(1));
        assert_eq!(store.get("Notepad").unwrap().origin, HideOrigin::Auto);
        assert_eq!(desktop.calls(), vec![(OsOp::Hide, Handle(1))]);
        assert_eq!(report.hidden.len(), 1);
    }

    #[test]
    fn scan_skips_titles_already_hidden() {
        // Arrange
        let desktop = FakeDesktop::new();
        desktop.add(1, "Notepad");
        let engine = Engine::new(&desktop, SELF);
        let policy = AutoHidePolicy::new(vec!["Notepad".into()]);
        let mut store = VisibilityStore::in_memory();
        store
            .record(WindowRef::new(Handle(9), "Notepad"), HideOrigin::Manual)
            .unwrap();
        desktop.add_hidden(9, "Notepad");
        let windows = desktop.visible_windows();

        // Act
        let report = policy.scan(&windows, &engine, &mut store);

        // Assert
        assert!(report.hidden.is_empty());
        assert!(desktop.calls().is_empty());
    }

    #[test]
    fn scan_never_hides_self_even_if_targeted() {
        // Arrange
        let desktop = FakeDesktop::new();
        desktop.add(1, SELF);
        let engine = Engine::new(&desktop, SELF);
        let policy = AutoHidePolicy::new(vec![SELF.into()]);
        let mut store = VisibilityStore::in_memory();
        let windows = desktop.visible_windows();

        // Act
        let report = policy.scan(&windows, &engine, &mut store);

        // Assert
        assert!(report.is_quiet());
        assert!(desktop.calls().is_empty());
    }

    #[test]
    fn failure_on_one_window_does_not_stop_the_scan() {
        // Arrange
        let desktop = FakeDesktop::new();
        desktop.add(1, "Notepad");
        desktop.add(2, "Calculator");
        desktop.fail_on(1);
        let engine = Engine::new(&desktop, SELF);
        let policy = AutoHidePolicy::new(vec!["Notepad".into(), "Calculator".into()]);
        let mut store = VisibilityStore::in_memory();
        let windows = desktop.visible_windows();

        // Act
        let report = policy.scan(&windows, &engine, &mut store);

        // Assert
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].window.handle, Handle(1));
        assert_eq!(report.hidden.len(), 1);
        assert!(store.contains("Calculator"));
        assert!(!store.contains("Notepad"));
    }

    #[test]
    fn reap_removes_dead_entry_exactly_once() {
        // Arrange
        let desktop = FakeDesktop::new();
        desktop.add(1, "Notepad");
        let engine = Engine::new(&desktop, SELF);
        let policy = AutoHidePolicy::new(vec!["Notepad".into()]);
        let mut store = VisibilityStore::in_memory();
        policy.scan(&desktop.visible_windows(), &engine, &mut store);
        desktop.close(1);

        // Act
        let first = policy.scan(&desktop.visible_windows(), &engine, &mut store);
        let second = policy.scan(&desktop.visible_windows(), &engine, &mut store);

        // Assert
        assert_eq!(first.reaped.len(), 1);
        assert!(first.failed.is_empty());
        assert!(second.reaped.is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn reap_keeps_live_hidden_entries() {
        // Arrange
        let desktop = FakeDesktop::new();
        desktop.add_hidden(1, "Notepad");
        let mut store = VisibilityStore::in_memory();
        store
            .record(WindowRef::new(Handle(1), "Notepad"), HideOrigin::Manual)
            .unwrap();
        let mut report = ScanReport::default();

        // Act
        reap_dead(&desktop, &mut store, &mut report);

        // Assert
        assert!(report.reaped.is_empty());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn unsaved_auto_hide_still_counts_as_hidden() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let desktop = FakeDesktop::new();
        desktop.add(1, "Notepad");
        let engine = Engine::new(&desktop, SELF);
        let policy = AutoHidePolicy::new(vec!["Notepad".into()]);
        let (mut store, _) = VisibilityStore::open(unwritable_file(dir.path()), &desktop);
        let windows = desktop.visible_windows();

        // Act
        let report = policy.scan(&windows, &engine, &mut store);

        // Assert
        assert_eq!(report.hidden, vec![WindowRef::new(Handle(1), "Notepad")]);
        assert!(report.failed.is_empty());
        assert!(store.contains("Notepad"));
    }
}
