//! The single owner of all mutable window-visibility state.
//!
//! One `WindowManagerState` exists per running instance. The daemon's
//! main thread owns it and feeds it poll ticks, hotkey presses and user
//! commands one at a time, so every store operation is atomic without a
//! lock.

use crate::config::Config;
use crate::desktop::Desktop;
use crate::detect::{AutoHidePolicy, ScanReport};
use crate::engine::Engine;
use crate::error::VeilError;
use crate::report::BatchReport;
use crate::store::{EntryStatus, HiddenEntry, HiddenId, HideOrigin, VisibilityStore};
use crate::toggle::{ToggleController, ToggleOutcome, ToggleState};
use crate::window::{Handle, WindowRef};

pub struct WindowManagerState<D: Desktop> {
    desktop: D,
    self_title: String,
    store: VisibilityStore,
    policy: AutoHidePolicy,
    toggle: ToggleController,
    windows: Vec<WindowRef>,
    own_window: Option<Handle>,
}

impl<D: Desktop> WindowManagerState<D> {
    pub fn new(desktop: D, store: VisibilityStore, config: &Config) -> Self {
        Self {
            desktop,
            self_title: config.self_title.clone(),
            store,
            policy: AutoHidePolicy::new(config.scan.targets.clone()),
            toggle: ToggleController::new(config.toggle.exclude.clone()),
            windows: Vec::new(),
            own_window: None,
        }
    }

    pub fn desktop(&self) -> &D {
        &self.desktop
    }

    pub fn store(&self) -> &VisibilityStore {
        &self.store
    }

    /// Protects `handle` (the terminal that launched us) from every hide.
    pub fn set_own_window(&mut self, handle: Option<Handle>) {
        self.own_window = handle;
    }

    pub fn toggle_state(&self) -> ToggleState {
        self.toggle.state()
    }

    /// The windows seen by the most recent enumeration.
    pub fn visible_windows(&self) -> &[WindowRef] {
        &self.windows
    }

    /// Re-enumerates visible windows.
    pub fn refresh(&mut self) -> &[WindowRef] {
        self.windows = self.desktop.visible_windows();
        crate::log_debug!("Enumerated {} visible windows", self.windows.len());
        &self.windows
    }

    /// One background cycle: enumerate, then detect-new and reap-dead.
    pub fn tick(&mut self) -> ScanReport {
        self.refresh();
        let engine = Engine::new(&self.desktop, &self.self_title).with_own_window(self.own_window);
        let report = self.policy.scan(&self.windows, &engine, &mut self.store);
        if !report.is_quiet() {
            crate::log_info!(
                "Scan: {} auto-hidden, {} failed, {} reaped",
                report.hidden.len(),
                report.failed.len(),
                report.reaped.len()
            );
        }
        report
    }

    /// Hides the first visible window titled `title`.
    pub fn hide_title(&mut self, title: &str) -> Result<HiddenId, VeilError> {
        if title == self.self_title {
            return Err(VeilError::SelfTarget(title.to_string()));
        }
        self.refresh();
        let window = self
            .windows
            .iter()
            .find(|w| w.title == title)
            .cloned()
            .ok_or_else(|| VeilError::NoSuchWindow(title.to_string()))?;

        let engine = Engine::new(&self.desktop, &self.self_title).with_own_window(self.own_window);
        engine.hide(&mut self.store, &window, HideOrigin::Manual)
    }

    /// Shows the hidden window titled `title`.
    pub fn show_title(&mut self, title: &str) -> Result<WindowRef, VeilError> {
        let engine = Engine::new(&self.desktop, &self.self_title).with_own_window(self.own_window);
        engine.show(&mut self.store, title)
    }

    /// Shows the hidden entry `id`, as listed by `veil hidden`.
    pub fn show_id(&mut self, id: HiddenId) -> Result<WindowRef, VeilError> {
        let engine = Engine::new(&self.desktop, &self.self_title).with_own_window(self.own_window);
        engine.show_id(&mut self.store, id)
    }

    /// Runs the bulk toggle, as a hotkey press would.
    pub fn toggle(&mut self) -> ToggleOutcome {
        let engine = Engine::new(&self.desktop, &self.self_title).with_own_window(self.own_window);
        self.toggle.trigger(&engine)
    }

    /// The hidden set with the current OS status of each entry.
    pub fn hidden(&self) -> Vec<(HiddenEntry, EntryStatus)> {
        self.store
            .snapshot()
            .into_iter()
            .map(|entry| {
                let status = entry.status(&self.desktop);
                (entry, status)
            })
            .collect()
    }

    /// Restores anything still bulk-hidden by the toggle.
    ///
    /// The hidden set is left alone: it is persisted and picked up by
    /// the next run.
    pub fn shutdown(&mut self) -> Option<BatchReport> {
        let engine = Engine::new(&self.desktop, &self.self_title).with_own_window(self.own_window);
        self.toggle.restore_pending(&engine)
    }

    /// One-line status for `veil status`.
    pub fn status_line(&self) -> String {
        format!(
            "{} hidden, toggle {}, {} auto-hide target(s)",
            self.store.len(),
            self.toggle.state(),
            self.policy.targets().len()
        )
    }
}
