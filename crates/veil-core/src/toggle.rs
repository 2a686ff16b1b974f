//! Global "hide all / restore all" state machine bound to the hotkey.
//!
//! `AllVisible --trigger--> AllHidden` hides every visible window except
//! this process's own and the excluded titles, capturing what it hid.
//! `AllHidden --trigger--> AllVisible` shows every captured window that
//! is still live and discards the capture.
//!
//! The state lives only in memory: a fresh process always starts in
//! `AllVisible`, whatever the desktop actually looks like.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::desktop::Desktop;
use crate::engine::Engine;
use crate::report::BatchReport;
use crate::window::WindowRef;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleState {
    #[default]
    AllVisible,
    AllHidden,
}

impl fmt::Display for ToggleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllVisible => f.write_str("all visible"),
            Self::AllHidden => f.write_str("all hidden"),
        }
    }
}

/// Result of one toggle trigger.
#[derive(Debug)]
pub struct ToggleOutcome {
    /// The state after the transition.
    pub state: ToggleState,
    pub report: BatchReport,
}

#[derive(Debug, Default)]
pub struct ToggleController {
    state: ToggleState,
    snapshot: Vec<WindowRef>,
    exclude: Vec<String>,
}

impl ToggleController {
    /// Creates a controller in `AllVisible` that never hides `exclude`d titles.
    pub fn new(exclude: Vec<String>) -> Self {
        Self {
            exclude,
            ..Self::default()
        }
    }

    pub fn state(&self) -> ToggleState {
        self.state
    }

    /// Windows hidden by the last hide-all, empty while `AllVisible`.
    pub fn snapshot(&self) -> &[WindowRef] {
        &self.snapshot
    }

    /// Runs the transition out of the current state.
    pub fn trigger<D: Desktop>(&mut self, engine: &Engine<'_, D>) -> ToggleOutcome {
        let report = match self.state {
            ToggleState::AllVisible => {
                let (hidden, report) = hide_all(engine, &self.exclude);
                self.snapshot = hidden;
                self.state = ToggleState::AllHidden;
                report
            }
            ToggleState::AllHidden => {
                let snapshot = std::mem::take(&mut self.snapshot);
                self.state = ToggleState::AllVisible;
                restore_all(engine, &snapshot, false)
            }
        };

        crate::log_info!(
            "Toggle -> {}: {}",
            self.state,
            report.summary(match self.state {
                ToggleState::AllHidden => "hidden",
                ToggleState::AllVisible => "restored",
            })
        );

        ToggleOutcome {
            state: self.state,
            report,
        }
    }

    /// Restores a pending bulk hide, if any. Used on shutdown so
    /// bulk-hidden windows are never left behind.
    pub fn restore_pending<D: Desktop>(&mut self, engine: &Engine<'_, D>) -> Option<BatchReport> {
        match self.state {
            ToggleState::AllVisible => None,
            ToggleState::AllHidden => Some(self.trigger(engine).report),
        }
    }
}

/// Hides every visible window except self and `exclude`d titles.
///
/// Returns the windows actually hidden, in enumeration order.
pub fn hide_all<D: Desktop>(
    engine: &Engine<'_, D>,
    exclude: &[String],
) -> (Vec<WindowRef>, BatchReport) {
    let mut report = BatchReport::default();

    for window in engine.desktop().visible_windows() {
        if engine.is_self(&window) {
            continue;
        }
        if exclude.iter().any(|t| *t == window.title) {
            report.skipped.push(window);
            continue;
        }
        match engine.conceal(&window) {
            Ok(()) => report.succeeded.push(window),
            Err(e) => report.fail(window, e),
        }
    }

    (report.succeeded.clone(), report)
}

/// Shows every window in `windows` that is still live.
///
/// With `require_title_match`, a live handle whose current title differs
/// from the recorded one is also skipped: after a restart that handle
/// most likely belongs to a different window.
pub fn restore_all<D: Desktop>(
    engine: &Engine<'_, D>,
    windows: &[WindowRef],
    require_title_match: bool,
) -> BatchReport {
    let desktop = engine.desktop();
    let mut report = BatchReport::default();

    for window in windows {
        if !desktop.is_live(window.handle) {
            crate::log_info!("{window} closed while hidden, skipping");
            report.skipped.push(window.clone());
            continue;
        }
        if require_title_match
            && desktop.title(window.handle).as_deref() != Some(window.title.as_str())
        {
            crate::log_info!("{window} handle now names another window, skipping");
            report.skipped.push(window.clone());
            continue;
        }
        match engine.reveal(window) {
            Ok(()) => report.succeeded.push(window.clone()),
            Err(e) => report.fail(window.clone(), e),
        }
    }

    report
}
