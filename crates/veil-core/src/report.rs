use crate::error::VeilError;
use crate::window::WindowRef;

/// A window that could not be processed in a batch.
#[derive(Debug)]
pub struct WindowFailure {
    pub window: WindowRef,
    pub error: VeilError,
}

/// Per-window outcomes of a batch operation.
///
/// Batches never stop at the first failure; each window lands in exactly
/// one of the three lists.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: Vec<WindowRef>,
    /// Windows deliberately left alone (dead handles on restore).
    pub skipped: Vec<WindowRef>,
    pub failed: Vec<WindowFailure>,
}

impl BatchReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    pub(crate) fn fail(&mut self, window: WindowRef, error: VeilError) {
        crate::log_warn!("{window}: {error}");
        self.failed.push(WindowFailure { window, error });
    }

    /// One-line human summary, e.g. `"3 hidden, 1 failed"`.
    pub fn summary(&self, verb: &str) -> String {
        let mut parts = vec![format!("{} {verb}", self.succeeded.len())];
        if !self.skipped.is_empty() {
            parts.push(format!("{} skipped", self.skipped.len()));
        }
        if !self.failed.is_empty() {
            parts.push(format!("{} failed", self.failed.len()));
        }
        parts.join(", ")
    }
}
