//! One-shot restart-resume: the first run hides everything and writes a
//! snapshot, the next run restores from it and deletes it. Windows that
//! fail to show stay in the snapshot for another attempt.
//!
//! Window handles are not guaranteed to survive the gap between runs, so
//! restore only acts on records whose handle is live and still carries
//! the recorded title.

use crate::desktop::Desktop;
use crate::engine::Engine;
use crate::error::VeilError;
use crate::report::BatchReport;
use crate::state_file::StateFile;
use crate::store::{HiddenEntry, HiddenId, HideOrigin};
use crate::toggle;

#[derive(Debug)]
pub enum ResumeOutcome {
    /// No snapshot existed: every eligible window was hidden and saved.
    Hidden(BatchReport),
    /// A snapshot existed: its windows were restored. The snapshot is
    /// deleted, or trimmed to the windows that failed to show.
    Restored(BatchReport),
}

/// Hides or restores depending on whether `file` exists.
pub fn run<D: Desktop>(
    engine: &Engine<'_, D>,
    file: &StateFile,
    exclude: &[String],
) -> Result<ResumeOutcome, VeilError> {
    match file.load()? {
        Some(records) => restore(engine, file, records),
        None => hide(engine, file, exclude),
    }
}

fn hide<D: Desktop>(
    engine: &Engine<'_, D>,
    file: &StateFile,
    exclude: &[String],
) -> Result<ResumeOutcome, VeilError> {
    let (hidden, report) = toggle::hide_all(engine, exclude);

    let records: Vec<HiddenEntry> = hidden
        .iter()
        .zip(1..)
        .map(|(window, id)| HiddenEntry {
            id: HiddenId(id),
            window: window.clone(),
            origin: HideOrigin::Manual,
        })
        .collect();

    // The snapshot is written whole or not at all; without it nothing
    // could bring these windows back, so undo the hide on failure.
    if let Err(e) = file.save(&records) {
        crate::log_error!("Failed to save resume snapshot, restoring windows: {e}");
        toggle::restore_all(engine, &hidden, false);
        return Err(e.into());
    }

    crate::log_info!("Resume: {}", report.summary("hidden"));
    Ok(ResumeOutcome::Hidden(report))
}

fn restore<D: Desktop>(
    engine: &Engine<'_, D>,
    file: &StateFile,
    records: Vec<HiddenEntry>,
) -> Result<ResumeOutcome, VeilError> {
    let windows: Vec<_> = records.iter().map(|e| e.window.clone()).collect();
    let report = toggle::restore_all(engine, &windows, true);

    // Windows that failed to show are still hidden; keep them on file so
    // the next run can retry. Saving an empty list deletes the file.
    let still_hidden: Vec<HiddenEntry> = records
        .into_iter()
        .filter(|e| report.failed.iter().any(|f| f.window == e.window))
        .collect();
    file.save(&still_hidden)?;

    crate::log_info!("Resume: {}", report.summary("restored"));
    Ok(ResumeOutcome::Restored(report))
}
