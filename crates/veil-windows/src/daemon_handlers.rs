use veil_core::ipc::{Command, Response, WindowInfo};
use veil_core::report::BatchReport;
use veil_core::toggle::ToggleState;
use veil_core::{Desktop, VeilError, WindowManagerState, log_debug};

use crate::event_loop::EventLoopHandle;

pub(super) fn handle_tick<D: Desktop>(state: &mut WindowManagerState<D>) {
    state.tick();
}

pub(super) fn handle_toggle<D: Desktop>(state: &mut WindowManagerState<D>) {
    state.toggle();
}

/// Executes one CLI command against the daemon state.
pub(super) fn handle_command<D: Desktop>(
    command: &Command,
    state: &mut WindowManagerState<D>,
    hotkeys: &mut EventLoopHandle,
) -> Response {
    log_debug!("IPC command: {command:?}");
    match command {
        Command::Stop => match state.shutdown() {
            Some(report) => Response::ok_with_message(describe(&report, "restored")),
            None => Response::ok(),
        },
        Command::Status => {
            let hotkey = hotkeys
                .current_hotkey()
                .map_or_else(|| "unbound".to_string(), ToString::to_string);
            Response::ok_with_message(format!("{}, hotkey {hotkey}", state.status_line()))
        }
        Command::Hide { title } => match state.hide_title(title) {
            Ok(id) => Response::ok_with_message(format!("Hid {title:?} as {id}")),
            Err(e) => error_response(e),
        },
        Command::Show { title } => match state.show_title(title) {
            Ok(window) => Response::ok_with_message(format!("Showed {window}")),
            Err(e) => error_response(e),
        },
        Command::ShowId { id } => match state.show_id(*id) {
            Ok(window) => Response::ok_with_message(format!("Showed {window}")),
            Err(e) => error_response(e),
        },
        Command::Toggle => {
            let outcome = state.toggle();
            let verb = match outcome.state {
                ToggleState::AllHidden => "hidden",
                ToggleState::AllVisible => "restored",
            };
            Response::ok_with_message(describe(&outcome.report, verb))
        }
        Command::Scan => {
            let report = state.tick();
            let mut message = format!(
                "{} auto-hidden, {} reaped",
                report.hidden.len(),
                report.reaped.len()
            );
            for failure in &report.failed {
                message.push_str(&format!("\n  {}: {}", failure.window, failure.error));
            }
            Response::ok_with_message(message)
        }
        Command::Windows => {
            let windows = state.refresh().iter().map(WindowInfo::from).collect();
            Response::with_windows(windows)
        }
        Command::Hidden => {
            let windows = state
                .hidden()
                .iter()
                .map(|(entry, status)| WindowInfo::hidden(entry, *status))
                .collect();
            Response::with_windows(windows)
        }
        Command::SetHotkey { hotkey } => match hotkeys.rebind(hotkey) {
            Ok(bound) => Response::ok_with_message(format!("Toggle hotkey is now {bound}")),
            Err(e) => error_response(e),
        },
    }
}

/// A stale handle on show is news, not a failure.
fn error_response(error: VeilError) -> Response {
    if error.is_informational() {
        Response::ok_with_message(error.to_string())
    } else {
        Response::error(error.to_string())
    }
}

/// Summary line followed by one line per failed window.
fn describe(report: &BatchReport, verb: &str) -> String {
    let mut message = report.summary(verb);
    for failure in &report.failed {
        message.push_str(&format!("\n  {}: {}", failure.window, failure.error));
    }
    message
}
