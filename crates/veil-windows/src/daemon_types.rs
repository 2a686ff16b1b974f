use std::sync::mpsc;

use veil_core::ipc::{Command, Response};

/// Work items for the daemon's main thread, processed strictly in order.
pub(super) enum DaemonMsg {
    /// Poll interval elapsed: run a scan.
    Tick,
    /// The toggle hotkey was pressed.
    Toggle,
    /// A CLI command with a channel for the response.
    Command(Command, mpsc::Sender<Response>),
}
