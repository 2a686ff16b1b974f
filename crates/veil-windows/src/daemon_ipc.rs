use std::sync::mpsc;

use veil_core::ipc::Command;
use veil_core::log_error;

use crate::ipc::PipeServer;

use super::daemon_types::DaemonMsg;

/// Serves CLI connections one at a time, forwarding each command to the
/// main thread and relaying its response. Returns after `Stop`.
pub(super) fn ipc_loop(tx: mpsc::Sender<DaemonMsg>) {
    loop {
        let server = match PipeServer::create() {
            Ok(s) => s,
            Err(e) => {
                log_error!("IPC disabled: {e}");
                return;
            }
        };

        let command = match server.accept() {
            Ok(cmd) => cmd,
            Err(e) => {
                log_error!("Bad IPC request: {e}");
                continue;
            }
        };

        let is_stop = matches!(command, Command::Stop);
        let (reply_tx, reply_rx) = mpsc::channel();

        if tx.send(DaemonMsg::Command(command, reply_tx)).is_err() {
            return;
        }

        if let Ok(response) = reply_rx.recv()
            && let Err(e) = server.reply(&response)
        {
            log_error!("Failed to send IPC response: {e}");
        }

        if is_stop {
            return;
        }
    }
}
