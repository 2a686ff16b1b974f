use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use super::daemon_ipc;
use super::daemon_types::DaemonMsg;

/// Granularity at which the poll thread notices a stop request.
const STOP_CHECK: Duration = Duration::from_millis(200);

/// Bridges hotkey presses into the daemon message channel.
pub(super) fn spawn_toggle_bridge(
    toggle_rx: mpsc::Receiver<()>,
    tx: mpsc::Sender<DaemonMsg>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        for () in toggle_rx {
            if tx.send(DaemonMsg::Toggle).is_err() {
                break;
            }
        }
    })
}

/// Spawns the IPC listener thread.
pub(super) fn spawn_ipc_listener(tx: mpsc::Sender<DaemonMsg>) -> thread::JoinHandle<()> {
    thread::spawn(move || daemon_ipc::ipc_loop(tx))
}

/// Sends `Tick` every `interval` until `stop` is set.
pub(super) fn spawn_poll_thread(
    tx: mpsc::Sender<DaemonMsg>,
    stop: Arc<AtomicBool>,
    interval: Duration,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut next = Instant::now() + interval;
        while !stop.load(Ordering::Relaxed) {
            thread::sleep(STOP_CHECK.min(next.saturating_duration_since(Instant::now())));
            if Instant::now() < next {
                continue;
            }
            next = Instant::now() + interval;
            if tx.send(DaemonMsg::Tick).is_err() {
                break;
            }
        }
    })
}
