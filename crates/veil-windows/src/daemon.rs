use veil_core::{Handle, WindowResult, pid};

#[path = "daemon_handlers.rs"]
mod daemon_handlers;
#[path = "daemon_ipc.rs"]
mod daemon_ipc;
#[path = "daemon_loop.rs"]
mod daemon_loop;
#[path = "daemon_threads.rs"]
mod daemon_threads;
#[path = "daemon_types.rs"]
mod daemon_types;

/// Runs the Veil daemon until a `Stop` command arrives.
///
/// Background threads deliver poll ticks, hotkey presses and CLI
/// commands; the main thread owns all window state. `own_window` is the
/// terminal that launched the daemon, protected from every hide.
pub fn run(own_window: Option<Handle>) -> WindowResult<()> {
    pid::write_pid_file()?;
    eprintln!("Veil daemon started.");

    let result = daemon_loop::daemon_loop(own_window);

    let _ = pid::remove_pid_file();

    result
}
