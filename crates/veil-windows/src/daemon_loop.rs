use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::time::Duration;

use veil_core::config::{self, template};
use veil_core::ipc::Command;
use veil_core::state_file::{self, StateFile};
use veil_core::{Handle, VisibilityStore, WindowManagerState, WindowResult, log_info, log_warn};

use crate::desktop::Win32Desktop;
use crate::event_loop;

use super::daemon_handlers;
use super::daemon_threads;
use super::daemon_types::DaemonMsg;

/// The inner daemon loop, separated so cleanup always runs in `run()`.
pub(super) fn daemon_loop(own_window: Option<Handle>) -> WindowResult<()> {
    let config_path = config::config_path().ok_or("could not determine the config directory")?;
    if !config_path.exists() {
        if let Some(dir) = config_path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&config_path, template::generate_config())?;
    }

    let config = config::load_from(&config_path);
    veil_core::log::init(&config.logging);

    log_info!("Daemon started (PID: {})", std::process::id());
    log_info!(
        "Config: hotkey={}, scan every {}s, {} target(s), {} excluded",
        config.hotkey,
        config.scan.interval_secs,
        config.scan.targets.len(),
        config.toggle.exclude.len()
    );

    let desktop = Win32Desktop;
    let hidden_path =
        state_file::hidden_path().ok_or("could not determine the local data directory")?;
    let (store, warning) = VisibilityStore::open(StateFile::new(hidden_path), &desktop);
    if let Some(e) = warning {
        log_warn!("{e}");
        eprintln!("Warning: {e}");
    }
    log_info!("Restored {} hidden window(s) from the last run", store.len());

    let mut state = WindowManagerState::new(desktop, store, &config);
    match own_window {
        Some(handle) => log_info!("Protecting launching window {handle}"),
        None => log_info!("No launching window to protect"),
    }
    state.set_own_window(own_window);

    let (tx, rx) = mpsc::channel::<DaemonMsg>();

    // Hotkey presses arrive on the pump thread and are bridged in.
    let (toggle_tx, toggle_rx) = mpsc::channel();
    let mut event_loop = event_loop::start(toggle_tx, config.parsed_hotkey()?, config_path)?;
    let toggle_bridge = daemon_threads::spawn_toggle_bridge(toggle_rx, tx.clone());

    let ipc_thread = daemon_threads::spawn_ipc_listener(tx.clone());

    let stop = Arc::new(AtomicBool::new(false));
    let poll_thread = daemon_threads::spawn_poll_thread(
        tx.clone(),
        stop.clone(),
        Duration::from_secs(config.scan.interval_secs),
    );

    daemon_handlers::handle_tick(&mut state);

    while let Ok(msg) = rx.recv() {
        match msg {
            DaemonMsg::Tick => daemon_handlers::handle_tick(&mut state),
            DaemonMsg::Toggle => daemon_handlers::handle_toggle(&mut state),
            DaemonMsg::Command(command, reply_tx) => {
                let response =
                    daemon_handlers::handle_command(&command, &mut state, &mut event_loop);
                let _ = reply_tx.send(response);
                if matches!(command, Command::Stop) {
                    break;
                }
            }
        }
    }

    if let Some(report) = state.shutdown() {
        log_info!("Shutdown: {}", report.summary("restored"));
    }
    event_loop.stop();
    stop.store(true, Ordering::Relaxed);
    drop(tx);
    let _ = toggle_bridge.join();
    let _ = poll_thread.join();
    let _ = ipc_thread.join();

    log_info!("Daemon stopped");
    Ok(())
}
