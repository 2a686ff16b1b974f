use std::os::windows::process::CommandExt;
use std::process::{Command, Stdio};

use veil_core::config::Config;

/// `CREATE_NO_WINDOW | CREATE_NEW_PROCESS_GROUP`: no console, and Ctrl+C
/// in the launching terminal does not reach the daemon.
const DETACH_FLAGS: u32 = 0x08000000 | 0x00000200;

pub fn execute() {
    if veil_windows::ipc::is_daemon_running() {
        println!("Veil is already running.");
        return;
    }

    if let Ok(Some(pid)) = veil_core::pid::read_pid_file() {
        if veil_windows::process::is_process_alive(pid) {
            println!("Veil process exists (PID: {pid}) but is not responding.");
            return;
        }
        let _ = veil_core::pid::remove_pid_file();
    }

    let exe = match std::env::current_exe() {
        Ok(exe) => exe,
        Err(e) => {
            eprintln!("Error: could not locate the veil executable: {e}");
            std::process::exit(1);
        }
    };

    let config = veil_core::config::load();
    let mut daemon = Command::new(exe);
    daemon.arg("daemon");
    if let Some(handle) = veil_windows::identity::claim_foreground(&config.self_title) {
        daemon.arg("--own-window").arg(handle.0.to_string());
    }

    let spawned = daemon
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .creation_flags(DETACH_FLAGS)
        .spawn();

    match spawned {
        Ok(mut child) => {
            let pid = child.id();
            let _ = child.try_wait();
            print_banner(pid, &config);
        }
        Err(e) => {
            eprintln!("Error: failed to start daemon: {e}");
            std::process::exit(1);
        }
    }
}

fn print_banner(pid: u32, config: &Config) {
    let d = "\x1b[90m"; // labels
    let w = "\x1b[1;97m"; // values
    let r = "\x1b[0m";

    println!();
    println!("  {w}veil{r} {d}v{}{r}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("  {d}Config{r}   ~/.config/veil/config.toml");
    println!("  {d}Daemon{r}   Started (PID: {w}{pid}{r})");
    println!("  {d}Hotkey{r}   {w}{}{r} toggles all windows", config.hotkey);
    println!();
}
