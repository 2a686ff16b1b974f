use veil_core::ipc::ResponseStatus;

pub fn execute() {
    if veil_windows::ipc::is_daemon_running() {
        match veil_windows::ipc::send_command(&veil_core::Command::Status) {
            Ok(response) if response.status == ResponseStatus::Ok => {
                println!("Veil is running.");
                if let Some(msg) = response.message {
                    println!("{msg}");
                }
            }
            _ => println!("Veil is running."),
        }
        return;
    }

    // A PID file without a pipe means an unclean shutdown.
    if let Ok(Some(pid)) = veil_core::pid::read_pid_file() {
        if veil_windows::process::is_process_alive(pid) {
            println!("Veil process exists (PID: {pid}) but is not responding.");
        } else {
            let _ = veil_core::pid::remove_pid_file();
            println!("Veil is not running (cleaned up stale PID file).");
        }
    } else {
        println!("Veil is not running.");
    }
}
