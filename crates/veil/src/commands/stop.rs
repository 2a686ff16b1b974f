use veil_core::ipc::ResponseStatus;

pub fn execute() {
    if veil_windows::ipc::is_daemon_running() {
        match veil_windows::ipc::send_command(&veil_core::Command::Stop) {
            Ok(response) if response.status == ResponseStatus::Ok => {
                println!("Veil stopped.");
                if let Some(msg) = response.message {
                    println!("{msg}");
                }
                let _ = veil_core::pid::remove_pid_file();
                return;
            }
            Ok(response) => {
                eprintln!(
                    "Error: {}",
                    response.message.unwrap_or("unknown error".into())
                );
                return;
            }
            Err(e) => eprintln!("IPC failed: {e}"),
        }
    }

    // The pipe is gone but the process may still be alive.
    match veil_core::pid::read_pid_file() {
        Ok(Some(pid)) if veil_windows::process::is_process_alive(pid) => {
            if veil_windows::process::kill_process(pid) {
                let _ = veil_core::pid::remove_pid_file();
                println!("Veil stopped (killed PID {pid}).");
            } else {
                eprintln!("Failed to kill process {pid}.");
                std::process::exit(1);
            }
        }
        _ => println!("Veil is not running."),
    }
}
