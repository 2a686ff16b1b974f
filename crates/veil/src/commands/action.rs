use veil_core::Command;
use veil_core::ipc::{Response, ResponseStatus};

/// Sends `command` to the running daemon and prints its reply.
pub fn execute(command: Command) {
    let response = send(&command);
    if let Some(msg) = response.message {
        println!("{msg}");
    }
}

/// Sends `command`, exiting the process on any failure.
pub fn send(command: &Command) -> Response {
    if !veil_windows::ipc::is_daemon_running() {
        eprintln!("Veil is not running. Start it with 'veil start'.");
        std::process::exit(1);
    }

    match veil_windows::ipc::send_command(command) {
        Ok(response) if response.status == ResponseStatus::Ok => response,
        Ok(response) => {
            eprintln!(
                "Error: {}",
                response.message.unwrap_or("unknown error".into())
            );
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Failed to reach the daemon: {e}");
            std::process::exit(1);
        }
    }
}
