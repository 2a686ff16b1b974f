use veil_core::Handle;

pub fn execute(own_window: Option<usize>) {
    if let Err(e) = veil_windows::daemon::run(own_window.map(Handle)) {
        eprintln!("Daemon error: {e}");
        std::process::exit(1);
    }
}
