use windows::Win32::Foundation::{CloseHandle, HANDLE};
use windows::Win32::System::Threading::{
    OpenProcess, PROCESS_ACCESS_RIGHTS, PROCESS_QUERY_LIMITED_INFORMATION, PROCESS_TERMINATE,
    TerminateProcess,
};

/// Opens `pid` with `access`, runs `f` on the handle, and closes it.
///
/// Returns `None` if the process cannot be opened (it does not exist or
/// we lack the rights).
fn with_process<T>(pid: u32, access: PROCESS_ACCESS_RIGHTS, f: impl FnOnce(HANDLE) -> T) -> Option<T> {
    // SAFETY: OpenProcess attempts to open an existing process.
    let handle = unsafe { OpenProcess(access, false, pid) }.ok()?;
    let result = f(handle);
    // SAFETY: we own the handle opened above.
    unsafe {
        let _ = CloseHandle(handle);
    }
    Some(result)
}

/// Checks whether a process with the given PID is still alive.
///
/// Used to detect stale PID files left behind when the daemon is
/// killed without a clean shutdown.
pub fn is_process_alive(pid: u32) -> bool {
    with_process(pid, PROCESS_QUERY_LIMITED_INFORMATION, |_| ()).is_some()
}

/// Forcibly terminates `pid`. Returns `true` on success.
pub fn kill_process(pid: u32) -> bool {
    // SAFETY: TerminateProcess on a handle opened with PROCESS_TERMINATE.
    with_process(pid, PROCESS_TERMINATE, |handle| unsafe {
        TerminateProcess(handle, 1).is_ok()
    })
    .unwrap_or(false)
}
