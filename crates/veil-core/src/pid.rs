use std::fs;
use std::path::PathBuf;

use crate::WindowResult;
use crate::state_file::data_dir;

/// Returns the path to the PID file: `%LOCALAPPDATA%\veil\veil.pid`.
///
/// Creates the data directory if it doesn't exist.
pub fn pid_path() -> WindowResult<PathBuf> {
    let dir = data_dir().ok_or("could not determine the local data directory")?;
    fs::create_dir_all(&dir)?;
    Ok(dir.join("veil.pid"))
}

/// Writes the current process's PID to the PID file.
///
/// Called when the daemon starts. The PID file allows the CLI to detect
/// a running daemon even if the named pipe check fails, and to forcibly
/// kill a stuck daemon process.
pub fn write_pid_file() -> WindowResult<()> {
    let path = pid_path()?;
    fs::write(&path, std::process::id().to_string())?;
    Ok(())
}

/// Reads the PID from the PID file, if it exists.
pub fn read_pid_file() -> WindowResult<Option<u32>> {
    let path = pid_path()?;

    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(&path)?;
    let pid: u32 = contents
        .trim()
        .parse()
        .map_err(|e| format!("invalid PID file contents: {e}"))?;

    Ok(Some(pid))
}

/// Removes the PID file.
///
/// Called when the daemon shuts down cleanly.
pub fn remove_pid_file() -> WindowResult<()> {
    let path = pid_path()?;

    if path.exists() {
        fs::remove_file(&path)?;
    }

    Ok(())
}
