//! Newline-delimited JSON over a named pipe: one request and one
//! response per connection.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::os::windows::io::FromRawHandle;

use veil_core::WindowResult;
use veil_core::ipc::{Command, PIPE_NAME, Response};
use windows::Win32::Foundation::{
    CloseHandle, DUPLICATE_SAME_ACCESS, DuplicateHandle, HANDLE, INVALID_HANDLE_VALUE,
};
use windows::Win32::Storage::FileSystem::{
    CreateFileW, FILE_SHARE_NONE, FlushFileBuffers, OPEN_EXISTING, PIPE_ACCESS_DUPLEX,
};
use windows::Win32::System::Pipes::{
    ConnectNamedPipe, CreateNamedPipeW, DisconnectNamedPipe, PIPE_READMODE_BYTE, PIPE_TYPE_BYTE,
    PIPE_UNLIMITED_INSTANCES, PIPE_WAIT, WaitNamedPipeW,
};
use windows::Win32::System::Threading::GetCurrentProcess;
use windows::core::HSTRING;

const GENERIC_READ_WRITE: u32 = 0x80000000 | 0x40000000;

/// Owns a pipe HANDLE and closes it on drop.
struct OwnedPipe(HANDLE);

impl Drop for OwnedPipe {
    fn drop(&mut self) {
        // SAFETY: the guard owns this handle exclusively.
        unsafe {
            let _ = CloseHandle(self.0);
        }
    }
}

/// One server-side pipe instance, serving a single client.
pub struct PipeServer {
    pipe: OwnedPipe,
}

impl PipeServer {
    /// Creates a pipe instance without waiting for a client.
    pub fn create() -> WindowResult<Self> {
        let pipe_name = HSTRING::from(PIPE_NAME);

        // SAFETY: CreateNamedPipeW creates a new named pipe instance.
        // The result is checked against INVALID_HANDLE_VALUE.
        let handle = unsafe {
            CreateNamedPipeW(
                &pipe_name,
                PIPE_ACCESS_DUPLEX,
                PIPE_TYPE_BYTE | PIPE_READMODE_BYTE | PIPE_WAIT,
                PIPE_UNLIMITED_INSTANCES,
                4096,
                512,
                0,
                None,
            )
        };

        if handle == INVALID_HANDLE_VALUE {
            return Err("failed to create named pipe".into());
        }

        Ok(Self {
            pipe: OwnedPipe(handle),
        })
    }

    /// Blocks until a client connects and returns its command.
    pub fn accept(&self) -> WindowResult<Command> {
        // SAFETY: ConnectNamedPipe blocks until a client connects.
        unsafe { ConnectNamedPipe(self.pipe.0, None)? };

        let line = read_line(self.pipe.0)?;
        Ok(serde_json::from_str(&line)?)
    }

    /// Writes `response`, waits for the client to drain it, and
    /// disconnects.
    pub fn reply(&self, response: &Response) -> WindowResult<()> {
        write_line(self.pipe.0, &serde_json::to_string(response)?)?;

        // SAFETY: FlushFileBuffers waits until the client has read
        // everything; disconnecting earlier would discard the response.
        unsafe {
            let _ = FlushFileBuffers(self.pipe.0);
            DisconnectNamedPipe(self.pipe.0)?;
        }
        Ok(())
    }
}

/// Sends `command` to the daemon and waits for its response.
pub fn send_command(command: &Command) -> WindowResult<Response> {
    let pipe_name = HSTRING::from(PIPE_NAME);

    // SAFETY: CreateFileW opens an existing named pipe as a client.
    let handle = unsafe {
        CreateFileW(
            &pipe_name,
            GENERIC_READ_WRITE,
            FILE_SHARE_NONE,
            None,
            OPEN_EXISTING,
            Default::default(),
            None,
        )?
    };
    let pipe = OwnedPipe(handle);

    write_line(pipe.0, &serde_json::to_string(command)?)?;
    let line = read_line(pipe.0)?;
    Ok(serde_json::from_str(&line)?)
}

/// Whether a daemon is listening on the pipe.
///
/// `WaitNamedPipeW` only probes for an instance, so no connection is
/// consumed.
pub fn is_daemon_running() -> bool {
    let pipe_name = HSTRING::from(PIPE_NAME);

    // SAFETY: WaitNamedPipeW with a 1 ms timeout returns almost at once.
    unsafe { WaitNamedPipeW(&pipe_name, 1).as_bool() }
}

fn read_line(handle: HANDLE) -> WindowResult<String> {
    let mut reader = BufReader::new(duplicate_as_file(handle)?);
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn write_line(handle: HANDLE, json: &str) -> WindowResult<()> {
    let mut writer = duplicate_as_file(handle)?;
    writeln!(writer, "{json}")?;
    writer.flush()?;
    Ok(())
}

/// Wraps a duplicate of `handle` in a `File`, so the `File` and the
/// original can be closed independently.
fn duplicate_as_file(handle: HANDLE) -> WindowResult<File> {
    let mut dup = HANDLE::default();

    // SAFETY: DuplicateHandle copies the handle within our process; the
    // copy is owned by the returned File.
    unsafe {
        DuplicateHandle(
            GetCurrentProcess(),
            handle,
            GetCurrentProcess(),
            &mut dup,
            0,
            false,
            DUPLICATE_SAME_ACCESS,
        )?;
        Ok(File::from_raw_handle(dup.0))
    }
}
