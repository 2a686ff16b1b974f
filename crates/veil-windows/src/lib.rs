//! Win32 implementation of Veil. Everything here is Windows-only; on
//! other targets the crate is empty.
#![cfg(windows)]

/// Daemon main loop.
pub mod daemon;

/// `Desktop` over Win32.
pub mod desktop;

/// Win32 window enumeration.
pub mod enumerate;

/// Message-pump thread that owns the global hotkey.
pub mod event_loop;

/// Global hotkey registration.
pub mod hotkey;

/// Self-identity marker on the launching terminal window.
pub mod identity;

/// IPC via Named Pipes.
pub mod ipc;

/// Process utilities (alive check, kill).
pub mod process;

/// Window type wrapping a Win32 `HWND`.
pub mod window;

pub use desktop::Win32Desktop;
pub use window::Window;
