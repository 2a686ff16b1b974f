pub mod config;
pub mod desktop;
pub mod detect;
pub mod engine;
pub mod error;
pub mod hotkey;
pub mod ipc;
pub mod log;
pub mod manager;
pub mod pid;
pub mod report;
pub mod resume;
pub mod state_file;
pub mod store;
pub mod toggle;
pub mod window;

#[cfg(test)]
pub(crate) mod testing;

pub use desktop::Desktop;
pub use engine::Engine;
pub use error::{OsError, OsOp, PersistenceError, VeilError, WindowResult};
pub use hotkey::{Hotkey, HotkeyBinding, HotkeyError, HotkeyRegistrar};
pub use ipc::{Command, PIPE_NAME, Response};
pub use manager::WindowManagerState;
pub use store::{HiddenEntry, HiddenId, VisibilityStore};
pub use window::{Handle, WindowRef};
