pub mod init;

#[cfg(windows)]
pub mod action;
#[cfg(windows)]
pub mod daemon;
#[cfg(windows)]
pub mod hidden;
#[cfg(windows)]
pub mod list;
#[cfg(windows)]
pub mod resume;
#[cfg(windows)]
pub mod start;
#[cfg(windows)]
pub mod status;
#[cfg(windows)]
pub mod stop;
