//! File logger for the daemon and the one-shot commands.
//!
//! Lines go to `~/.config/veil/logs/veil.log`; once the file grows past
//! `max_file_mb` it becomes `veil.log.1` and a fresh file is started.
//! Logging before [`init`] (and in tests) is a silent no-op.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

static SINK: OnceLock<Mutex<LogFile>> = OnceLock::new();

/// The `[logging]` config section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub enabled: bool,
    /// "debug", "info", "warn" or "error". Anything else means "info".
    pub level: String,
    pub max_file_mb: u64,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "info".into(),
            max_file_mb: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    fn from_config(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Self::Debug,
            "warn" | "warning" => Self::Warn,
            "error" => Self::Error,
            _ => Self::Info,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        })
    }
}

/// An append-only log file that rolls over to a single backup.
struct LogFile {
    path: PathBuf,
    file: File,
    size: u64,
    limit: u64,
    threshold: Level,
}

impl LogFile {
    fn open(dir: &Path, config: &LogConfig) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join("veil.log");
        let file = append_to(&path)?;
        Ok(Self {
            size: file.metadata()?.len(),
            path,
            file,
            limit: config.max_file_mb.saturating_mul(1024 * 1024),
            threshold: Level::from_config(&config.level),
        })
    }

    fn append(&mut self, level: Level, args: fmt::Arguments<'_>) -> io::Result<()> {
        if level < self.threshold {
            return Ok(());
        }
        let line = format!("{} {level:<5} {args}\n", clock());
        self.file.write_all(line.as_bytes())?;
        self.size += line.len() as u64;

        if self.limit > 0 && self.size >= self.limit {
            fs::rename(&self.path, self.path.with_extension("log.1"))?;
            self.file = append_to(&self.path)?;
            self.size = 0;
        }
        Ok(())
    }
}

fn append_to(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Starts file logging if `config.enabled`. Only the first call counts.
///
/// A log file that cannot be opened is reported on stderr and logging
/// stays off.
pub fn init(config: &LogConfig) {
    if !config.enabled {
        return;
    }
    let Some(dir) = crate::config::config_dir() else {
        return;
    };
    match LogFile::open(&dir.join("logs"), config) {
        Ok(sink) => {
            let _ = SINK.set(Mutex::new(sink));
        }
        Err(e) => eprintln!("Warning: logging disabled: {e}"),
    }
}

/// Appends one line at `level`. Use the `log_*!` macros instead.
pub fn write(level: Level, args: fmt::Arguments<'_>) {
    if let Some(sink) = SINK.get()
        && let Ok(mut sink) = sink.lock()
    {
        let _ = sink.append(level, args);
    }
}

/// UTC `HH:MM:SS`; the date is in the file's mtime.
fn clock() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs());
    format!("{:02}:{:02}:{:02}", secs / 3600 % 24, secs / 60 % 60, secs % 60)
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => { $crate::log::write($crate::log::Level::Debug, format_args!($($arg)*)) };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => { $crate::log::write($crate::log::Level::Info, format_args!($($arg)*)) };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => { $crate::log::write($crate::log::Level::Warn, format_args!($($arg)*)) };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => { $crate::log::write($crate::log::Level::Error, format_args!($($arg)*)) };
}
