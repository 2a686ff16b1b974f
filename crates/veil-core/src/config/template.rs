/// Generates the default `config.toml` contents with explanatory comments.
///
/// This is used by `veil init` to create a starter config file that
/// users can immediately edit.
pub fn generate_config() -> String {
    r##"# Veil configuration
# Location: ~/.config/veil/config.toml

# Global key combination that hides every visible window, and restores
# them on the next press. Modifiers: ctrl, alt, shift, win.
# Change it at runtime with `veil hotkey <combo>`.
hotkey = "ctrl+alt+h"

# Title Veil gives its own console window. Windows with this title are
# never hidden.
self_title = "Window Manager"

[scan]
# Seconds between background scans. Lower is more responsive, higher
# costs less. Clamped to 1..3600.
interval_secs = 5
# Exact window titles to hide automatically as soon as they appear.
# targets = ["Notepad", "Calculator"]
targets = []

[toggle]
# Titles the global hotkey never hides.
exclude = ["Program Manager"]

[logging]
# Enable file logging to ~/.config/veil/logs/veil.log.
enabled = false
# Minimum log level: "debug", "info", "warn", or "error".
level = "info"
# Maximum log file size in MB before rotation.
max_file_mb = 10
"##
    .to_string()
}
