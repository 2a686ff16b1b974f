mod loader;
pub mod template;

use serde::{Deserialize, Serialize};

use crate::hotkey::Hotkey;
use crate::log::LogConfig;

pub use loader::{change_hotkey, config_dir, config_path, load, load_from, save_hotkey, try_load_from};

pub const DEFAULT_HOTKEY: &str = "ctrl+alt+h";
pub const DEFAULT_SELF_TITLE: &str = "Window Manager";

/// Top-level configuration for Veil.
///
/// Loaded from `~/.config/veil/config.toml`. Missing sections
/// fall back to defaults thanks to `#[serde(default)]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Global toggle key combination, e.g. "ctrl+alt+h".
    pub hotkey: String,
    /// Title this process gives its own window; never hidden.
    pub self_title: String,
    /// Background auto-hide scan.
    pub scan: ScanConfig,
    /// Bulk toggle settings.
    pub toggle: ToggleConfig,
    /// File logging.
    pub logging: LogConfig,
}

/// Background scan settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Seconds between scans.
    pub interval_secs: u64,
    /// Exact titles to hide automatically.
    pub targets: Vec<String>,
}

/// Bulk toggle settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToggleConfig {
    /// Titles never hidden by the toggle.
    pub exclude: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hotkey: DEFAULT_HOTKEY.into(),
            self_title: DEFAULT_SELF_TITLE.into(),
            scan: ScanConfig::default(),
            toggle: ToggleConfig::default(),
            logging: LogConfig::default(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            interval_secs: 5,
            targets: Vec::new(),
        }
    }
}

impl Default for ToggleConfig {
    fn default() -> Self {
        Self {
            exclude: vec!["Program Manager".into()],
        }
    }
}

impl Config {
    /// Clamps values to safe ranges and repairs unusable settings.
    ///
    /// An unparsable hotkey falls back to the default, and an empty
    /// self title would disable self-protection, so it is restored too.
    pub fn validate(&mut self) {
        self.scan.interval_secs = self.scan.interval_secs.clamp(1, 3600);

        match self.hotkey.parse::<Hotkey>() {
            Ok(hotkey) => self.hotkey = hotkey.to_string(),
            Err(e) => {
                crate::log_warn!("{e}; using {DEFAULT_HOTKEY}");
                self.hotkey = DEFAULT_HOTKEY.into();
            }
        }

        if self.self_title.trim().is_empty() {
            self.self_title = DEFAULT_SELF_TITLE.into();
        }
    }

    /// The parsed toggle hotkey. Always succeeds after [`Config::validate`].
    pub fn parsed_hotkey(&self) -> Result<Hotkey, crate::hotkey::HotkeyError> {
        self.hotkey.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        // Arrange / Act
        let config = Config::default();

        // Assert
        assert_eq!(config.hotkey, "ctrl+alt+h");
        assert_eq!(config.scan.interval_secs, 5);
        assert_eq!(config.toggle.exclude, vec!["Program Manager".to_string()]);
    }

    #[test]
    fn partial_toml_uses_defaults_for_missing_sections() {
        // Arrange
        let toml_str = "[scan]\ntargets = [\"Notepad\"]\n";

        // Act
        let config: Config = toml::from_str(toml_str).unwrap();

        // Assert
        assert_eq!(config.scan.targets, vec!["Notepad".to_string()]);
        assert_eq!(config.scan.interval_secs, 5);
        assert_eq!(config.hotkey, "ctrl+alt+h");
    }

    #[test]
    fn validate_clamps_interval_and_repairs_hotkey() {
        // Arrange
        let mut config = Config {
            hotkey: "not a hotkey".into(),
            self_title: "  ".into(),
            scan: ScanConfig {
                interval_secs: 0,
                targets: Vec::new(),
            },
            ..Default::default()
        };

        // Act
        config.validate();

        // Assert
        assert_eq!(config.scan.interval_secs, 1);
        assert_eq!(config.hotkey, DEFAULT_HOTKEY);
        assert_eq!(config.self_title, DEFAULT_SELF_TITLE);
    }

    #[test]
    fn validate_canonicalizes_hotkey() {
        // Arrange
        let mut config = Config {
            hotkey: "Alt+Ctrl+J".into(),
            ..Default::default()
        };

        // Act
        config.validate();

        // Assert
        assert_eq!(config.hotkey, "ctrl+alt+j");
    }
}
