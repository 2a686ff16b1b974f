use std::fs;
use std::path::{Path, PathBuf};

use super::Config;
use crate::error::{PersistenceError, VeilError};
use crate::hotkey::{Hotkey, HotkeyBinding, HotkeyRegistrar};

/// Returns the config directory: `~/.config/veil/`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".config").join("veil"))
}

/// Returns the config file path: `~/.config/veil/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Tries to load and parse the config file at `path`.
///
/// Returns `Ok(None)` if the file does not exist, or an error string
/// describing what went wrong (IO error, parse error, etc.).
pub fn try_load_from(path: &Path) -> Result<Option<Config>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let mut config: Config =
        toml::from_str(&content).map_err(|e| format!("{}: {e}", path.display()))?;
    config.validate();
    Ok(Some(config))
}

/// Loads the config at `path`, falling back to defaults.
///
/// A missing file silently returns defaults; a broken one is reported.
pub fn load_from(path: &Path) -> Config {
    match try_load_from(path) {
        Ok(Some(config)) => config,
        Ok(None) => Config::default(),
        Err(e) => {
            eprintln!("Warning: {e}");
            crate::log_warn!("{e}");
            Config::default()
        }
    }
}

/// Loads `~/.config/veil/config.toml`, falling back to defaults.
pub fn load() -> Config {
    match config_path() {
        Some(path) => load_from(&path),
        None => Config::default(),
    }
}

/// Stores `hotkey` in the config file at `path`, keeping other settings.
///
/// The file is rewritten through a temporary sibling and renamed into
/// place, so readers see either the old or the new contents. A file that
/// exists but does not parse is left untouched.
pub fn save_hotkey(path: &Path, hotkey: &Hotkey) -> Result<(), PersistenceError> {
    let content = render_with_hotkey(path, hotkey)?;
    write_atomic(path, &content)
}

/// Parses `text`, rebinds the toggle to it and records it in the config
/// file at `path`.
///
/// The existing file is checked before anything is rebound, and it is
/// only written once the new combination is registered. If that write
/// fails the previous combination is bound again.
pub fn change_hotkey<R: HotkeyRegistrar>(
    binding: &mut HotkeyBinding<R>,
    path: &Path,
    text: &str,
) -> Result<Hotkey, VeilError> {
    let hotkey: Hotkey = text.parse()?;
    let content = render_with_hotkey(path, &hotkey)?;
    let previous = binding.current().cloned();

    binding.rebind(hotkey.clone())?;
    if let Err(e) = write_atomic(path, &content) {
        match previous {
            Some(old) => {
                if let Err(undo) = binding.rebind(old) {
                    crate::log_error!("Could not restore the previous hotkey: {undo}");
                }
            }
            None => binding.clear(),
        }
        return Err(e.into());
    }
    Ok(hotkey)
}

/// The config at `path` serialized with `hotkey` swapped in.
fn render_with_hotkey(path: &Path, hotkey: &Hotkey) -> Result<String, PersistenceError> {
    let mut config = try_load_from(path)
        .map_err(|reason| PersistenceError::Unparsable {
            path: path.to_path_buf(),
            reason,
        })?
        .unwrap_or_default();
    config.hotkey = hotkey.to_string();

    toml::to_string_pretty(&config).map_err(|e| {
        PersistenceError::io(path, std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}

fn write_atomic(path: &Path, content: &str) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| PersistenceError::io(parent, e))?;
    }
    let tmp = path.with_extension("toml.tmp");
    fs::write(&tmp, content).map_err(|e| PersistenceError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| PersistenceError::io(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hotkey::HotkeyError;

    /// Records which combinations would fire the toggle.
    #[derive(Default)]
    struct Registrar {
        active: Vec<String>,
    }

    impl HotkeyRegistrar for Registrar {
        fn register(&mut self, hotkey: &Hotkey) -> Result<(), HotkeyError> {
            self.active.push(hotkey.to_string());
            Ok(())
        }

        fn unregister(&mut self, hotkey: &Hotkey) {
            let text = hotkey.to_string();
            self.active.retain(|h| *h != text);
        }
    }

    #[test]
    fn missing_file_loads_defaults() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();

        // Act
        let config = load_from(&dir.path().join("config.toml"));

        // Assert
        assert_eq!(config.hotkey, "ctrl+alt+h");
    }

    #[test]
    fn broken_file_loads_defaults() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "hotkey = [").unwrap();

        // Act
        let result = try_load_from(&path);
        let config = load_from(&path);

        // Assert
        assert!(result.is_err());
        assert_eq!(config.scan.interval_secs, 5);
    }

    #[test]
    fn save_hotkey_keeps_other_settings() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[scan]\ntargets = [\"Notepad\"]\n").unwrap();

        // Act
        save_hotkey(&path, &"ctrl+shift+k".parse().unwrap()).unwrap();
        let config = load_from(&path);

        // Assert
        assert_eq!(config.hotkey, "ctrl+shift+k");
        assert_eq!(config.scan.targets, vec!["Notepad".to_string()]);
        assert!(!dir.path().join("config.toml.tmp").exists());
    }

    #[test]
    fn change_hotkey_moves_trigger_and_updates_file() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut binding = HotkeyBinding::new(Registrar::default());
        binding.rebind("ctrl+alt+h".parse().unwrap()).unwrap();

        // Act
        let hotkey = change_hotkey(&mut binding, &path, "ctrl+alt+j").unwrap();

        // Assert
        assert_eq!(hotkey.to_string(), "ctrl+alt+j");
        assert_eq!(binding.registrar().active, vec!["ctrl+alt+j".to_string()]);
        assert_eq!(load_from(&path).hotkey, "ctrl+alt+j");
    }

    #[test]
    fn invalid_hotkey_changes_nothing() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut binding = HotkeyBinding::new(Registrar::default());
        binding.rebind("ctrl+alt+h".parse().unwrap()).unwrap();

        // Act
        let result = change_hotkey(&mut binding, &path, "ctrl+");

        // Assert
        assert!(matches!(result, Err(VeilError::Hotkey(_))));
        assert_eq!(binding.registrar().active, vec!["ctrl+alt+h".to_string()]);
        assert!(!path.exists());
    }

    #[test]
    fn broken_file_is_not_overwritten() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let original = "[scan]\ninterval_secs = \"5\"\ntargets = [\"Notepad\"]\n";
        fs::write(&path, original).unwrap();

        // Act
        let result = save_hotkey(&path, &"ctrl+shift+k".parse().unwrap());

        // Assert
        assert!(matches!(result, Err(PersistenceError::Unparsable { .. })));
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn broken_file_keeps_the_old_binding() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "hotkey = [").unwrap();
        let mut binding = HotkeyBinding::new(Registrar::default());
        binding.rebind("ctrl+alt+h".parse().unwrap()).unwrap();

        // Act
        let result = change_hotkey(&mut binding, &path, "ctrl+alt+j");

        // Assert
        assert!(matches!(result, Err(VeilError::Persistence(_))));
        assert_eq!(binding.registrar().active, vec!["ctrl+alt+h".to_string()]);
        assert_eq!(fs::read_to_string(&path).unwrap(), "hotkey = [");
    }
}
