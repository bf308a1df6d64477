use std::io::ErrorKind;
use std::path::PathBuf;

use super::Config;

/// Returns the config directory: `~/.config/rectwatch/`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".config").join("rectwatch"))
}

/// Returns the config file path: `~/.config/rectwatch/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Returns the per-user data directory holding the database and PID file.
pub fn data_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("rectwatch"))
}

/// Tries to load and parse `config.toml`.
///
/// Returns `Ok(Config)` on success, [`LoadError::Missing`] when there is
/// no file, or a path-prefixed message for IO and parse errors.
pub fn try_load() -> Result<Config, LoadError> {
    let path = config_path().ok_or(LoadError::Other("could not determine config path".into()))?;
    let content = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => LoadError::Missing,
        _ => LoadError::Other(format!("{}: {e}", path.display())),
    })?;
    let mut config: Config =
        toml::from_str(&content).map_err(|e| LoadError::Other(format!("{}: {e}", path.display())))?;
    config.validate();
    Ok(config)
}

/// Loads the configuration from disk, falling back to defaults.
///
/// After loading, values are clamped to safe ranges via [`Config::validate`].
/// A missing file silently returns defaults; other errors are printed.
pub fn load() -> Config {
    match try_load() {
        Ok(config) => config,
        Err(LoadError::Missing) => Config::default(),
        Err(LoadError::Other(e)) => {
            eprintln!("Warning: {e}");
            Config::default()
        }
    }
}

/// Why the config file could not be used.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// No config file exists yet.
    #[error("config file not found")]
    Missing,
    /// The file exists but could not be read or parsed.
    #[error("{0}")]
    Other(String),
}
