//! Settings resolution and loading.
//!
//! Resolution order: CLI argument → environment variables → XDG path → defaults.

use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::settings::Settings;
use crate::validate::{validate_settings, ValidationError, ValidationResult};

/// Where the settings file was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Found in XDG config directory.
    XdgConfig,

    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Environment variable names.
pub const ENV_SETTINGS_PATH: &str = "BAYES_DICE_CONFIG";
pub const ENV_CONFIG_DIR: &str = "BAYES_DICE_CONFIG_DIR";

/// Standard settings file name.
pub const SETTINGS_FILENAME: &str = "settings.json";

/// Application name for XDG directories.
const APP_NAME: &str = "bayes-dice";

/// Settings together with where they came from.
#[derive(Debug, Clone, Serialize)]
pub struct LoadedSettings {
    pub settings: Settings,
    pub path: Option<PathBuf>,
    pub source: ConfigSource,
    /// SHA-256 of the file content (None when using defaults).
    pub hash: Option<String>,
}

/// Resolve the settings file path.
///
/// An explicit CLI path is returned even if it does not exist so that the
/// subsequent read reports the problem. Environment and XDG locations are only
/// used when the file is present.
pub fn resolve_settings_path(cli_path: Option<&Path>) -> (Option<PathBuf>, ConfigSource) {
    // 1. CLI argument
    if let Some(path) = cli_path {
        return (Some(path.to_path_buf()), ConfigSource::CliArgument);
    }

    // 2. Environment variable (direct path)
    if let Ok(env_path) = std::env::var(ENV_SETTINGS_PATH) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return (Some(path), ConfigSource::Environment);
        }
    }

    // 3. Environment variable (config dir)
    if let Ok(config_dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = PathBuf::from(config_dir).join(SETTINGS_FILENAME);
        if path.exists() {
            return (Some(path), ConfigSource::Environment);
        }
    }

    // 4. XDG config directory
    if let Some(dir) = xdg_config_dir() {
        let path = dir.join(SETTINGS_FILENAME);
        if path.exists() {
            return (Some(path), ConfigSource::XdgConfig);
        }
    }

    (None, ConfigSource::BuiltinDefault)
}

/// Resolve, read and validate settings.
pub fn load_settings(cli_path: Option<&Path>) -> ValidationResult<LoadedSettings> {
    let (path, source) = resolve_settings_path(cli_path);

    let Some(path) = path else {
        return Ok(LoadedSettings {
            settings: Settings::default(),
            path: None,
            source,
            hash: None,
        });
    };

    let content = std::fs::read_to_string(&path).map_err(|e| {
        ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let settings = Settings::from_json(&content)?;
    validate_settings(&settings)?;

    Ok(LoadedSettings {
        settings,
        path: Some(path),
        source,
        hash: Some(compute_hash(&content)),
    })
}

/// Get the XDG config directory for bayes-dice.
pub fn xdg_config_dir() -> Option<PathBuf> {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .ok()
        .or_else(dirs::config_dir)
        .map(|d| d.join(APP_NAME))
}

fn compute_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_source_display() {
        assert_eq!(format!("{}", ConfigSource::CliArgument), "CLI argument");
        assert_eq!(
            format!("{}", ConfigSource::Environment),
            "environment variable"
        );
        assert_eq!(format!("{}", ConfigSource::XdgConfig), "XDG config");
        assert_eq!(
            format!("{}", ConfigSource::BuiltinDefault),
            "builtin default"
        );
    }

    #[test]
    fn test_cli_path_wins_even_if_missing() {
        let missing = Path::new("/nonexistent/bayes-dice/settings.json");
        let (path, source) = resolve_settings_path(Some(missing));
        assert_eq!(path.as_deref(), Some(missing));
        assert_eq!(source, ConfigSource::CliArgument);
    }

    #[test]
    fn test_missing_cli_path_is_io_error() {
        let missing = Path::new("/nonexistent/bayes-dice/settings.json");
        let err = load_settings(Some(missing)).unwrap_err();
        assert!(matches!(err, ValidationError::IoError(_)));
    }

    #[test]
    fn test_hash_is_stable_hex() {
        let a = compute_hash("{}");
        assert_eq!(a, compute_hash("{}"));
        assert_eq!(a.len(), 64);
        assert_ne!(a, compute_hash("{ }"));
    }
}
