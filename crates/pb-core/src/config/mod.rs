//! Configuration management for pybridge

mod bridge;
pub(crate) mod serde_utils;

pub use bridge::{BackoffConfig, BridgeConfig};

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Get the default configuration directory
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pybridge")
}

/// Get the default configuration file path
pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.toml")
}

/// Load configuration from a TOML file
pub fn load_config<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Invalid(format!("Failed to read {}: {}", path.display(), e)))?;

    Ok(toml::from_str(&content)?)
}

/// Save configuration to a TOML file, creating parent directories as needed
pub fn save_config<T: serde::Serialize>(path: &Path, config: &T) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(config)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| ConfigError::Invalid(format!("Failed to create {}: {}", parent.display(), e)))?;
    }

    std::fs::write(path, content)
        .map_err(|e| ConfigError::Invalid(format!("Failed to write {}: {}", path.display(), e)))?;

    Ok(())
}

/// Resolve a path against the current working directory
///
/// Purely lexical; the path does not need to exist. Subprocess working
/// directories must be absolute because the bridge itself never changes
/// directory.
pub fn absolute_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");

        let err = load_config::<BridgeConfig>(&path).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_absolute_path_keeps_absolute_input() {
        let path = Path::new("/opt/app");
        assert_eq!(absolute_path(path), PathBuf::from("/opt/app"));
    }

    #[test]
    fn test_absolute_path_resolves_relative_input() {
        let resolved = absolute_path(Path::new("apps/demo"));
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("apps/demo"));
    }

    #[test]
    fn test_default_config_path_is_under_the_app_dir() {
        let path = default_config_path();
        assert!(path.ends_with("pybridge/config.toml"));
    }
}
