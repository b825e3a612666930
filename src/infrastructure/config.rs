// src/infrastructure/config.rs
use crate::constants::{APP_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_BASE_URL, STORAGE_FILE_NAME};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// TOML configuration of the client
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct StorageConfig {
    /// Storage file holding the session token; platform data dir if unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content).context("Failed to parse TOML config")?;

        Ok(config)
    }

    /// Explicit path must exist; the default location may be absent.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            debug!(?path, "Loading config from explicit path");
            return Self::load(path);
        }
        match default_config_path() {
            Some(path) if path.exists() => {
                debug!(?path, "Loading config from default location");
                Self::load(path)
            }
            _ => {
                debug!("No config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn storage_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.storage.path {
            return Ok(path.clone());
        }
        let data_dir = dirs::data_dir().context("Could not find data directory")?;
        Ok(data_dir.join(APP_DIR_NAME).join(STORAGE_FILE_NAME))
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn given_default_config_when_built_then_local_api_and_no_storage_override() {
        let config = Config::default();

        assert_eq!(config.api.base_url, "http://localhost:8080/api");
        assert_eq!(config.storage.path, None);
    }

    #[test]
    fn given_partial_toml_when_loading_then_missing_fields_defaulted() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[storage]\npath = \"/tmp/notekeep.json\"\n").unwrap();

        let config = Config::load(&config_path).unwrap();

        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(
            config.storage_path().unwrap(),
            PathBuf::from("/tmp/notekeep.json")
        );
    }

    #[test]
    fn given_full_toml_when_loading_then_all_fields_read() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(
            &config_path,
            "[api]\nbase_url = \"https://notes.example.com/api\"\n\n[storage]\npath = \"/tmp/s.json\"\n",
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();

        assert_eq!(
            config,
            Config {
                api: ApiConfig {
                    base_url: "https://notes.example.com/api".to_string(),
                },
                storage: StorageConfig {
                    path: Some(PathBuf::from("/tmp/s.json")),
                },
            }
        );
    }

    #[test]
    fn given_invalid_toml_when_loading_then_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[api\nbase_url = 1").unwrap();

        assert!(Config::load(&config_path).is_err());
    }

    #[test]
    fn given_missing_explicit_path_when_resolving_then_error() {
        let temp_dir = TempDir::new().unwrap();

        let result = Config::resolve(Some(temp_dir.path().join("absent.toml").as_path()));

        assert!(result.is_err());
    }
}
