//! Configuration module for galtag
//!
//! Manages the index endpoint, display scheme, logging level and the
//! behaviour switches of the gallery. Configuration is stored in the user's
//! config directory and a default file is written on first run.

use std::fs;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::client::http::DEFAULT_ENDPOINT;
use crate::gallery::GalleryOptions;
use crate::resolver::DEFAULT_ASSET_PROTOCOL;

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_asset_protocol() -> String {
    DEFAULT_ASSET_PROTOCOL.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

const fn enabled() -> bool {
    true
}

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct GalleryConfig {
    /// Base URL of the remote index
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Scheme of the display URIs built for local files
    #[serde(default = "default_asset_protocol")]
    pub asset_protocol: String,

    /// Log filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Suppress informational output by default
    #[serde(default)]
    pub quiet: bool,

    /// Discard load results that finish after a newer load
    #[serde(default = "enabled")]
    pub discard_stale_loads: bool,

    /// Leave imported records (no local file) out of `save`
    #[serde(default)]
    pub skip_unbacked_on_save: bool,

    /// Default `strict` flag for auto-tagging
    #[serde(default = "enabled")]
    pub strict_auto_tag: bool,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            asset_protocol: default_asset_protocol(),
            log_level: default_log_level(),
            quiet: false,
            discard_stale_loads: true,
            skip_unbacked_on_save: false,
            strict_auto_tag: true,
        }
    }
}

impl GalleryConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            ConfigError::Message("Could not determine config directory".to_string())
        })?;

        Ok(config_dir.join("galtag").join("config.toml"))
    }

    /// Load configuration from the default location, creating it if missing
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read, parsed, or created.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, creating a default file if missing
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read, parsed, or created.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let default_config = Self::default();
            default_config.save_to(path)?;
            return Ok(default_config);
        }

        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .build()?;

        settings.try_deserialize()
    }

    /// Save configuration to the default location
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config path cannot be determined or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the parent directory cannot be created, the configuration
    /// cannot be serialized to TOML, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Gallery behaviour switches taken from this configuration
    #[must_use]
    pub const fn gallery_options(&self) -> GalleryOptions {
        GalleryOptions {
            discard_stale_loads: self.discard_stale_loads,
            skip_unbacked_on_save: self.skip_unbacked_on_save,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = GalleryConfig::default();
        assert_eq!(config.endpoint, "http://127.0.0.1:7878");
        assert_eq!(config.asset_protocol, "asset");
        assert_eq!(config.log_level, "info");
        assert!(!config.quiet);
        assert!(config.discard_stale_loads);
        assert!(!config.skip_unbacked_on_save);
        assert!(config.strict_auto_tag);
    }

    #[test]
    fn test_first_load_writes_default_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let config = GalleryConfig::load_from(&path).unwrap();

        assert_eq!(config, GalleryConfig::default());
        assert!(path.exists());
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("endpoint"));
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            "endpoint = \"http://index.local:9000\"\nskip_unbacked_on_save = true\n",
        )
        .unwrap();

        let config = GalleryConfig::load_from(&path).unwrap();

        assert_eq!(config.endpoint, "http://index.local:9000");
        assert!(config.skip_unbacked_on_save);
        assert_eq!(config.asset_protocol, "asset");
        assert!(config.discard_stale_loads);
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let config = GalleryConfig {
            quiet: true,
            discard_stale_loads: false,
            ..GalleryConfig::default()
        };

        config.save_to(&path).unwrap();
        let loaded = GalleryConfig::load_from(&path).unwrap();

        assert_eq!(loaded, config);
        assert_eq!(
            loaded.gallery_options(),
            GalleryOptions {
                discard_stale_loads: false,
                skip_unbacked_on_save: false,
            }
        );
    }

    #[test]
    fn test_malformed_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "quiet = \"not a bool").unwrap();

        assert!(GalleryConfig::load_from(&path).is_err());
    }
}
