// src/config/mod.rs
mod schema;

use std::path::{Path, PathBuf};
use config::{Config as ConfigLoader, FileFormat};
use tracing::info;

pub use schema::{Config, DemoConfig, LoggingConfig};

use crate::error::{ParexResult, ExecutorError};

const DEFAULT_CONFIG: &str = include_str!("../../config/default.toml");

/// Centralized configuration handling
impl Config {
    /// Load configuration: built-in defaults, then the user file, then PAREX_ environment variables
    pub fn load(config_path: Option<&Path>) -> ParexResult<Self> {
        info!("Loading configuration");

        let mut config_builder = ConfigLoader::builder();

        // Default configuration
        config_builder = config_builder.add_source(
            config::File::from_str(DEFAULT_CONFIG, FileFormat::Toml)
        );

        // User-provided configuration
        if let Some(path) = config_path {
            if path.exists() {
                config_builder = config_builder.add_source(config::File::from(path));
                info!("Loading user configuration from: {}", path.display());
            } else {
                return Err(ExecutorError::Config(format!(
                    "Specified configuration file not found: {}",
                    path.display()
                )));
            }
        } else {
            let default_path = Self::get_default_config_path();
            if default_path.exists() {
                config_builder = config_builder.add_source(config::File::from(default_path.as_path()));
                info!("Loading default configuration from: {}", default_path.display());
            } else {
                info!("No existing configuration found, using built-in defaults");
            }
        }

        // Environment variables, e.g. PAREX_EXECUTOR__FAIL_FAST=true
        config_builder = config_builder.add_source(
            config::Environment::with_prefix("PAREX")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
        );

        let config: Config = match config_builder.build() {
            Ok(c) => match c.try_deserialize() {
                Ok(config) => config,
                Err(e) => return Err(ExecutorError::Config(format!("Failed to parse configuration: {}", e))),
            },
            Err(e) => return Err(ExecutorError::Config(format!("Failed to build configuration: {}", e))),
        };

        Ok(config)
    }

    /// Get the default configuration path
    pub fn get_default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".parex/config.toml")
    }

    /// Write a default configuration to `path`, or to the default location
    pub fn init(path: Option<&Path>, force: bool) -> ParexResult<PathBuf> {
        let config_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::get_default_config_path);

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ExecutorError::File {
                    path: parent.to_path_buf(),
                    message: format!("Failed to create directory: {}", e),
                })?;
        }

        if config_path.exists() && !force {
            return Err(ExecutorError::Config(
                format!("Configuration already exists at {}. Use --force to overwrite.", config_path.display())
            ));
        }

        Config::default().save(&config_path)?;

        Ok(config_path)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> ParexResult<()> {
        let config_str = self.to_toml()?;

        std::fs::write(path, config_str)
            .map_err(|e| ExecutorError::File {
                path: path.to_path_buf(),
                message: format!("Failed to write configuration: {}", e),
            })?;

        info!("Configuration saved to {}", path.display());

        Ok(())
    }

    pub fn to_toml(&self) -> ParexResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ExecutorError::Serialization(format!("Failed to serialize configuration: {}", e)))
    }
}
