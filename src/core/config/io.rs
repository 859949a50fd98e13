use crate::core::config::data::{path_display, Config};
use directories::ProjectDirs;
use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Errors that can occur when loading configuration from disk.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    Read {
        /// Path to the configuration file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the configuration file as valid TOML.
    Parse {
        /// Path to the configuration file with invalid TOML.
        path: PathBuf,
        /// The TOML deserialization error.
        source: toml::de::Error,
    },

    /// The file parsed but describes an unusable setup.
    Invalid {
        path: PathBuf,
        reason: String,
    },
}

impl ConfigError {
    fn display_path(path: &Path) -> String {
        path_display(path)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(
                    f,
                    "Failed to read config at {}: {}",
                    Self::display_path(path),
                    source
                )
            }
            ConfigError::Parse { path, source } => {
                write!(
                    f,
                    "Failed to parse config at {}: {}",
                    Self::display_path(path),
                    source
                )
            }
            ConfigError::Invalid { path, reason } => {
                write!(
                    f,
                    "Invalid config at {}: {}",
                    Self::display_path(path),
                    reason
                )
            }
        }
    }
}

impl StdError for ConfigError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::Invalid { .. } => None,
        }
    }
}

impl Config {
    /// Load the file at `config_path`, falling back to the built-in defaults
    /// when it does not exist.
    pub fn load_from_path(config_path: &Path) -> Result<Config, ConfigError> {
        if !config_path.exists() {
            debug!(path = %path_display(config_path), "No config file, using defaults");
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
            path: config_path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source,
        })?;
        config
            .validate()
            .map_err(|reason| ConfigError::Invalid {
                path: config_path.to_path_buf(),
                reason,
            })?;

        debug!(
            path = %path_display(config_path),
            models = config.models.len(),
            "Loaded config"
        );
        Ok(config)
    }

    /// Load from an explicit path, or from the per-user location when none is given.
    pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
        match explicit {
            Some(path) => Self::load_from_path(path),
            None => match Self::get_config_path() {
                Some(path) => Self::load_from_path(&path),
                None => Ok(Config::default()),
            },
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.endpoint_url.trim().is_empty() {
            return Err("endpoint_url must not be empty".to_string());
        }
        if self.models.is_empty() {
            return Err("models must list at least one model".to_string());
        }
        if let Some(position) = self.models.iter().position(|m| m.trim().is_empty()) {
            return Err(format!("models[{position}] is blank"));
        }
        Ok(())
    }

    pub fn get_config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "foundry-compare", "foundry-compare")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
