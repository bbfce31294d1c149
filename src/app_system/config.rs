use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Environment variable naming the config file read by the binary.
pub const CONFIG_ENV: &str = "ORDER_LIFECYCLE_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level runtime configuration. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    pub actors: ActorsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ActorsConfig {
    /// Capacity of each resource actor's request channel.
    pub buffer_size: usize,
}

impl Default for ActorsConfig {
    fn default() -> Self {
        Self { buffer_size: 32 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            with_target: false,
        }
    }
}

impl SystemConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: SystemConfig = toml::from_str(raw)?;
        Ok(config.sanitized())
    }

    /// Loads `path`, falling back to defaults when the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(raw) => Self::from_toml_str(&raw),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.display().to_string(),
                source,
            }),
        }
    }

    /// Reads the file named by [`CONFIG_ENV`], or returns defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::load(path),
            Err(_) => Ok(Self::default()),
        }
    }

    // tokio panics on a zero-capacity channel
    fn sanitized(mut self) -> Self {
        self.actors.buffer_size = self.actors.buffer_size.max(1);
        self
    }
}
