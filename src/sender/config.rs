use clap::Args;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 24224;
pub const DEFAULT_TIMEOUT_MS: u64 = 3000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("File error: {0}")]
    FileError(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Environment error: {0}")]
    EnvError(String),
}

/// Where and how to reach the Fluentd / Fluent Bit forward input.
///
/// Can be flattened into a clap parser, loaded from the environment or read
/// from a TOML file.
#[derive(Args, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FluentConfig {
    /// Fluent forward input host
    #[arg(long = "fluent-host", env = "FLUENT_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Fluent forward input port
    #[arg(long = "fluent-port", env = "FLUENT_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Connect timeout in milliseconds
    #[arg(long = "fluent-timeout-ms", env = "FLUENT_TIMEOUT_MS", default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Socket write timeout in milliseconds (0 disables it)
    #[arg(long = "fluent-write-timeout-ms", env = "FLUENT_WRITE_TIMEOUT_MS", default_value_t = 0)]
    pub write_timeout_ms: u64,
}

impl Default for FluentConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            write_timeout_ms: 0,
        }
    }
}

impl FluentConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Defaults overridden by `FLUENT_HOST`, `FLUENT_PORT`,
    /// `FLUENT_TIMEOUT_MS` and `FLUENT_WRITE_TIMEOUT_MS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        load_env_string("FLUENT_HOST", &mut config.host);
        load_env_var("FLUENT_PORT", &mut config.port)?;
        load_env_var("FLUENT_TIMEOUT_MS", &mut config.timeout_ms)?;
        load_env_var("FLUENT_WRITE_TIMEOUT_MS", &mut config.write_timeout_ms)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::InvalidConfig("host must not be empty".to_string()));
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::InvalidConfig(
                "timeout_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn write_timeout(&self) -> Option<Duration> {
        (self.write_timeout_ms > 0).then(|| Duration::from_millis(self.write_timeout_ms))
    }
}

/// Helper function to load and parse an environment variable.
/// Returns Ok(()) if the variable doesn't exist (keeps default).
fn load_env_var<T>(name: &str, target: &mut T) -> Result<(), ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    if let Ok(value) = std::env::var(name) {
        *target = value
            .parse()
            .map_err(|e| ConfigError::EnvError(format!("Invalid {name}: {e}")))?;
    }
    Ok(())
}

fn load_env_string(name: &str, target: &mut String) {
    if let Ok(value) = std::env::var(name) {
        *target = value;
    }
}
