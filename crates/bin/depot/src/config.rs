//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `depot.toml` in the working directory, or the file named by
//! `DEPOT_CONFIG`. Every field has a default so the file is optional.
//! Environment variables take precedence over file values.

use std::path::PathBuf;

use serde::Deserialize;

use depot_domain::time::parse_timestamp;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Snapshot to load.
    pub model: ModelConfig,
    /// Where to write the final snapshot.
    pub export: ExportConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Transports to run after loading, in order.
    pub transports: Vec<TransportConfig>,
}

/// Input snapshot configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Path of the JSON snapshot.
    pub path: PathBuf,
}

/// Output snapshot configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Path of the exported JSON snapshot; nothing is written when unset.
    pub path: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// One scripted transport: move `container` onto holding area
/// `destination` over `start`..`end`.
#[derive(Debug, Clone, Deserialize)]
pub struct TransportConfig {
    pub container: u64,
    pub destination: u64,
    pub start: String,
    pub end: String,
}

impl Config {
    /// Load configuration from `depot.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("DEPOT_CONFIG").unwrap_or_else(|_| "depot.toml".to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("DEPOT_MODEL") {
            self.model.path = val.into();
        }
        if let Ok(val) = std::env::var("DEPOT_EXPORT") {
            self.export.path = Some(val.into());
        }
        if let Ok(val) = std::env::var("DEPOT_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.model.path.as_os_str().is_empty() {
            return Err(ConfigError::Validation("model path must not be empty".to_string()));
        }
        for (n, transport) in self.transports.iter().enumerate() {
            let start = parse_timestamp(&transport.start);
            let end = parse_timestamp(&transport.end);
            match (start, end) {
                (Ok(start), Ok(end)) if end >= start => {}
                (Ok(_), Ok(_)) => {
                    return Err(ConfigError::Validation(format!(
                        "transport {n}: end {} is before start {}",
                        transport.end, transport.start
                    )));
                }
                (Err(err), _) | (_, Err(err)) => {
                    return Err(ConfigError::Validation(format!("transport {n}: {err}")));
                }
            }
        }
        Ok(())
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("model.json"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "depot=info,depot_app=info,depot_adapter_snapshot_json=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
