//! Host configuration for browsing sessions.
//!
//! Defines the YAML-serializable settings a host (the CLI, or a UI shell)
//! reads at startup. Every section is optional; missing keys fall back to
//! defaults, so an empty file is a valid configuration.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! browse:
//!   page_size: 100
//! output:
//!   format: table
//! log:
//!   level: info
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading, saving, or validating a [`StudioConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A value parsed but is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Settings for paginated table browsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowseConfig {
    /// Rows fetched per page when no explicit limit is given.
    pub page_size: u64,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self { page_size: 100 }
    }
}

/// How results are rendered by a text host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

/// Diagnostic logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Maximum level emitted: `error`, `warn`, `info`, `debug`, or `trace`.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl LogConfig {
    /// Parses [`level`](Self::level) into a [`tracing::Level`].
    pub fn max_level(&self) -> Result<tracing::Level, ConfigError> {
        self.level
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("unknown log level '{}'", self.level)))
    }
}

/// Top-level host configuration.
///
/// # Examples
///
/// ```
/// use litestudio_core::{OutputFormat, StudioConfig};
///
/// let config: StudioConfig = serde_yaml::from_str("browse:\n  page_size: 25\n").unwrap();
/// assert_eq!(config.browse.page_size, 25);
/// assert_eq!(config.output.format, OutputFormat::Json);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    /// Configuration format version (e.g., `"1.0"`).
    pub version: String,
    pub browse: BrowseConfig,
    pub output: OutputConfig,
    pub log: LogConfig,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            browse: BrowseConfig::default(),
            output: OutputConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl StudioConfig {
    /// Loads configuration from a YAML file and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if parsing fails, or [`ConfigError::Invalid`] if
    /// a value is out of range.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config: Self = serde_yaml::from_reader(reader)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Checks value ranges that the YAML types alone cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.browse.page_size == 0 {
            return Err(ConfigError::Invalid(
                "browse.page_size must be greater than zero".to_string(),
            ));
        }
        self.log.max_level()?;
        Ok(())
    }
}
