//! Configuration
//!
//! Loaded from a TOML file (`ffsim.toml` by convention); every section and
//! field is optional.
//!
//! ```toml
//! [engine]
//! grading = "tiered"        # or "strict"
//! advisory_threshold = 50
//!
//! [content]
//! path = "packs/freight.yaml"
//!
//! [log]
//! filter = "info"
//! json = false
//! ```

use crate::error::ConfigError;
use crate::grading::GradingScheme;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Score below which the weakest score earns an advisory remark
pub const DEFAULT_ADVISORY_THRESHOLD: u8 = 50;

/// Engine behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Grade table
    pub grading: GradingScheme,
    /// Advisory cut-off
    pub advisory_threshold: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grading: GradingScheme::default(),
            advisory_threshold: DEFAULT_ADVISORY_THRESHOLD,
        }
    }
}

impl EngineConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With grading scheme
    #[inline]
    #[must_use]
    pub fn with_grading(mut self, grading: GradingScheme) -> Self {
        self.grading = grading;
        self
    }

    /// With advisory threshold
    #[inline]
    #[must_use]
    pub fn with_advisory_threshold(mut self, threshold: u8) -> Self {
        self.advisory_threshold = threshold;
        self
    }
}

/// Where content comes from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Pack file; the built-in pack when absent
    pub path: Option<PathBuf>,
}

/// Tracing output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive, overridden by `RUST_LOG`
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
            json: false,
        }
    }
}

/// Whole application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Engine section
    pub engine: EngineConfig,
    /// Content section
    pub content: ContentConfig,
    /// Log section
    pub log: LogConfig,
}

impl AppConfig {
    /// Parse TOML text
    ///
    /// # Errors
    /// [`ConfigError::Parse`] on malformed or mistyped input.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    /// Read a TOML file
    ///
    /// # Errors
    /// I/O or parse errors.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Read `path` if given, otherwise defaults
    ///
    /// # Errors
    /// Same as [`AppConfig::load`].
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }
}
