//! Detector configuration.

use std::path::Path;

use chrono::TimeDelta;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// File name patterns treated as backups by default.
///
/// Each name needs at least one character before the suffix, and the
/// extension may carry one trailing digit (`report.bak2`).
pub const DEFAULT_BACKUP_PATTERNS: &[&str] = &[
    "?*.{bak,backup,old,orig}",
    "?*.{bak,backup,old,orig}[0-9]",
    "?*~",
];

/// File name patterns treated as temporary files by default.
pub const DEFAULT_TEMP_PATTERNS: &[&str] = &[
    // Generic
    "*.tmp",
    "*.temp",
    "*.part",
    "*.crdownload",
    // Vim
    "*.swp",
    "*.swo",
    "*.swx",
    "4913",
    // Emacs
    ".#*",
    "#?*#",
    // Office
    "~$*",
    ".~lock.*#",
];

/// Tuning knobs for the pattern detectors.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
#[serde(default)]
pub struct DetectorConfig {
    /// Maximum span (seconds, inclusive) of a batch update.
    #[builder(default = "5.0")]
    pub batch_window_secs: f64,

    /// Maximum gap (seconds, inclusive) between the backup move and the re-create.
    #[builder(default = "2.0")]
    pub backup_window_secs: f64,

    /// Minimum number of events in one directory to form a batch.
    #[builder(default = "3")]
    pub min_batch_size: usize,

    /// Minimum number of moves in a rename chain.
    #[builder(default = "2")]
    pub min_chain_length: usize,

    /// Minimum shared stem prefix for two files to count as related.
    #[builder(default = "3")]
    pub min_prefix_len: usize,

    /// Glob patterns (matched against the file name) for backup files.
    #[builder(default = "to_owned_patterns(DEFAULT_BACKUP_PATTERNS)")]
    pub backup_patterns: Vec<String>,

    /// Glob patterns (matched against the file name) for temporary files.
    #[builder(default = "to_owned_patterns(DEFAULT_TEMP_PATTERNS)")]
    pub temp_patterns: Vec<String>,
}

fn to_owned_patterns(patterns: &[&str]) -> Vec<String> {
    patterns.iter().map(|p| (*p).to_string()).collect()
}

fn secs_to_delta(secs: f64) -> TimeDelta {
    TimeDelta::microseconds((secs * 1_000_000.0).round() as i64)
}

fn check_window(name: &str, value: Option<f64>) -> Result<(), String> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => {
            Err(format!("{name} must be a finite, non-negative number of seconds"))
        }
        _ => Ok(()),
    }
}

impl DetectorConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        check_window("batch_window_secs", self.batch_window_secs)?;
        check_window("backup_window_secs", self.backup_window_secs)?;
        if matches!(self.min_batch_size, Some(n) if n < 2) {
            return Err("min_batch_size must be at least 2".to_string());
        }
        if matches!(self.min_chain_length, Some(n) if n < 2) {
            return Err("min_chain_length must be at least 2".to_string());
        }
        Ok(())
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            batch_window_secs: 5.0,
            backup_window_secs: 2.0,
            min_batch_size: 3,
            min_chain_length: 2,
            min_prefix_len: 3,
            backup_patterns: to_owned_patterns(DEFAULT_BACKUP_PATTERNS),
            temp_patterns: to_owned_patterns(DEFAULT_TEMP_PATTERNS),
        }
    }
}

impl DetectorConfig {
    /// Create a new config builder.
    pub fn builder() -> DetectorConfigBuilder {
        DetectorConfigBuilder::default()
    }

    /// Parse a config from TOML. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.check()?;
        Ok(config)
    }

    /// Load a config from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        Self::from_toml_str(&source)
    }

    /// Serialize the config as TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Batch window as a signed time delta.
    pub fn batch_window(&self) -> TimeDelta {
        secs_to_delta(self.batch_window_secs)
    }

    /// Backup window as a signed time delta.
    pub fn backup_window(&self) -> TimeDelta {
        secs_to_delta(self.backup_window_secs)
    }

    /// Run the builder's validation rules against an already-built config.
    fn check(&self) -> Result<(), ConfigError> {
        DetectorConfigBuilder {
            batch_window_secs: Some(self.batch_window_secs),
            backup_window_secs: Some(self.backup_window_secs),
            min_batch_size: Some(self.min_batch_size),
            min_chain_length: Some(self.min_chain_length),
            ..Default::default()
        }
        .validate()
        .map_err(ConfigError::invalid)
    }
}
