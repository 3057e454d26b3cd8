//! Configuration management module
//!
//! Handles loading, saving, and validation of the benchmark calibration
//! and the reference processor table.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::bench::score::{ScoringModel, DEFAULT_REFERENCE_DURATION, DEFAULT_REFERENCE_SCORE};
use crate::bench::workload::DEFAULT_WORKLOAD_SIZE;
use crate::models::ReferenceTable;
use crate::{CpuOrbError, Result, APP_NAME, CONFIG_FILE};

/// Benchmark parameters consumed by the runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    /// Iterations per workload unit
    pub workload_size: u64,
    /// Duration a reference machine needs for the benchmark
    #[serde(rename = "reference_duration_secs", with = "duration_secs")]
    pub reference_duration: Duration,
    /// Score awarded for matching the reference duration
    pub reference_score: u64,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            workload_size: DEFAULT_WORKLOAD_SIZE,
            reference_duration: DEFAULT_REFERENCE_DURATION,
            reference_score: DEFAULT_REFERENCE_SCORE,
        }
    }
}

impl BenchmarkConfig {
    /// Create a new benchmark configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.workload_size == 0 {
            return Err(CpuOrbError::ConfigError(
                "Workload size must be greater than 0".to_string(),
            ));
        }

        const MAX_WORKLOAD_SIZE: u64 = 10_000_000_000;
        if self.workload_size > MAX_WORKLOAD_SIZE {
            return Err(CpuOrbError::ConfigError(format!(
                "Workload size too large: {} (max: {})",
                self.workload_size, MAX_WORKLOAD_SIZE
            )));
        }

        if self.reference_duration.is_zero() {
            return Err(CpuOrbError::ConfigError(
                "Reference duration must be greater than 0".to_string(),
            ));
        }

        if self.reference_score == 0 {
            return Err(CpuOrbError::ConfigError(
                "Reference score must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Set the iterations per workload unit
    pub fn with_workload_size(mut self, size: u64) -> Self {
        self.workload_size = size;
        self
    }

    /// Set the reference duration
    pub fn with_reference_duration(mut self, duration: Duration) -> Self {
        self.reference_duration = duration;
        self
    }

    /// Set the reference score
    pub fn with_reference_score(mut self, score: u64) -> Self {
        self.reference_score = score;
        self
    }

    /// Scoring model described by this configuration
    pub fn scoring(&self) -> ScoringModel {
        ScoringModel::new(self.reference_duration, self.reference_score)
    }
}

/// Everything read from the settings file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Runner parameters
    pub benchmark: BenchmarkConfig,
    /// Reference processors for the comparison chart
    pub references: ReferenceTable,
}

impl Settings {
    /// Validate both sections
    pub fn validate(&self) -> Result<()> {
        self.benchmark.validate()?;
        self.references.validate()
    }

    /// Load settings from the standard config file location
    /// Returns default settings if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;
        Self::load_from(&config_path)
    }

    /// Load settings from an explicit path, defaulting when it is missing
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| {
            CpuOrbError::ConfigError(format!(
                "Failed to read config file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        let settings: Self = toml::from_str(&content).map_err(|e| {
            CpuOrbError::ConfigError(format!(
                "Failed to parse config file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        settings.validate()?;
        tracing::info!(path = %config_path.display(), "loaded settings");

        Ok(settings)
    }

    /// Save settings to the standard config file location
    pub fn save(&self) -> Result<PathBuf> {
        let config_path = Self::config_file_path()?;
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Save settings to an explicit path
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                CpuOrbError::ConfigError(format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            CpuOrbError::ConfigError(format!("Failed to serialize configuration: {}", e))
        })?;

        fs::write(config_path, content).map_err(|e| {
            CpuOrbError::ConfigError(format!(
                "Failed to write config file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        Ok(())
    }

    /// Get the standard configuration file path
    /// Uses $CONFIG_HOME/cpuorb/cpuorb.toml or falls back to $HOME/.config/cpuorb/cpuorb.toml
    pub fn config_file_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            CpuOrbError::ConfigError("Unable to determine config directory".to_string())
        })?;

        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }
}

// Durations are written as fractional seconds so the file stays hand-editable
mod duration_secs {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(duration.as_secs_f64())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(D::Error::custom)
    }
}
