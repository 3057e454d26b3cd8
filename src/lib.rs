//! CPUORB - CPU Rust Bench
//!
//! A terminal application that runs a fixed numeric workload on every
//! processing unit in parallel, scores the wall-clock duration against a
//! reference machine and charts the result next to known processors.

use std::fmt;

// Public re-exports
pub mod app;
pub mod bench;
pub mod config;
pub mod models;
pub mod simple;
pub mod util;

// Common error types
#[derive(Debug)]
pub enum CpuOrbError {
    /// I/O operation failed
    IoError(std::io::Error),
    /// Configuration validation or parsing error
    ConfigError(String),
    /// One or more workload units could not be started or did not complete
    ExecutionFailure(String),
    /// TUI rendering or interaction error
    TuiError(String),
    /// Result serialization error
    SerializationError(String),
}

impl fmt::Display for CpuOrbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CpuOrbError::IoError(err) => write!(f, "I/O error: {}", err),
            CpuOrbError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            CpuOrbError::ExecutionFailure(msg) => write!(f, "Execution failure: {}", msg),
            CpuOrbError::TuiError(msg) => write!(f, "TUI error: {}", msg),
            CpuOrbError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for CpuOrbError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CpuOrbError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CpuOrbError {
    fn from(err: std::io::Error) -> Self {
        CpuOrbError::IoError(err)
    }
}

impl From<serde_json::Error> for CpuOrbError {
    fn from(err: serde_json::Error) -> Self {
        CpuOrbError::SerializationError(format!("JSON serialization error: {}", err))
    }
}

impl From<toml::de::Error> for CpuOrbError {
    fn from(err: toml::de::Error) -> Self {
        CpuOrbError::ConfigError(format!("TOML parsing error: {}", err))
    }
}

impl From<toml::ser::Error> for CpuOrbError {
    fn from(err: toml::ser::Error) -> Self {
        CpuOrbError::ConfigError(format!("TOML serialization error: {}", err))
    }
}

impl From<tokio::task::JoinError> for CpuOrbError {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_panic() {
            CpuOrbError::ExecutionFailure(format!("Workload unit panicked: {}", err))
        } else {
            CpuOrbError::ExecutionFailure(format!("Workload unit did not complete: {}", err))
        }
    }
}

/// Result type alias for CPUORB operations
pub type Result<T> = std::result::Result<T, CpuOrbError>;

/// Error handling utilities
pub mod error {
    use super::CpuOrbError;

    /// Convert error to user-friendly message with suggestions
    pub fn user_friendly_message(error: &CpuOrbError) -> String {
        match error {
            CpuOrbError::ExecutionFailure(msg) => {
                format!("Benchmark failed: {}. Close other heavy programs and try again.", msg)
            }
            CpuOrbError::ConfigError(msg) => {
                format!("Configuration error: {}. Check your settings.", msg)
            }
            CpuOrbError::TuiError(_) => {
                "Terminal rendering failed. Try the --plain mode.".to_string()
            }
            CpuOrbError::SerializationError(_) => {
                "Failed to format the benchmark result.".to_string()
            }
            CpuOrbError::IoError(_) => error.to_string(),
        }
    }

    /// Whether the error came from the benchmark itself rather than its surroundings
    pub fn is_execution_failure(error: &CpuOrbError) -> bool {
        matches!(error, CpuOrbError::ExecutionFailure(_))
    }
}

// Common types and constants
pub const APP_NAME: &str = "cpuorb";
pub const CONFIG_FILE: &str = "cpuorb.toml";
pub const LOG_FILE: &str = "cpuorb.log";
pub const MEASURED_LABEL: &str = "Your CPU";
