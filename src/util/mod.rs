//! Utility functions module
//!
//! Contains helper functions for score and duration formatting and
//! duration parsing.

pub mod units;

// Re-export commonly used functions
pub use units::{format_duration, format_iterations, format_score, parse_duration};
