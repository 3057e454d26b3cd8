//! Data models module
//!
//! Contains benchmark result data, the reference processor table and the
//! comparison chart model built from both.

pub mod chart;
pub mod reference;
pub mod result;

// Re-export commonly used types
pub use chart::{BarKind, ChartBar, ComparisonChart};
pub use reference::{ReferenceEntry, ReferenceTable};
pub use result::{BenchmarkResult, SystemInfo};
