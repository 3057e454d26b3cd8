//! Benchmark engine module
//!
//! Contains the workload unit, the environment capabilities the runner
//! depends on, the scoring formula and the parallel runner itself.

pub mod environment;
pub mod runner;
pub mod score;
pub mod workload;

// Re-export commonly used types
pub use environment::{Clock, MonotonicClock, ProcessorTopology, SystemTopology};
pub use runner::{BenchmarkRunner, ProgressUpdate};
pub use score::ScoringModel;
pub use workload::{SqrtSumWorkload, Workload};
