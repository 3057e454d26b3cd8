//! CPU workload units
//!
//! A workload unit is one fixed-size, CPU-bound numeric reduction. The
//! runner executes one unit per processing unit and only cares how long
//! the whole batch takes, not what the reduction returns.

use std::hint::black_box;

use crate::Result;

/// Default iteration count for one workload unit
pub const DEFAULT_WORKLOAD_SIZE: u64 = 10_000_000;

/// A unit of parallel work
///
/// Implementations must be deterministic and free of shared mutable state:
/// the same `iterations` always performs the same amount of arithmetic.
pub trait Workload: Send + Sync + 'static {
    /// Execute one unit of work on the execution context `unit`
    fn execute(&self, unit: usize, iterations: u64) -> Result<f64>;

    /// Short human-readable name
    fn name(&self) -> &'static str;
}

/// Sum of square roots over `0..iterations`
#[derive(Debug, Clone, Copy, Default)]
pub struct SqrtSumWorkload;

impl SqrtSumWorkload {
    /// Create the default workload
    pub fn new() -> Self {
        Self
    }

    /// Run the reduction directly
    pub fn reduce(iterations: u64) -> f64 {
        let mut total = 0.0f64;
        for i in 0..iterations {
            total += black_box((i as f64).sqrt());
        }
        total
    }
}

impl Workload for SqrtSumWorkload {
    fn execute(&self, _unit: usize, iterations: u64) -> Result<f64> {
        Ok(Self::reduce(iterations))
    }

    fn name(&self) -> &'static str {
        "sqrt-sum"
    }
}
