//! Execution environment capabilities
//!
//! The runner asks the environment two things: how many processing units
//! are available, and what time it is. Both sit behind traits so tests can
//! pin them.

use std::time::{Duration, Instant};

/// Source of the available parallel processing unit count
pub trait ProcessorTopology: Send + Sync {
    /// Number of processing units, or `None` if the query failed
    fn processing_units(&self) -> Option<usize>;
}

/// Processing unit count as reported by the operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTopology;

impl ProcessorTopology for SystemTopology {
    fn processing_units(&self) -> Option<usize> {
        match std::thread::available_parallelism() {
            Ok(count) => Some(count.get()),
            Err(err) => {
                tracing::debug!(error = %err, "available_parallelism query failed");
                None
            }
        }
    }
}

/// Fixed processing unit count
#[derive(Debug, Clone, Copy)]
pub struct FixedTopology(pub Option<usize>);

impl ProcessorTopology for FixedTopology {
    fn processing_units(&self) -> Option<usize> {
        self.0
    }
}

/// Resolve the processing unit count, treating failures and zero as one unit
pub fn resolve_processing_units<T: ProcessorTopology + ?Sized>(topology: &T) -> usize {
    match topology.processing_units() {
        Some(count) if count > 0 => count,
        Some(_) => {
            tracing::warn!("environment reported zero processing units, running on one");
            1
        }
        None => {
            tracing::warn!("processing unit count unavailable, running on one");
            1
        }
    }
}

/// Monotonic time source
///
/// `now` returns the time elapsed since an arbitrary fixed origin.
pub trait Clock: Send + Sync {
    fn now(&self) -> Duration;
}

/// Clock backed by `std::time::Instant`
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_topology_reports_at_least_one() {
        assert!(resolve_processing_units(&SystemTopology) >= 1);
    }

    #[test]
    fn test_zero_units_falls_back_to_one() {
        assert_eq!(resolve_processing_units(&FixedTopology(Some(0))), 1);
    }

    #[test]
    fn test_failed_query_falls_back_to_one() {
        assert_eq!(resolve_processing_units(&FixedTopology(None)), 1);
    }

    #[test]
    fn test_reported_units_are_used() {
        assert_eq!(resolve_processing_units(&FixedTopology(Some(12))), 12);
    }

    #[test]
    fn test_monotonic_clock_never_goes_back() {
        let clock = MonotonicClock::new();
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
