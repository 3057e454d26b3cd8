//! Parallel benchmark runner
//!
//! Fans one workload unit out to every processing unit on tokio's blocking
//! pool, waits for all of them, and converts the wall-clock duration of the
//! whole batch into a score.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::bench::environment::{
    resolve_processing_units, Clock, MonotonicClock, ProcessorTopology, SystemTopology,
};
use crate::bench::score::ScoringModel;
use crate::bench::workload::{SqrtSumWorkload, Workload};
use crate::config::BenchmarkConfig;
use crate::models::{BenchmarkResult, SystemInfo};
use crate::{CpuOrbError, Result};

/// Progress update sent as workload units finish
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    /// Units that have finished, successfully or not
    pub completed_units: usize,
    /// Units dispatched for this run
    pub total_units: usize,
    /// Elapsed time since dispatch
    pub elapsed: Duration,
}

impl ProgressUpdate {
    /// Calculate completion percentage (0.0 to 1.0)
    pub fn completion_percentage(&self) -> f64 {
        if self.total_units == 0 {
            0.0
        } else {
            (self.completed_units as f64) / (self.total_units as f64)
        }
    }
}

/// Benchmark runner
///
/// Not reentrant: callers must not start a second run while one is in
/// flight.
pub struct BenchmarkRunner<W = SqrtSumWorkload, T = SystemTopology, C = MonotonicClock> {
    config: BenchmarkConfig,
    scoring: ScoringModel,
    workload: Arc<W>,
    topology: T,
    clock: C,
    system_info: SystemInfo,
}

impl BenchmarkRunner {
    /// Create a runner using the real workload, topology and clock
    pub fn system(config: BenchmarkConfig) -> Result<Self> {
        Self::with_environment(
            config,
            SqrtSumWorkload::new(),
            SystemTopology,
            MonotonicClock::new(),
        )
    }
}

impl<W, T, C> BenchmarkRunner<W, T, C>
where
    W: Workload,
    T: ProcessorTopology,
    C: Clock,
{
    /// Create a runner with explicit environment capabilities
    pub fn with_environment(
        config: BenchmarkConfig,
        workload: W,
        topology: T,
        clock: C,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            scoring: config.scoring(),
            config,
            workload: Arc::new(workload),
            topology,
            clock,
            system_info: SystemInfo::unidentified(),
        })
    }

    /// Attach the machine description copied into every result
    pub fn with_system_info(mut self, system_info: SystemInfo) -> Self {
        self.system_info = system_info;
        self
    }

    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    /// Processing units the next run would use
    pub fn processing_units(&self) -> usize {
        resolve_processing_units(&self.topology)
    }

    /// Run the benchmark once
    pub async fn run(&self) -> Result<BenchmarkResult> {
        self.execute(None).await
    }

    /// Run the benchmark once, reporting each finished unit
    pub async fn run_with_progress(
        &self,
        progress_tx: mpsc::Sender<ProgressUpdate>,
    ) -> Result<BenchmarkResult> {
        self.execute(Some(progress_tx)).await
    }

    async fn execute(
        &self,
        progress_tx: Option<mpsc::Sender<ProgressUpdate>>,
    ) -> Result<BenchmarkResult> {
        let units = resolve_processing_units(&self.topology);
        let iterations = self.config.workload_size;

        tracing::info!(
            units,
            iterations,
            workload = self.workload.name(),
            "starting benchmark"
        );

        let start = self.clock.now();

        let mut tasks = JoinSet::new();
        for unit in 0..units {
            let workload = Arc::clone(&self.workload);
            tasks.spawn_blocking(move || (unit, workload.execute(unit, iterations)));
        }

        let mut outputs = vec![0.0f64; units];
        let mut first_error: Option<CpuOrbError> = None;
        let mut completed = 0;

        // Join every unit even after a failure so no work outlives the run
        while let Some(joined) = tasks.join_next().await {
            completed += 1;

            match joined {
                Ok((unit, Ok(output))) => outputs[unit] = output,
                Ok((unit, Err(err))) => {
                    tracing::error!(unit, error = %err, "workload unit failed");
                    if first_error.is_none() {
                        first_error = Some(if matches!(err, CpuOrbError::ExecutionFailure(_)) {
                            err
                        } else {
                            CpuOrbError::ExecutionFailure(format!("unit {}: {}", unit, err))
                        });
                    }
                }
                Err(join_err) => {
                    tracing::error!(error = %join_err, "workload unit did not complete");
                    if first_error.is_none() {
                        first_error = Some(join_err.into());
                    }
                }
            }

            if let Some(tx) = &progress_tx {
                // A slow or dropped receiver must not stall the measurement
                let _ = tx.try_send(ProgressUpdate {
                    completed_units: completed,
                    total_units: units,
                    elapsed: self.clock.now().saturating_sub(start),
                });
            }
        }

        let duration = self.clock.now().saturating_sub(start);

        if let Some(err) = first_error {
            return Err(err);
        }

        let score = self.scoring.score(duration);
        let checksum: f64 = outputs.iter().sum();

        tracing::info!(score, ?duration, units, "benchmark finished");

        Ok(BenchmarkResult::with_system_info(
            score,
            duration,
            units,
            iterations,
            checksum,
            self.system_info.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::environment::FixedTopology;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingWorkload {
        calls: Arc<AtomicUsize>,
    }

    impl Workload for CountingWorkload {
        fn execute(&self, _unit: usize, iterations: u64) -> Result<f64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(iterations as f64)
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    struct FailingWorkload {
        failing_unit: usize,
        calls: Arc<AtomicUsize>,
    }

    impl Workload for FailingWorkload {
        fn execute(&self, unit: usize, _iterations: u64) -> Result<f64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if unit == self.failing_unit {
                Err(CpuOrbError::ExecutionFailure(format!("unit {} exhausted", unit)))
            } else {
                Ok(1.0)
            }
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    struct PanickingWorkload;

    impl Workload for PanickingWorkload {
        fn execute(&self, unit: usize, _iterations: u64) -> Result<f64> {
            if unit == 0 {
                panic!("simulated crash");
            }
            Ok(1.0)
        }

        fn name(&self) -> &'static str {
            "panicking"
        }
    }

    struct FrozenClock;

    impl Clock for FrozenClock {
        fn now(&self) -> Duration {
            Duration::from_secs(42)
        }
    }

    fn small_config() -> BenchmarkConfig {
        BenchmarkConfig::new().with_workload_size(1_000)
    }

    #[tokio::test]
    async fn test_runs_exactly_one_unit_per_processing_unit() {
        let calls = Arc::new(AtomicUsize::new(0));
        let runner = BenchmarkRunner::with_environment(
            small_config(),
            CountingWorkload { calls: Arc::clone(&calls) },
            FixedTopology(Some(6)),
            MonotonicClock::new(),
        )
        .unwrap();

        let result = runner.run().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 6);
        assert_eq!(result.processing_units, 6);
        assert_eq!(result.checksum, 6_000.0);
        assert_eq!(result.workload_size, 1_000);
    }

    #[tokio::test]
    async fn test_each_run_requeries_processing_units() {
        let calls = Arc::new(AtomicUsize::new(0));
        let runner = BenchmarkRunner::with_environment(
            small_config(),
            CountingWorkload { calls: Arc::clone(&calls) },
            FixedTopology(Some(3)),
            MonotonicClock::new(),
        )
        .unwrap();

        runner.run().await.unwrap();
        runner.run().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 6);
    }

    #[tokio::test]
    async fn test_missing_topology_runs_single_unit() {
        let calls = Arc::new(AtomicUsize::new(0));
        let runner = BenchmarkRunner::with_environment(
            small_config(),
            CountingWorkload { calls: Arc::clone(&calls) },
            FixedTopology(None),
            MonotonicClock::new(),
        )
        .unwrap();

        let result = runner.run().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(result.processing_units, 1);
    }

    #[tokio::test]
    async fn test_zero_topology_runs_single_unit() {
        let calls = Arc::new(AtomicUsize::new(0));
        let runner = BenchmarkRunner::with_environment(
            small_config(),
            CountingWorkload { calls: Arc::clone(&calls) },
            FixedTopology(Some(0)),
            MonotonicClock::new(),
        )
        .unwrap();

        runner.run().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(runner.processing_units(), 1);
    }

    #[tokio::test]
    async fn test_zero_duration_yields_finite_positive_score() {
        let calls = Arc::new(AtomicUsize::new(0));
        let runner = BenchmarkRunner::with_environment(
            small_config(),
            CountingWorkload { calls },
            FixedTopology(Some(2)),
            FrozenClock,
        )
        .unwrap();

        let result = runner.run().await.unwrap();
        assert_eq!(result.duration, Duration::ZERO);
        assert!(result.score > 0);
        assert!((result.score as f64).is_finite());
    }

    #[tokio::test]
    async fn test_unit_failure_fails_the_run() {
        let calls = Arc::new(AtomicUsize::new(0));
        let runner = BenchmarkRunner::with_environment(
            small_config(),
            FailingWorkload {
                failing_unit: 2,
                calls: Arc::clone(&calls),
            },
            FixedTopology(Some(4)),
            MonotonicClock::new(),
        )
        .unwrap();

        let err = runner.run().await.unwrap_err();
        assert!(matches!(err, CpuOrbError::ExecutionFailure(_)));
        assert!(err.to_string().contains("unit 2 exhausted"));
        // the barrier still waits for the remaining units
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_unit_panic_fails_the_run() {
        let runner = BenchmarkRunner::with_environment(
            small_config(),
            PanickingWorkload,
            FixedTopology(Some(3)),
            MonotonicClock::new(),
        )
        .unwrap();

        let err = runner.run().await.unwrap_err();
        assert!(matches!(err, CpuOrbError::ExecutionFailure(_)));
    }

    #[tokio::test]
    async fn test_progress_reports_every_unit() {
        let calls = Arc::new(AtomicUsize::new(0));
        let runner = BenchmarkRunner::with_environment(
            small_config(),
            CountingWorkload { calls },
            FixedTopology(Some(5)),
            MonotonicClock::new(),
        )
        .unwrap();

        let (tx, mut rx) = mpsc::channel(16);
        runner.run_with_progress(tx).await.unwrap();

        let mut updates = Vec::new();
        while let Some(update) = rx.recv().await {
            updates.push(update);
        }

        assert_eq!(updates.len(), 5);
        let completed: Vec<usize> = updates.iter().map(|u| u.completed_units).collect();
        assert_eq!(completed, vec![1, 2, 3, 4, 5]);
        let last = updates.last().unwrap();
        assert_eq!(last.total_units, 5);
        assert_eq!(last.completion_percentage(), 1.0);
    }

    #[tokio::test]
    async fn test_dropped_progress_receiver_is_ignored() {
        let calls = Arc::new(AtomicUsize::new(0));
        let runner = BenchmarkRunner::with_environment(
            small_config(),
            CountingWorkload { calls },
            FixedTopology(Some(2)),
            MonotonicClock::new(),
        )
        .unwrap();

        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        assert!(runner.run_with_progress(tx).await.is_ok());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = BenchmarkRunner::system(BenchmarkConfig::new().with_workload_size(0));
        assert!(result.is_err());
    }

    #[test]
    fn test_progress_completion_percentage() {
        let update = ProgressUpdate {
            completed_units: 1,
            total_units: 4,
            elapsed: Duration::from_millis(10),
        };
        assert_eq!(update.completion_percentage(), 0.25);

        let empty = ProgressUpdate {
            completed_units: 0,
            total_units: 0,
            elapsed: Duration::ZERO,
        };
        assert_eq!(empty.completion_percentage(), 0.0);
    }

    #[tokio::test]
    async fn test_real_workload_small_run() {
        let runner = BenchmarkRunner::with_environment(
            small_config(),
            SqrtSumWorkload::new(),
            FixedTopology(Some(2)),
            MonotonicClock::new(),
        )
        .unwrap();

        let result = runner.run().await.unwrap();
        let expected = 2.0 * SqrtSumWorkload::reduce(1_000);
        assert!((result.checksum - expected).abs() < 1e-6);
        assert!(result.score > 0);
    }

    #[tokio::test]
    async fn test_results_carry_supplied_system_info() {
        let info = SystemInfo {
            os: "linux x86_64".to_string(),
            cpu: "Test CPU".to_string(),
        };
        let runner = BenchmarkRunner::with_environment(
            small_config(),
            SqrtSumWorkload::new(),
            FixedTopology(Some(1)),
            FrozenClock,
        )
        .unwrap()
        .with_system_info(info.clone());

        assert_eq!(runner.run().await.unwrap().system_info, info);
        assert_eq!(runner.run().await.unwrap().system_info, info);
    }

    #[tokio::test]
    async fn test_runner_without_system_info_leaves_cpu_unidentified() {
        let runner = BenchmarkRunner::with_environment(
            small_config(),
            SqrtSumWorkload::new(),
            FixedTopology(Some(1)),
            FrozenClock,
        )
        .unwrap();

        let result = runner.run().await.unwrap();
        assert_eq!(result.system_info.cpu, crate::models::result::UNKNOWN_CPU);
    }
}
