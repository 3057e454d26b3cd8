//! Plain terminal mode
//!
//! Runs one benchmark with an indicatif progress bar instead of the TUI and
//! prints either a text chart or the raw result as JSON.

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;

use crate::bench::{BenchmarkRunner, Clock, ProcessorTopology, ProgressUpdate, Workload};
use crate::config::Settings;
use crate::models::{BenchmarkResult, ComparisonChart, ReferenceTable, SystemInfo};
use crate::util::units::{format_duration, format_iterations, format_score};
use crate::Result;

/// Width of the text chart bars in cells
pub const TEXT_CHART_WIDTH: usize = 40;

/// Run the benchmark once and stream finished units to a progress bar.
pub async fn run_with_progress_bar<W, T, C>(
    runner: &BenchmarkRunner<W, T, C>,
) -> Result<BenchmarkResult>
where
    W: Workload,
    T: ProcessorTopology,
    C: Clock,
{
    let units = runner.processing_units();
    let pb = ProgressBar::new(units as u64);
    pb.set_style(
        ProgressStyle::with_template("{spinner} [{elapsed_precise}] {bar:30} {pos}/{len} units {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb.set_message(format!(
        "{} iterations each",
        format_iterations(runner.config().workload_size)
    ));
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let (tx, mut rx) = mpsc::channel::<ProgressUpdate>(units.max(1));
    let bar = pb.clone();
    let handle = tokio::spawn(async move {
        while let Some(progress) = rx.recv().await {
            bar.set_position(progress.completed_units as u64);
        }
    });

    let result = runner.run_with_progress(tx).await;
    handle.await.ok();

    match &result {
        Ok(r) => pb.finish_with_message(format!("done in {}", format_duration(r.duration))),
        Err(_) => pb.abandon_with_message("failed"),
    }

    result
}

/// Human-readable report: the comparison chart followed by the run details.
pub fn render_report(result: &BenchmarkResult, references: &ReferenceTable) -> String {
    let chart = ComparisonChart::build(references, Some(result.score), &result.system_info.cpu);
    let mut out = chart.to_text(TEXT_CHART_WIDTH);

    out.push('\n');
    out.push_str(&format!("Score:      {}\n", format_score(result.score)));
    out.push_str(&format!("Duration:   {}\n", format_duration(result.duration)));
    out.push_str(&format!("Units:      {}\n", result.processing_units));
    out.push_str(&format!(
        "Iterations: {} per unit\n",
        format_iterations(result.workload_size)
    ));
    out.push_str(&format!("Checksum:   {:.3e}\n", result.checksum));
    out
}

/// The result as pretty-printed JSON
pub fn render_json(result: &BenchmarkResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Run in plain mode and print the outcome to stdout.
pub async fn run_plain(settings: &Settings, json: bool) -> Result<BenchmarkResult> {
    let runner = BenchmarkRunner::system(settings.benchmark.clone())?
        .with_system_info(SystemInfo::detect());
    let result = run_with_progress_bar(&runner).await?;

    if json {
        println!("{}", render_json(&result)?);
    } else {
        println!("\n{}", render_report(&result, &settings.references));
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::environment::FixedTopology;
    use crate::bench::{MonotonicClock, SqrtSumWorkload};
    use crate::config::BenchmarkConfig;
    use std::time::Duration;

    fn sample_result() -> BenchmarkResult {
        BenchmarkResult::with_system_info(
            40_000,
            Duration::from_secs(1),
            8,
            10_000_000,
            123.5,
            SystemInfo {
                os: "linux x86_64".to_string(),
                cpu: "Test CPU".to_string(),
            },
        )
    }

    #[test]
    fn test_report_contains_chart_and_details() {
        let report = render_report(&sample_result(), &ReferenceTable::default());

        assert!(report.starts_with("CPU Performance Comparison\nYour CPU: Test CPU\n"));
        assert!(report.contains("Intel Core i9-13900K"));
        assert!(report.contains("Score:      40,000"));
        assert!(report.contains("Units:      8"));
        // Measured bar is drawn last
        let last_bar = report.lines().filter(|l| l.contains('│')).last().unwrap_or_default();
        assert!(last_bar.starts_with("Your CPU"));
    }

    #[test]
    fn test_json_output_parses_back() {
        let json = render_json(&sample_result()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["score"], 40_000);
        assert_eq!(value["processing_units"], 8);
        assert_eq!(value["system_info"]["cpu"], "Test CPU");
    }

    #[tokio::test]
    async fn test_progress_bar_run_completes() {
        let config = BenchmarkConfig::default().with_workload_size(1_000);
        let runner = BenchmarkRunner::with_environment(
            config,
            SqrtSumWorkload::new(),
            FixedTopology(Some(3)),
            MonotonicClock::new(),
        )
        .unwrap();

        let result = run_with_progress_bar(&runner).await.unwrap();
        assert_eq!(result.processing_units, 3);
        assert!(result.score > 0);
    }
}
