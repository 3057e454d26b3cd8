//! Benchmark result data models
//!
//! Contains the value produced by one benchmark run and the system
//! information captured alongside it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use sysinfo::{CpuRefreshKind, RefreshKind, System};

/// Outcome of one benchmark run
///
/// Produced fresh by every run and owned by the caller; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Dimensionless score relative to the reference machine
    pub score: u64,
    /// Wall-clock duration of the whole fan-out
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Number of workload units executed in parallel
    pub processing_units: usize,
    /// Iterations per workload unit
    pub workload_size: u64,
    /// Sum of all workload outputs
    pub checksum: f64,
    /// Timestamp when the run finished
    pub timestamp: DateTime<Utc>,
    /// System information at time of benchmark
    pub system_info: SystemInfo,
}

impl BenchmarkResult {
    /// Create a new result stamped with the current time, CPU left unidentified
    pub fn new(
        score: u64,
        duration: Duration,
        processing_units: usize,
        workload_size: u64,
        checksum: f64,
    ) -> Self {
        Self::with_system_info(
            score,
            duration,
            processing_units,
            workload_size,
            checksum,
            SystemInfo::unidentified(),
        )
    }

    /// Create a new result with custom system info
    pub fn with_system_info(
        score: u64,
        duration: Duration,
        processing_units: usize,
        workload_size: u64,
        checksum: f64,
        system_info: SystemInfo,
    ) -> Self {
        Self {
            score,
            duration,
            processing_units,
            workload_size,
            checksum,
            timestamp: Utc::now(),
            system_info,
        }
    }

    /// Wall-clock duration in seconds
    pub fn duration_secs(&self) -> f64 {
        self.duration.as_secs_f64()
    }

    /// Get a human-readable summary of the benchmark result
    pub fn summary(&self) -> String {
        use crate::util::units::{format_duration, format_score};

        format!(
            "{} - {} points - {} on {} units",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            format_score(self.score),
            format_duration(self.duration),
            self.processing_units
        )
    }
}

/// System information captured at benchmark time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemInfo {
    /// Operating system name and architecture
    pub os: String,
    /// CPU brand string
    pub cpu: String,
}

impl Default for SystemInfo {
    fn default() -> Self {
        Self {
            os: detect_os(),
            cpu: detect_cpu(),
        }
    }
}

impl SystemInfo {
    /// Create system info by detecting current system
    pub fn detect() -> Self {
        Self::default()
    }

    /// OS only, without querying the CPU
    pub fn unidentified() -> Self {
        Self {
            os: detect_os(),
            cpu: UNKNOWN_CPU.to_string(),
        }
    }
}

/// Fallback brand when the CPU cannot be identified
pub const UNKNOWN_CPU: &str = "Unknown CPU";

fn detect_os() -> String {
    format!("{} {}", std::env::consts::OS, std::env::consts::ARCH)
}

/// Detect the CPU brand string, falling back to [`UNKNOWN_CPU`]
pub fn detect_cpu() -> String {
    let sys = System::new_with_specifics(RefreshKind::new().with_cpu(CpuRefreshKind::new()));
    brand_or_unknown(sys.cpus().first().map(|cpu| cpu.brand()))
}

fn brand_or_unknown(brand: Option<&str>) -> String {
    brand
        .map(str::trim)
        .filter(|brand| !brand.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN_CPU.to_string())
}

// Duration travels as nanoseconds in JSON output
mod duration_serde {
    use serde::{de::Error, Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_nanos().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let nanos = u128::deserialize(deserializer)?;
        let nanos = u64::try_from(nanos).map_err(D::Error::custom)?;
        Ok(Duration::from_nanos(nanos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_system_info() -> SystemInfo {
        SystemInfo {
            os: "linux x86_64".to_string(),
            cpu: "AMD Ryzen 7 7700X 8-Core Processor".to_string(),
        }
    }

    fn create_test_result() -> BenchmarkResult {
        BenchmarkResult::with_system_info(
            40_000,
            Duration::from_secs(1),
            8,
            10_000_000,
            1234.5,
            create_test_system_info(),
        )
    }

    #[test]
    fn test_benchmark_result_creation() {
        let result = create_test_result();
        assert_eq!(result.score, 40_000);
        assert_eq!(result.duration_secs(), 1.0);
        assert_eq!(result.processing_units, 8);
        assert_eq!(result.system_info.cpu, "AMD Ryzen 7 7700X 8-Core Processor");
        assert!(result.timestamp <= Utc::now());
    }

    #[test]
    fn test_benchmark_result_summary() {
        let summary = create_test_result().summary();
        assert!(summary.contains("40,000 points"));
        assert!(summary.contains("1s"));
        assert!(summary.contains("8 units"));
    }

    #[test]
    fn test_json_output_keeps_duration_exact() {
        let result = create_test_result();
        let json = serde_json::to_string(&result).expect("Failed to serialize to JSON");
        assert!(json.contains("\"duration\":1000000000"));

        let deserialized: BenchmarkResult =
            serde_json::from_str(&json).expect("Failed to deserialize from JSON");
        assert_eq!(deserialized.duration, result.duration);
        assert_eq!(deserialized.system_info, result.system_info);
        assert_eq!(deserialized.timestamp, result.timestamp);
    }

    #[test]
    fn test_duration_beyond_u64_nanos_is_rejected() {
        let json = serde_json::to_string(&create_test_result()).expect("Failed to serialize to JSON");
        let oversized = json.replace(
            "\"duration\":1000000000",
            "\"duration\":18446744073709551616",
        );
        assert_ne!(oversized, json);
        assert!(serde_json::from_str::<BenchmarkResult>(&oversized).is_err());
    }

    #[test]
    fn test_brand_is_trimmed() {
        assert_eq!(
            brand_or_unknown(Some("  Intel(R) Core(TM) i7-13700K \n")),
            "Intel(R) Core(TM) i7-13700K"
        );
    }

    #[test]
    fn test_missing_or_blank_brand_falls_back() {
        assert_eq!(brand_or_unknown(None), UNKNOWN_CPU);
        assert_eq!(brand_or_unknown(Some("   ")), UNKNOWN_CPU);
    }

    #[test]
    fn test_new_result_does_not_identify_cpu() {
        let result = BenchmarkResult::new(1, Duration::from_secs(1), 1, 1, 0.0);
        assert_eq!(result.system_info.cpu, UNKNOWN_CPU);
        assert!(!result.system_info.os.is_empty());
    }

    #[test]
    fn test_system_info_detection() {
        let system_info = SystemInfo::detect();
        assert!(!system_info.os.is_empty());
        assert!(!system_info.cpu.is_empty());
    }
}
