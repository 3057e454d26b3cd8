//! Duration to score conversion

use std::time::Duration;

/// Default duration a reference machine needs for the benchmark
pub const DEFAULT_REFERENCE_DURATION: Duration = Duration::from_secs(2);

/// Default score awarded for matching the reference duration
pub const DEFAULT_REFERENCE_SCORE: u64 = 20_000;

/// Shortest duration used in the score formula
pub const MIN_MEASURABLE_DURATION: Duration = Duration::from_micros(1);

/// Score normalisation against a reference machine
///
/// `score = round(reference_duration / duration * reference_score)`, so the
/// score is inversely proportional to the measured duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringModel {
    pub reference_duration: Duration,
    pub reference_score: u64,
}

impl Default for ScoringModel {
    fn default() -> Self {
        Self {
            reference_duration: DEFAULT_REFERENCE_DURATION,
            reference_score: DEFAULT_REFERENCE_SCORE,
        }
    }
}

impl ScoringModel {
    pub fn new(reference_duration: Duration, reference_score: u64) -> Self {
        Self {
            reference_duration,
            reference_score,
        }
    }

    /// Convert a measured wall-clock duration into a score
    pub fn score(&self, duration: Duration) -> u64 {
        let measured = if duration < MIN_MEASURABLE_DURATION {
            tracing::debug!(?duration, "duration below clock resolution, flooring");
            MIN_MEASURABLE_DURATION
        } else {
            duration
        };

        let ratio = self.reference_duration.as_secs_f64() / measured.as_secs_f64();
        (ratio * self.reference_score as f64).round() as u64
    }
}
