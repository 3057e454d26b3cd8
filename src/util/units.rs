//! Units formatting and conversion utilities
//!
//! Provides human-readable formatting for scores, durations and
//! iteration counts, and duration parsing for the command line.

use std::time::Duration;

/// Format a score with thousands separators
///
/// # Examples
/// ```
/// use cpuorb::util::units::format_score;
///
/// assert_eq!(format_score(950), "950");
/// assert_eq!(format_score(20000), "20,000");
/// assert_eq!(format_score(1234567), "1,234,567");
/// ```
pub fn format_score(score: u64) -> String {
    let digits = score.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    out
}

/// Format an iteration count with a metric suffix
///
/// # Examples
/// ```
/// use cpuorb::util::units::format_iterations;
///
/// assert_eq!(format_iterations(10_000_000), "10M");
/// assert_eq!(format_iterations(2_500), "2.5K");
/// ```
pub fn format_iterations(iterations: u64) -> String {
    const UNITS: &[(u64, &str)] = &[(1_000_000_000, "G"), (1_000_000, "M"), (1_000, "K")];

    for &(scale, suffix) in UNITS {
        if iterations >= scale {
            let value = iterations as f64 / scale as f64;
            return if iterations % scale == 0 {
                format!("{}{}", iterations / scale, suffix)
            } else {
                format!("{:.1}{}", value, suffix)
            };
        }
    }

    iterations.to_string()
}

/// Format duration into human-readable string
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use cpuorb::util::units::format_duration;
///
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if total_secs >= 3600 {
        let hours = total_secs / 3600;
        let minutes = (total_secs % 3600) / 60;
        let seconds = total_secs % 60;
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if total_secs >= 60 {
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{}m {}s", minutes, seconds)
    } else if total_secs > 0 {
        if millis > 0 {
            format!("{}.{:02}s", total_secs, millis / 10)
        } else {
            format!("{}s", total_secs)
        }
    } else if millis > 0 {
        format!("{}ms", millis)
    } else {
        format!("{}μs", duration.as_micros())
    }
}

/// Parse duration string into Duration
///
/// Accepts humantime syntax ("2s", "1500ms", "1m 30s") and bare seconds
/// ("2", "1.5").
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use cpuorb::util::units::parse_duration;
///
/// assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
/// assert_eq!(parse_duration("1.5").unwrap(), Duration::from_millis(1500));
/// ```
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let input = input.trim();

    if let Ok(secs) = input.parse::<f64>() {
        if !secs.is_finite() || secs < 0.0 {
            return Err(format!("Invalid duration: {}", input));
        }
        return Duration::try_from_secs_f64(secs)
            .map_err(|e| format!("Invalid duration {}: {}", input, e));
    }

    humantime::parse_duration(input).map_err(|e| format!("Invalid duration {}: {}", input, e))
}
