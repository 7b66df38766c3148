//! Units formatting and conversion utilities
//!
//! Provides functions for converting elapsed times to fractional
//! milliseconds and for human-readable throughput and fraction formatting.

use std::time::Duration;

/// Convert a duration to fractional milliseconds
///
/// # Examples
/// ```
/// use setbench::util::units::duration_to_ms;
/// use std::time::Duration;
///
/// assert_eq!(duration_to_ms(Duration::from_micros(1500)), 1.5);
/// assert_eq!(duration_to_ms(Duration::ZERO), 0.0);
/// ```
pub fn duration_to_ms(duration: Duration) -> f64 {
    duration.as_nanos() as f64 / 1_000_000.0
}

/// Format fractional milliseconds with three decimals
///
/// # Examples
/// ```
/// use setbench::util::units::format_ms;
///
/// assert_eq!(format_ms(12.34567), "12.346 ms");
/// ```
pub fn format_ms(ms: f64) -> String {
    format!("{:.3} ms", ms)
}

/// Operations per second over an elapsed time, 0 when no time elapsed
pub fn calculate_ops_per_sec(operations: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        operations as f64 / secs
    } else {
        0.0
    }
}

/// Format an operation rate with K/M suffixes
///
/// # Examples
/// ```
/// use setbench::util::units::format_ops_per_sec;
///
/// assert_eq!(format_ops_per_sec(950.0), "950 ops/s");
/// assert_eq!(format_ops_per_sec(12_500.0), "12.5K ops/s");
/// assert_eq!(format_ops_per_sec(3_200_000.0), "3.2M ops/s");
/// ```
pub fn format_ops_per_sec(rate: f64) -> String {
    if rate >= 1_000_000.0 {
        format!("{:.1}M ops/s", rate / 1_000_000.0)
    } else if rate >= 1_000.0 {
        format!("{:.1}K ops/s", rate / 1_000.0)
    } else {
        format!("{:.0} ops/s", rate)
    }
}
