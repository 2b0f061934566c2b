//! Per-second rates from cumulative counters, and how they are printed.

use chrono::{DateTime, TimeZone};

/// Elapsed time substituted when the clock did not move forward.
const FALLBACK_ELAPSED_SECS: f64 = 1.0;

/// Bytes/second between two readings of a cumulative counter.
///
/// Never negative and never divides by zero: a counter that went backwards
/// (reset, reboot, wrap) counts as no traffic, and a non-positive elapsed
/// time is replaced with one second.
pub fn per_second<Tz: TimeZone>(
    prev: u64,
    prev_at: &DateTime<Tz>,
    curr: u64,
    curr_at: &DateTime<Tz>,
) -> f64 {
    // Negative spans fail `to_std` and take the fallback below.
    let elapsed = curr_at
        .clone()
        .signed_duration_since(prev_at.clone())
        .to_std()
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0);
    per_second_over(prev, curr, elapsed)
}

/// As [`per_second`], with the elapsed time already in seconds.
pub fn per_second_over(prev: u64, curr: u64, elapsed_secs: f64) -> f64 {
    let dt = if elapsed_secs > 0.0 {
        elapsed_secs
    } else {
        FALLBACK_ELAPSED_SECS
    };
    curr.saturating_sub(prev) as f64 / dt
}

/// Render a bytes/second rate: KB/s up to and including 1024 KB/s, MB/s
/// beyond.
pub fn format_rate(bytes_per_sec: f64) -> String {
    let kb = bytes_per_sec / 1024.0;
    if kb > 1024.0 {
        format!("{:.2} MB/s", kb / 1024.0)
    } else {
        format!("{kb:.1} KB/s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn steady_rate() {
        assert_eq!(per_second(1_000, &at(0), 2_024, &at(1)), 1_024.0);
        assert!((per_second(0, &at(0), 3_000, &at(4)) - 750.0).abs() < 1e-9);
    }

    #[test]
    fn sub_second_elapsed_is_scaled_up() {
        assert!((per_second_over(0, 500, 0.5) - 1_000.0).abs() < 1e-9);
    }

    #[test]
    fn sub_millisecond_gap_is_not_rounded_away() {
        let t0 = at(0);
        let t1 = t0 + chrono::TimeDelta::microseconds(500);
        assert!((per_second(0, &t0, 1_000, &t1) - 2_000_000.0).abs() < 1e-3);
    }

    #[test]
    fn fractional_millisecond_gap_keeps_full_precision() {
        let t0 = at(0);
        let t1 = t0 + chrono::TimeDelta::microseconds(1_999_999);
        let exact = 1_000_000.0 / 1.999_999;
        assert!((per_second(0, &t0, 1_000_000, &t1) - exact).abs() < 1e-6);
    }

    #[test]
    fn counter_regression_clamps_to_zero() {
        assert_eq!(per_second(5_000, &at(0), 10, &at(1)), 0.0);
    }

    #[test]
    fn non_positive_elapsed_falls_back_to_one_second() {
        assert_eq!(per_second(0, &at(5), 800, &at(5)), 800.0);
        assert_eq!(per_second(0, &at(5), 800, &at(2)), 800.0);
        assert_eq!(per_second_over(0, 800, f64::NAN), 800.0);
    }

    #[test]
    fn format_stays_in_kb_at_the_threshold() {
        assert_eq!(format_rate(0.0), "0.0 KB/s");
        assert_eq!(format_rate(1_024.0), "1.0 KB/s");
        assert_eq!(format_rate(1_024.0 * 1_024.0), "1024.0 KB/s");
    }

    #[test]
    fn format_switches_to_mb_above_threshold() {
        assert_eq!(format_rate(1_024.0 * 1_024.0 * 2.5), "2.50 MB/s");
        assert_eq!(format_rate(1_024.0 * 1_025.0), "1.00 MB/s");
    }
}
