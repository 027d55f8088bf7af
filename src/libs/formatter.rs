//! Duration formatting for console output.
//!
//! ## Formats
//!
//! - [`format_hms`]: `HH:MM:SS`, hours unbounded (`123:04:05`).
//! - [`format_hm_rounded`]: rounded to the nearest minute, `7min` or
//!   `1h 05min`. Thirty seconds round up.
//! - [`format_minutes_rounded`]: the same rounding for a seconds count, used
//!   for the "of last 30 mins" figure.
//!
//! Negative inputs are treated as zero.
//!
//! ## Examples
//!
//! ```rust
//! use devrhythm::libs::formatter::{format_hm_rounded, format_hms};
//!
//! assert_eq!(format_hms(3_725_000), "01:02:05");
//! assert_eq!(format_hm_rounded(7 * 60_000 + 30_000), "8min");
//! ```

use std::time::Duration;

/// `HH:MM:SS` for a millisecond count.
pub fn format_hms(ms: i64) -> String {
    let total_sec = ms.max(0) / 1000;
    let h = total_sec / 3600;
    let m = (total_sec % 3600) / 60;
    let s = total_sec % 60;
    format!("{:02}:{:02}:{:02}", h, m, s)
}

fn rounded_minutes(total_sec: i64) -> String {
    let rounded_min = (total_sec.max(0) + 30) / 60;
    let h = rounded_min / 60;
    let m = rounded_min % 60;
    if h > 0 {
        format!("{}h {:02}min", h, m)
    } else {
        format!("{}min", m)
    }
}

/// Milliseconds rounded to the nearest minute.
pub fn format_hm_rounded(ms: i64) -> String {
    rounded_minutes(ms.max(0) / 1000)
}

/// Seconds rounded to the nearest minute.
pub fn format_minutes_rounded(secs: u32) -> String {
    if secs == 0 {
        return "0min".to_string();
    }
    rounded_minutes(i64::from(secs))
}

/// Percent of project time spent active and idle, one decimal place each.
///
/// Active time is capped at project time so the pair always sums to 100.
pub fn activity_percentages(total_project_ms: i64, total_active_ms: i64) -> (f64, f64) {
    let project = total_project_ms.max(0) as f64;
    let active = total_active_ms.max(0).min(total_project_ms.max(0)) as f64;
    let pct_active = if project > 0.0 { active / project * 100.0 } else { 0.0 };
    let pct_idle = (100.0 - pct_active).clamp(0.0, 100.0);
    (pct_active, pct_idle)
}

/// `HH:MM:SS` for a `Duration`.
pub fn format_duration(duration: &Duration) -> String {
    format_hms(i64::try_from(duration.as_millis()).unwrap_or(i64::MAX))
}
