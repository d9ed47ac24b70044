//! Human-readable duration formatting
//!
//! Durations come in as fractional milliseconds and are printed with a unit
//! picked from fixed thresholds. Values are truncated, never rounded, so the
//! same input always produces the same string.

/// Format a non-negative duration in milliseconds
///
/// | duration (ms) | output             |
/// |---------------|--------------------|
/// | `>= 10000`    | whole seconds, `s` |
/// | `>= 10`       | whole ms, `ms`     |
/// | `>= 0.01`     | whole µs, `µs`     |
/// | otherwise     | whole ns, `ns`, or `0` |
///
/// # Example
/// ```
/// use wasmbench::format::format_duration;
///
/// assert_eq!(format_duration(15000.0), "15s");
/// assert_eq!(format_duration(0.05), "50µs");
/// assert_eq!(format_duration(0.0000004), "0");
/// ```
pub fn format_duration(ms: f64) -> String {
    if ms >= 10_000.0 {
        format!("{}s", truncate(ms / 1000.0))
    } else if ms >= 10.0 {
        format!("{}ms", truncate(ms))
    } else if ms >= 0.01 {
        format!("{}µs", truncate(ms * 1000.0))
    } else {
        match truncate(ms * 1_000_000.0) {
            0 => "0".to_string(),
            ns => format!("{}ns", ns),
        }
    }
}

// Saturating float-to-int cast: negatives and NaN become 0.
fn truncate(value: f64) -> u64 {
    value.trunc() as u64
}
