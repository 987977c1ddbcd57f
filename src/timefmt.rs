//! `MM:SS` formatting for the transport readout.

use std::time::Duration;

/// Rendered for NaN, negative or infinite input.
pub const ZERO_MMSS: &str = "00:00";

/// Format `seconds` as `MM:SS`, truncating fractional seconds.
///
/// Minutes are not wrapped into hours: one hour renders as `60:00`.
pub fn format_mmss(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return ZERO_MMSS.to_string();
    }
    let whole = seconds.trunc() as u64;
    format!("{:02}:{:02}", whole / 60, whole % 60)
}

/// Format an optional duration; `None` means "not known yet".
pub fn format_duration(d: Option<Duration>) -> String {
    format_mmss(d.map_or(f64::NAN, |d| d.as_secs_f64()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_renders_zero() {
        assert_eq!(format_mmss(f64::NAN), "00:00");
        assert_eq!(format_mmss(-1.0), "00:00");
        assert_eq!(format_mmss(f64::INFINITY), "00:00");
        assert_eq!(format_duration(None), "00:00");
    }

    #[test]
    fn truncates_and_carries_into_minutes() {
        assert_eq!(format_mmss(0.0), "00:00");
        assert_eq!(format_mmss(59.999), "00:59");
        assert_eq!(format_mmss(61.5), "01:01");
        assert_eq!(format_mmss(600.0), "10:00");
    }

    #[test]
    fn minutes_are_unbounded() {
        assert_eq!(format_mmss(3600.0), "60:00");
        assert_eq!(format_mmss(6001.0), "100:01");
        assert_eq!(format_duration(Some(Duration::from_millis(125_900))), "02:05");
    }
}
