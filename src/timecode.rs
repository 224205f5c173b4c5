use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::MalformedTimestamp;

static SRT_TIMESTAMP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{2}):(\d{2}):(\d{2}),(\d{3})$").unwrap());

/// Parse an SRT timestamp (`HH:MM:SS,mmm`) into seconds.
///
/// The grammar is strict: exactly 2-2-2-3 digit groups with `:`/`,`
/// separators. Anything else is a [`MalformedTimestamp`].
pub fn parse_srt_timestamp(s: &str) -> Result<f64, MalformedTimestamp> {
    let caps = SRT_TIMESTAMP
        .captures(s.trim())
        .ok_or_else(|| MalformedTimestamp(s.to_string()))?;

    // Captures are all-digit groups, so the integer parses cannot fail.
    let hours: u64 = caps[1].parse().unwrap_or(0);
    let minutes: u64 = caps[2].parse().unwrap_or(0);
    let seconds: u64 = caps[3].parse().unwrap_or(0);
    let millis: u64 = caps[4].parse().unwrap_or(0);

    Ok((hours * 3600 + minutes * 60 + seconds) as f64 + millis as f64 / 1000.0)
}

/// Format seconds as an SRT timestamp (`HH:MM:SS,mmm`).
pub fn format_srt_timestamp(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;
    format!("{hours:02}:{minutes:02}:{secs:02},{millis:03}")
}

/// End time of a cue given its start and duration, both in seconds.
pub fn end_seconds(start: f64, duration: f64) -> f64 {
    start + duration
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_srt_timestamp() {
        assert_eq!(parse_srt_timestamp("00:00:10,500").unwrap(), 10.5);
        assert_eq!(parse_srt_timestamp("00:01:30,250").unwrap(), 90.25);
        assert_eq!(parse_srt_timestamp("01:23:45,678").unwrap(), 5025.678);
        assert_eq!(parse_srt_timestamp("00:00:00,000").unwrap(), 0.0);
    }

    #[test]
    fn test_parse_srt_timestamp_rejects_malformed() {
        for bad in [
            "0:00:10,500",    // short hour group
            "00:00:10.500",   // dot separator
            "00:00:10,50",    // short millis
            "00:00:10",       // missing millis
            "aa:bb:cc,ddd",   // non-digits
            "00-00-10,500",   // wrong separators
            "",
        ] {
            assert!(parse_srt_timestamp(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_parse_srt_timestamp_reports_input() {
        let err = parse_srt_timestamp("nope").unwrap_err();
        assert_eq!(err, MalformedTimestamp("nope".to_string()));
    }

    #[test]
    fn test_format_srt_timestamp() {
        assert_eq!(format_srt_timestamp(0.0), "00:00:00,000");
        assert_eq!(format_srt_timestamp(10.5), "00:00:10,500");
        assert_eq!(format_srt_timestamp(3661.5), "01:01:01,500");
        assert_eq!(format_srt_timestamp(5025.678), "01:23:45,678");
    }

    #[test]
    fn test_format_parse_round_trip() {
        for secs in [0.0, 1.25, 59.999, 3600.0, 7322.041] {
            let formatted = format_srt_timestamp(secs);
            let parsed = parse_srt_timestamp(&formatted).unwrap();
            assert!((parsed - secs).abs() < 0.001, "{secs} -> {formatted} -> {parsed}");
        }
    }

    #[test]
    fn test_end_seconds() {
        assert_eq!(end_seconds(10.5, 2.25), 12.75);
        assert_eq!(end_seconds(0.0, 0.0), 0.0);
    }
}
