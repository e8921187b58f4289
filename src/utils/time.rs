//! Lenient duration parsing.
//!
//! Time columns in classifier output and hand-labeled spreadsheets carry
//! a mix of formats: plain seconds (`"90"`), minute-second notation
//! (`"1m30s"`), and clock notation (`"01:30"`). Unparseable input
//! degrades to zero with a warning rather than failing an import.

use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

/// Minute-second notation, both parts optional: `1m30s`, `2m`, `12.5s`.
const MINUTE_SECOND_PATTERN: &str = r"^(?:(\d+)m)?(?:(\d+(?:\.\d+)?)s)?";

fn minute_second_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::unwrap_used)] // pattern is a checked literal
    RE.get_or_init(|| Regex::new(MINUTE_SECOND_PATTERN).unwrap())
}

/// Parse a textual duration into seconds.
///
/// Resolution order:
/// 1. plain number, returned as-is
/// 2. `<minutes>m<seconds>s` with either part optional
/// 3. `<minutes>:<seconds>`
///
/// Anything else (including empty input) yields `0.0` with a warning;
/// this function never fails the caller.
pub fn parse_time_to_seconds(input: &str) -> f64 {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        warn!("empty time value, using 0.0");
        return 0.0;
    }

    if let Ok(value) = trimmed.parse::<f64>() {
        return value;
    }

    if let Some(caps) = minute_second_regex().captures(trimmed)
        && (caps.get(1).is_some() || caps.get(2).is_some())
    {
        let minutes = caps
            .get(1)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .unwrap_or(0.0);
        let seconds = caps
            .get(2)
            .and_then(|s| s.as_str().parse::<f64>().ok())
            .unwrap_or(0.0);
        return minutes.mul_add(60.0, seconds);
    }

    if trimmed.contains(':') {
        let parts: Vec<&str> = trimmed.split(':').collect();
        if parts.len() == 2
            && let (Ok(minutes), Ok(seconds)) =
                (parts[0].trim().parse::<f64>(), parts[1].trim().parse::<f64>())
        {
            return minutes.mul_add(60.0, seconds);
        }
    }

    warn!("could not parse time '{trimmed}', using 0.0");
    0.0
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_number_passes_through() {
        assert_eq!(parse_time_to_seconds("90"), 90.0);
        assert_eq!(parse_time_to_seconds("0"), 0.0);
        assert_eq!(parse_time_to_seconds("12.5"), 12.5);
    }

    #[test]
    fn test_minute_second_notation() {
        assert_eq!(parse_time_to_seconds("1m30s"), 90.0);
        assert_eq!(parse_time_to_seconds("0m0s"), 0.0);
        assert_eq!(parse_time_to_seconds("10m2.5s"), 602.5);
    }

    #[test]
    fn test_minute_only_and_second_only() {
        assert_eq!(parse_time_to_seconds("2m"), 120.0);
        assert_eq!(parse_time_to_seconds("12.5s"), 12.5);
    }

    #[test]
    fn test_clock_notation() {
        assert_eq!(parse_time_to_seconds("01:30"), 90.0);
        assert_eq!(parse_time_to_seconds("0:05"), 5.0);
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        assert_eq!(parse_time_to_seconds("  1m30s  "), 90.0);
    }

    #[test]
    fn test_unparseable_degrades_to_zero() {
        assert_eq!(parse_time_to_seconds(""), 0.0);
        assert_eq!(parse_time_to_seconds("abc"), 0.0);
        assert_eq!(parse_time_to_seconds("1h"), 0.0);
        assert_eq!(parse_time_to_seconds("1:2:3"), 0.0);
    }
}
