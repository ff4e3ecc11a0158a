//! # Duration Validation
//!
//! Parses human-readable duration strings used by the policy document and
//! the command-line flags.
//!
//! Accepts the Go duration grammar (`300ms`, `1.5h`, `2h45m`) plus the
//! Kubernetes-style day unit (`1d`).

use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DurationError {
    #[error("duration string cannot be empty")]
    Empty,
    #[error("invalid duration format '{0}'. Expected <number><unit>[...] (e.g. '30s', '5m', '1h30m')")]
    InvalidFormat(String),
    #[error("duration '{0}' must be greater than zero")]
    NotPositive(String),
    #[error("duration '{0}' is out of range")]
    OutOfRange(String),
}

// Whole-string shape: one or more <number><unit> components
static DURATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?:\d+(?:\.\d*)?|\.\d+)(?:ns|us|µs|μs|ms|s|m|h|d))+$")
        .expect("Failed to compile duration pattern - this should never happen")
});

static DURATION_COMPONENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<number>\d+(?:\.\d*)?|\.\d+)(?P<unit>ns|us|µs|μs|ms|s|m|h|d)")
        .expect("Failed to compile duration component pattern - this should never happen")
});

/// Parse a duration string into [`Duration`]
///
/// Zero (`0`, `0s`) parses successfully; negative values are rejected.
pub fn parse_duration(duration_str: &str) -> Result<Duration, DurationError> {
    let trimmed = duration_str.trim();
    if trimmed.is_empty() {
        return Err(DurationError::Empty);
    }

    if let Some(rest) = trimmed.strip_prefix('-') {
        return match parse_duration(rest) {
            Ok(duration) if duration.is_zero() => Ok(duration),
            Ok(_) => Err(DurationError::NotPositive(trimmed.to_string())),
            Err(_) => Err(DurationError::InvalidFormat(trimmed.to_string())),
        };
    }
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);

    // Go accepts a bare "0" without unit
    if unsigned == "0" {
        return Ok(Duration::ZERO);
    }

    if !DURATION_PATTERN.is_match(unsigned) {
        return Err(DurationError::InvalidFormat(trimmed.to_string()));
    }

    let out_of_range = || DurationError::OutOfRange(trimmed.to_string());
    let mut total_nanos: u128 = 0;
    for captures in DURATION_COMPONENT.captures_iter(unsigned) {
        let unit_nanos: u128 = match &captures["unit"] {
            "ns" => 1,
            "us" | "µs" | "μs" => 1_000,
            "ms" => 1_000_000,
            "s" => 1_000_000_000,
            "m" => 60 * 1_000_000_000,
            "h" => 3_600 * 1_000_000_000,
            "d" => 86_400 * 1_000_000_000,
            _ => return Err(DurationError::InvalidFormat(trimmed.to_string())),
        };

        let (whole, fraction) = captures["number"]
            .split_once('.')
            .unwrap_or((&captures["number"], ""));
        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| out_of_range())?
        };
        let mut component = whole.checked_mul(unit_nanos).ok_or_else(out_of_range)?;

        // Fractional digits beyond nanosecond precision are truncated
        if !fraction.is_empty() {
            let digits = &fraction[..fraction.len().min(18)];
            let numerator: u128 = digits.parse().map_err(|_| out_of_range())?;
            let scale = 10_u128.pow(u32::try_from(digits.len()).map_err(|_| out_of_range())?);
            component = component
                .checked_add(numerator * unit_nanos / scale)
                .ok_or_else(out_of_range)?;
        }

        total_nanos = total_nanos.checked_add(component).ok_or_else(out_of_range)?;
    }

    let secs = u64::try_from(total_nanos / 1_000_000_000).map_err(|_| out_of_range())?;
    let nanos = u32::try_from(total_nanos % 1_000_000_000).map_err(|_| out_of_range())?;
    Ok(Duration::new(secs, nanos))
}

/// Parse a duration that must be strictly positive
pub fn parse_positive_duration(duration_str: &str) -> Result<Duration, DurationError> {
    let duration = parse_duration(duration_str)?;
    if duration.is_zero() {
        return Err(DurationError::NotPositive(duration_str.trim().to_string()));
    }
    Ok(duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_units() {
        assert_eq!(parse_duration("30s").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_duration("10m").unwrap(), Duration::from_secs(600));
        assert_eq!(parse_duration("2h").unwrap(), Duration::from_secs(7200));
        assert_eq!(parse_duration("1d").unwrap(), Duration::from_secs(86400));
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_duration("15us").unwrap(), Duration::from_micros(15));
        assert_eq!(parse_duration("  5s  ").unwrap(), Duration::from_secs(5));
    }

    #[test]
    fn test_parse_compound_and_fractional() {
        assert_eq!(parse_duration("1h30m").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse_duration("2h45m10s").unwrap(), Duration::from_secs(9910));
        assert_eq!(parse_duration("1.5h").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse_duration(".5s").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_duration("+1m").unwrap(), Duration::from_secs(60));
    }

    #[test]
    fn test_parse_zero() {
        assert_eq!(parse_duration("0").unwrap(), Duration::ZERO);
        assert_eq!(parse_duration("0s").unwrap(), Duration::ZERO);
        assert_eq!(
            parse_positive_duration("0s"),
            Err(DurationError::NotPositive("0s".to_string()))
        );
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(parse_duration(""), Err(DurationError::Empty));
        assert_eq!(parse_duration("   "), Err(DurationError::Empty));
        for invalid in ["10", "abc", "10x", "m10", "1h 30m", "1.2.3s", "s"] {
            assert!(
                matches!(parse_duration(invalid), Err(DurationError::InvalidFormat(_))),
                "'{invalid}' should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_negative() {
        assert_eq!(
            parse_duration("-5m"),
            Err(DurationError::NotPositive("-5m".to_string()))
        );
        assert_eq!(
            parse_positive_duration("-1s"),
            Err(DurationError::NotPositive("-1s".to_string()))
        );
    }
}
