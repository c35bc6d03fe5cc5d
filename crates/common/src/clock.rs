//! Wall-clock helpers for camera timestamps.
//!
//! The camera service reports every timestamp as fractional seconds since
//! the Unix epoch. This module converts between that representation and
//! RFC 3339 strings for command-line input and log output.

use chrono::{DateTime, Utc};

use crate::error::{CamlapseError, CamlapseResult};

/// Fractional seconds since the Unix epoch.
pub type EpochSecs = f64;

/// Seconds in one hour.
pub const SECS_PER_HOUR: f64 = 3600.0;

/// Format epoch seconds as an RFC 3339 UTC string.
///
/// Values outside chrono's representable range fall back to the raw number.
pub fn format_epoch(secs: EpochSecs) -> String {
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1_000_000_000.0).round() as u32;
    match DateTime::<Utc>::from_timestamp(whole as i64, nanos.min(999_999_999)) {
        Some(dt) => dt.to_rfc3339(),
        None => format!("{secs}"),
    }
}

/// Parse either plain epoch seconds (`1700000000.5`) or an RFC 3339 string.
pub fn parse_epoch(input: &str) -> CamlapseResult<EpochSecs> {
    let trimmed = input.trim();
    if let Ok(secs) = trimmed.parse::<f64>() {
        if secs.is_finite() {
            return Ok(secs);
        }
    }

    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| {
            dt.timestamp() as f64 + f64::from(dt.timestamp_subsec_nanos()) / 1_000_000_000.0
        })
        .map_err(|e| {
            CamlapseError::invalid_parameter(format!(
                "'{trimmed}' is neither epoch seconds nor an RFC 3339 time: {e}"
            ))
        })
}

/// Convert a span in seconds to hours.
pub fn secs_to_hours(secs: f64) -> f64 {
    secs / SECS_PER_HOUR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_epoch() {
        assert_eq!(parse_epoch("1700000000").unwrap(), 1_700_000_000.0);
        assert_eq!(parse_epoch(" 12.5 ").unwrap(), 12.5);
    }

    #[test]
    fn test_parse_rfc3339() {
        let secs = parse_epoch("2023-11-14T22:13:20Z").unwrap();
        assert_eq!(secs, 1_700_000_000.0);

        let offset = parse_epoch("2023-11-14T23:13:20+01:00").unwrap();
        assert_eq!(offset, 1_700_000_000.0);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_epoch("yesterday"),
            Err(CamlapseError::InvalidParameter { .. })
        ));
        assert!(parse_epoch("NaN").is_err());
    }

    #[test]
    fn test_format_epoch_roundtrip() {
        let formatted = format_epoch(1_700_000_000.0);
        assert!(formatted.starts_with("2023-11-14T22:13:20"));
        assert_eq!(parse_epoch(&formatted).unwrap(), 1_700_000_000.0);
    }

    #[test]
    fn test_secs_to_hours() {
        assert!((secs_to_hours(5400.0) - 1.5).abs() < 1e-12);
    }
}
