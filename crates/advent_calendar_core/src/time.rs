//! crates/advent_calendar_core/src/time.rs
//!
//! Timestamp parsing and formatting shared by the document adapter and the web layer.
//!
//! Dates arrive in several shapes: full RFC 3339 strings, naive date-times
//! from browser `datetime-local` inputs, and bare dates. Anything without an
//! offset is read as UTC.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat};
use crate::ports::{PortError, PortResult};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parses a timestamp in any accepted shape.
pub fn parse_timestamp(raw: &str) -> PortResult<DateTime<FixedOffset>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt);
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc().fixed_offset());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
        .ok_or_else(|| PortError::InvalidDate(format!("'{}' is not a recognised timestamp", raw)))
}

/// Formats a timestamp as RFC 3339, using `Z` for UTC.
pub fn format_timestamp(dt: &DateTime<FixedOffset>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339_with_offset() {
        let dt = parse_timestamp("2024-12-25T00:00:00+01:00").unwrap();
        assert_eq!(dt.offset().local_minus_utc(), 3600);
        assert_eq!(format_timestamp(&dt), "2024-12-25T00:00:00+01:00");
    }

    #[test]
    fn naive_inputs_are_read_as_utc() {
        let full = parse_timestamp("2024-12-25T00:00:00").unwrap();
        let short = parse_timestamp("2024-12-25T00:00").unwrap();
        let date = parse_timestamp("2024-12-25").unwrap();
        assert_eq!(full, short);
        assert_eq!(full, date);
        assert_eq!(format_timestamp(&full), "2024-12-25T00:00:00Z");
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(parse_timestamp("next tuesday"), Err(PortError::InvalidDate(_))));
    }
}
