// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting and parsing.

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
///
/// This is the format the WHOOP collection endpoints expect for the
/// `start`/`end` query parameters.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse a CLI date argument: either a full RFC3339 timestamp or a plain
/// `YYYY-MM-DD` day, interpreted as midnight UTC.
pub fn parse_date_arg(input: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Ok(ts.with_timezone(&Utc));
    }

    input
        .parse::<NaiveDate>()
        .map(|day| Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN)))
        .map_err(|_| {
            format!(
                "expected YYYY-MM-DD or an RFC3339 timestamp, got '{}'",
                input
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_utc_rfc3339() {
        let date = Utc.with_ymd_and_hms(2025, 1, 15, 8, 30, 0).unwrap();
        assert_eq!(format_utc_rfc3339(date), "2025-01-15T08:30:00Z");
    }

    #[test]
    fn test_parse_date_arg_day() {
        let parsed = parse_date_arg("2025-01-15").unwrap();
        assert_eq!(format_utc_rfc3339(parsed), "2025-01-15T00:00:00Z");
    }

    #[test]
    fn test_parse_date_arg_timestamp() {
        let parsed = parse_date_arg("2025-01-15T08:30:00+01:00").unwrap();
        assert_eq!(format_utc_rfc3339(parsed), "2025-01-15T07:30:00Z");
    }

    #[test]
    fn test_parse_date_arg_rejects_garbage() {
        assert!(parse_date_arg("yesterday").is_err());
    }
}
