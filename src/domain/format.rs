//! Display formatting for dates and scores.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Formats a 0-1 score as a percentage with two decimals, without the `%`
/// sign.
///
/// ```
/// assert_eq!(resalloc::domain::format::to_percent(0.4567), "45.67");
/// ```
#[must_use]
pub fn to_percent(score: f64) -> String {
    format!("{:.2}", score * 100.0)
}

/// Formats a timestamp as a day-level date, e.g. `20 Mar 2025`.
#[must_use]
pub fn format_date(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%d %b %Y").to_string()
}

/// Formats a timestamp with a 24-hour clock, e.g. `20 Mar 2025, 08:05`.
#[must_use]
pub fn format_date_time(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%d %b %Y, %H:%M").to_string()
}

/// Parses an API timestamp.
///
/// Accepts RFC 3339 strings as well as offset-less ISO timestamps, which are
/// taken to be UTC.
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case(0.4567, "45.67"; "two decimals")]
    #[test_case(1.0, "100.00"; "full match")]
    #[test_case(0.0, "0.00"; "no match")]
    #[test_case(0.987, "98.70"; "pads trailing zero")]
    fn percent(score: f64, expected: &str) {
        assert_eq!(to_percent(score), expected);
    }

    #[test_case("2025-03-20T08:05:00Z"; "rfc3339 utc")]
    #[test_case("2025-03-20T08:05:00"; "naive")]
    #[test_case("2025-03-20T08:05:00.123"; "naive with fraction")]
    #[test_case("2025-03-20T15:05:00+07:00"; "with offset")]
    fn timestamps_parse_to_the_same_instant(raw: &str) {
        let parsed = parse_timestamp(raw).unwrap();
        assert_eq!(format_date_time(&parsed), "20 Mar 2025, 08:05");
        assert_eq!(format_date(&parsed), "20 Mar 2025");
    }

    #[test]
    fn garbage_timestamp_is_rejected() {
        assert!(parse_timestamp("yesterday").is_none());
    }
}
