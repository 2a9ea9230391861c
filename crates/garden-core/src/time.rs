//! UTC timestamp helpers.
//!
//! Every timestamp that enters the engine is a `DateTime<Utc>`. Values read
//! from storage or requests without an explicit offset are taken as UTC
//! as-is; no local-time conversion is ever applied.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// Naive layouts accepted when a timestamp carries no offset.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Current UTC time.
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Format as RFC 3339 with millisecond precision and a `Z` suffix.
pub fn to_iso8601(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an ISO-8601 / RFC 3339 timestamp.
///
/// Offsets are honoured and converted to UTC. Naive date-times and bare
/// dates are interpreted as already being UTC. Returns `None` for anything
/// else.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_unix_epoch() {
        let epoch = Utc.timestamp_opt(0, 0).unwrap();
        assert_eq!(to_iso8601(epoch), "1970-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_parse_with_offset_converts_to_utc() {
        let ts = parse_timestamp("2026-02-21T05:30:00+05:30").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2026, 2, 21, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_naive_is_utc() {
        let ts = parse_timestamp("2024-01-01T00:00:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());

        let spaced = parse_timestamp("2024-01-01 12:00:00.250").unwrap();
        assert_eq!(spaced.timestamp_millis() % 1000, 250);
    }

    #[test]
    fn test_parse_bare_date() {
        let ts = parse_timestamp("2024-03-15").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_timestamp("last tuesday").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_iso_roundtrip() {
        let ts = Utc.with_ymd_and_hms(2026, 10, 17, 8, 15, 0).unwrap();
        assert_eq!(parse_timestamp(&to_iso8601(ts)), Some(ts));
    }

    #[test]
    fn test_now_is_recent() {
        let ts = to_iso8601(now_utc());
        assert!(ts.starts_with("20"), "timestamp should be this century: {ts}");
    }
}
