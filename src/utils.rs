use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde_json::Value;

// Anything above this is taken to be epoch milliseconds (year 33658 in seconds).
const MILLIS_THRESHOLD: f64 = 1e12;

/// Convert an upstream epoch-seconds field to a UTC instant.
pub fn from_unix(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

/// Render an instant the way it is stored in the cache: RFC 3339 with
/// millisecond precision and a `Z` suffix.
pub fn to_iso(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `serialize_with` adapter so record instants match the last-update key.
pub fn serialize_iso<S: serde::Serializer>(
    instant: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&to_iso(*instant))
}

pub fn serialize_iso_opt<S: serde::Serializer>(
    instant: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match instant {
        Some(instant) => serialize_iso(instant, serializer),
        None => serializer.serialize_none(),
    }
}

/// Parse a timestamp string. Offsets are honoured; naive values are read as UTC.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Normalize a loosely typed timestamp: a string in any form `parse_instant`
/// accepts, or a number of epoch seconds or milliseconds.
pub fn instant_from_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_instant(s),
        Value::Number(n) => {
            let n = n.as_f64()?;
            if n.abs() >= MILLIS_THRESHOLD {
                DateTime::from_timestamp_millis(n as i64)
            } else {
                from_unix(n as i64)
            }
        }
        _ => None,
    }
}
