//! Timestamp parsing and serde helpers for the `Date`-like columns.
//!
//! Extracts arrive from point-of-sale exports and spreadsheets with a mix of
//! ISO dates, ISO date-times and US-style dates. Everything is normalised to a
//! naive local `NaiveDateTime`; a bare date becomes midnight.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serializer};

/// Canonical output format used when writing timestamps back out.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// Parse a timestamp cell.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, String> {
    let s = raw.trim();
    if s.is_empty() {
        return Err("empty date value".to_string());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_local());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d.and_hms_opt(0, 0, 0).unwrap_or_default());
        }
    }

    Err(format!("unrecognised date '{}'", s))
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_timestamp(&s).map_err(serde::de::Error::custom)
}

/// Empty cells map to `None`; anything else must parse.
pub fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = Option::<String>::deserialize(deserializer)?;
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => parse_timestamp(v).map(Some).map_err(serde::de::Error::custom),
    }
}

pub fn serialize_timestamp<S>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_timestamp(ts))
}

pub fn serialize_optional_timestamp<S>(
    ts: &Option<NaiveDateTime>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match ts {
        Some(ts) => serializer.serialize_str(&format_timestamp(ts)),
        None => serializer.serialize_str(""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn bare_date_is_midnight() {
        let ts = parse_timestamp("2024-03-05").unwrap();
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(ts.hour(), 0);
    }

    #[test]
    fn accepts_common_export_formats() {
        for raw in [
            "2024-03-05 14:30:00",
            "2024-03-05T14:30:00",
            "2024-03-05 14:30:00.250",
            "2024-03-05T14:30:00+04:00",
            "03/05/2024 14:30",
        ] {
            let ts = parse_timestamp(raw).unwrap_or_else(|e| panic!("{}: {}", raw, e));
            assert_eq!(ts.hour(), 14, "{}", raw);
            assert_eq!(ts.minute(), 30, "{}", raw);
        }
        assert!(parse_timestamp("03/05/2024").is_ok());
    }

    #[test]
    fn rejects_garbage_and_empty() {
        assert!(parse_timestamp("not-a-date").is_err());
        assert!(parse_timestamp("   ").is_err());
        assert!(parse_timestamp("2024-13-40").is_err());
    }
}
