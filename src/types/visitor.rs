use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VisitorError {
    #[error("Unparseable timestamp: {0}")]
    InvalidTimestamp(String),
    #[error("Epoch milliseconds out of range: {0}")]
    OutOfRange(i64),
    #[error("Epoch milliseconds must be a whole number within range: {0}")]
    InvalidMillis(String),
}

/// Largest instant a JavaScript `Date` can hold, in either direction.
const MAX_EPOCH_MILLIS: f64 = 8.64e15;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// One routing request's context.
///
/// Validation of the incoming payload belongs to the transport layer; a
/// `Visitor` that exists is assumed well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visitor {
    pub geo_state: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl Visitor {
    pub fn new(geo_state: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            geo_state: geo_state.into(),
            timestamp,
        }
    }

    /// UTC hour of the event as a plain decimal string: hour 5 is `"5"`.
    pub fn hour_code(&self) -> String {
        self.timestamp.hour().to_string()
    }

    /// Parse an RFC 3339 timestamp, a naive ISO 8601 datetime (seconds
    /// optional, trailing `Z` allowed) taken as UTC, or a bare date at
    /// 00:00 UTC.
    pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, VisitorError> {
        let raw = raw.trim();
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Ok(ts.with_timezone(&Utc));
        }
        let naive = raw.strip_suffix('Z').unwrap_or(raw);
        for format in NAIVE_FORMATS {
            if let Ok(parsed) = NaiveDateTime::parse_from_str(naive, format) {
                return Ok(parsed.and_utc());
            }
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|midnight| midnight.and_utc())
            .ok_or_else(|| VisitorError::InvalidTimestamp(raw.to_string()))
    }

    /// Epoch milliseconds written as a JSON float, e.g. `1532042939513.0`.
    pub fn timestamp_from_float_millis(millis: f64) -> Result<DateTime<Utc>, VisitorError> {
        if !millis.is_finite() || millis.fract() != 0.0 || millis.abs() > MAX_EPOCH_MILLIS {
            return Err(VisitorError::InvalidMillis(millis.to_string()));
        }
        Self::timestamp_from_millis(millis as i64)
    }

    pub fn timestamp_from_millis(millis: i64) -> Result<DateTime<Utc>, VisitorError> {
        Utc.timestamp_millis_opt(millis)
            .single()
            .ok_or(VisitorError::OutOfRange(millis))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(i64),
    FloatMillis(f64),
    Text(String),
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match RawTimestamp::deserialize(deserializer)? {
        RawTimestamp::Millis(ms) => Visitor::timestamp_from_millis(ms),
        RawTimestamp::FloatMillis(ms) => Visitor::timestamp_from_float_millis(ms),
        RawTimestamp::Text(text) => Visitor::parse_timestamp(&text),
    };
    parsed.map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hour_code_has_no_leading_zero() {
        let ts = Visitor::parse_timestamp("2024-03-05T05:59:59Z").unwrap();
        assert_eq!(Visitor::new("ca", ts).hour_code(), "5");
    }

    #[test]
    fn offset_timestamps_are_normalized_to_utc() {
        let ts = Visitor::parse_timestamp("2024-03-05T23:30:00-02:00").unwrap();
        let visitor = Visitor::new("ny", ts);
        assert_eq!(visitor.hour_code(), "1");
    }

    #[test]
    fn naive_timestamps_are_utc() {
        let ts = Visitor::parse_timestamp("2018-07-19T23:28:59.513").unwrap();
        assert_eq!(ts.hour(), 23);
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(
            Visitor::parse_timestamp("yesterday"),
            Err(VisitorError::InvalidTimestamp("yesterday".to_string()))
        );
    }

    #[test]
    fn minute_precision_with_and_without_zone() {
        let zoned = Visitor::parse_timestamp("2018-07-19T23:28Z").unwrap();
        let naive = Visitor::parse_timestamp("2018-07-19T23:28").unwrap();
        assert_eq!(zoned, naive);
        assert_eq!((zoned.hour(), zoned.minute(), zoned.second()), (23, 28, 0));
    }

    #[test]
    fn bare_date_is_utc_midnight() {
        let ts = Visitor::parse_timestamp("2018-07-19").unwrap();
        assert_eq!(ts, Visitor::parse_timestamp("2018-07-19T00:00:00Z").unwrap());
        assert_eq!(Visitor::new("ca", ts).hour_code(), "0");
    }

    #[test]
    fn float_millis_must_be_whole_and_in_range() {
        let ts = Visitor::timestamp_from_float_millis(1_532_042_939_513.0).unwrap();
        assert_eq!(ts, Visitor::timestamp_from_millis(1_532_042_939_513).unwrap());

        for bad in [1.5, f64::NAN, f64::INFINITY, 9.0e15] {
            assert!(matches!(
                Visitor::timestamp_from_float_millis(bad),
                Err(VisitorError::InvalidMillis(_))
            ));
        }
    }
}
