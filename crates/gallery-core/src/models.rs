use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

use crate::error::{GalleryError, Result};

/// Label of the bucket collecting records that carry no usable timestamp.
pub const UNKNOWN_MONTH_LABEL: &str = "Unknown";

/// Field name holding a record's timestamp.
pub const TIMESTAMP_FIELD: &str = "timestamp";

/// Field name holding a record's image reference.
pub const IMAGE_URL_FIELD: &str = "image_url";

// ── Aggregation policies ──────────────────────────────────────────────────────

/// What to do with records whose timestamp is missing or unusable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UntimestampedPolicy {
    /// Leave them out of the histogram.
    #[default]
    Drop,
    /// Count them in a bucket labelled [`UNKNOWN_MONTH_LABEL`].
    Unknown,
}

impl FromStr for UntimestampedPolicy {
    type Err = GalleryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "drop" => Ok(Self::Drop),
            "unknown" => Ok(Self::Unknown),
            other => Err(GalleryError::Config(format!(
                "unknown untimestamped policy \"{other}\""
            ))),
        }
    }
}

/// Ordering applied to the month buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketOrder {
    /// Lexicographic by label, the order a plain group-by yields.
    #[default]
    Label,
    /// January through December, with the unknown bucket last.
    Calendar,
}

impl FromStr for BucketOrder {
    type Err = GalleryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "label" => Ok(Self::Label),
            "calendar" => Ok(Self::Calendar),
            other => Err(GalleryError::Config(format!(
                "unknown bucket order \"{other}\""
            ))),
        }
    }
}

// ── RecordTimestamp ───────────────────────────────────────────────────────────

/// The two shapes a stored timestamp can take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordTimestamp {
    /// An absolute instant: a server timestamp object or a Unix epoch value.
    Instant(DateTime<Utc>),
    /// A string written by the producer, either machine-readable or already
    /// formatted for display.
    Text(String),
}

impl RecordTimestamp {
    /// Interpret a raw JSON value as a timestamp.
    ///
    /// * `null` → `Ok(None)`
    /// * string → [`RecordTimestamp::Text`] (blank strings count as absent)
    /// * number → Unix seconds (integer or fractional)
    /// * object with `seconds`/`nanos` or `_seconds`/`_nanoseconds` → server
    ///   timestamp
    ///
    /// Any other shape is a [`GalleryError::TimestampParse`].
    pub fn from_value(value: &Value) -> Result<Option<Self>> {
        match value {
            Value::Null => Ok(None),
            Value::String(s) if s.trim().is_empty() => Ok(None),
            Value::String(s) => Ok(Some(Self::Text(s.clone()))),
            Value::Number(n) => {
                let dt = if let Some(secs) = n.as_i64() {
                    DateTime::from_timestamp(secs, 0)
                } else if let Some(f) = n.as_f64() {
                    let (secs, nanos) = split_epoch_seconds(f);
                    DateTime::from_timestamp(secs, nanos)
                } else {
                    None
                };
                dt.map(|dt| Some(Self::Instant(dt)))
                    .ok_or_else(|| GalleryError::TimestampParse(n.to_string()))
            }
            Value::Object(obj) => Self::from_server_timestamp(obj)
                .map(|dt| Some(Self::Instant(dt)))
                .ok_or_else(|| GalleryError::TimestampParse(value.to_string())),
            other => Err(GalleryError::TimestampParse(other.to_string())),
        }
    }

    fn from_server_timestamp(obj: &Map<String, Value>) -> Option<DateTime<Utc>> {
        let secs = obj
            .get("seconds")
            .or_else(|| obj.get("_seconds"))
            .and_then(Value::as_i64)?;
        let nanos = obj
            .get("nanos")
            .or_else(|| obj.get("nanoseconds"))
            .or_else(|| obj.get("_nanoseconds"))
            .and_then(Value::as_u64)
            .unwrap_or(0);
        DateTime::from_timestamp(secs, u32::try_from(nanos).ok()?)
    }
}

// ── Record ────────────────────────────────────────────────────────────────────

/// One document retrieved from the store.
///
/// Only the `timestamp` field is interpreted; everything else is payload and
/// passes through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    /// Build a record from an arbitrary JSON value.
    ///
    /// `index` is the position of the value in its source sequence and is
    /// only used for the error report when the value is not an object.
    pub fn from_value(index: usize, value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(GalleryError::MalformedRecord {
                index,
                found: json_kind(&other).to_string(),
            }),
        }
    }

    /// Convenience constructor: a record with an instant timestamp and an
    /// optional image URL.
    pub fn at(timestamp: DateTime<Utc>, image_url: Option<&str>) -> Self {
        let mut fields = Map::new();
        fields.insert(
            TIMESTAMP_FIELD.to_string(),
            serde_json::json!({
                "seconds": timestamp.timestamp(),
                "nanos": timestamp.timestamp_subsec_nanos(),
            }),
        );
        if let Some(url) = image_url {
            fields.insert(IMAGE_URL_FIELD.to_string(), Value::String(url.to_string()));
        }
        Self { fields }
    }

    /// The record's timestamp, if present.
    ///
    /// A missing or `null` field yields `Ok(None)`; an unsupported shape yields
    /// an error that callers are expected to treat as a per-record fault.
    pub fn timestamp(&self) -> Result<Option<RecordTimestamp>> {
        match self.fields.get(TIMESTAMP_FIELD) {
            None => Ok(None),
            Some(value) => RecordTimestamp::from_value(value),
        }
    }

    /// The record's image reference, when it is a non-empty string.
    pub fn image_url(&self) -> Option<&str> {
        self.fields
            .get(IMAGE_URL_FIELD)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }
}

/// Whole seconds and nanoseconds of a fractional epoch value. Nanoseconds
/// that round up to a full second carry into the seconds.
fn split_epoch_seconds(f: f64) -> (i64, u32) {
    let floor = f.floor();
    let nanos = ((f - floor) * 1_000_000_000.0).round() as u32;
    if nanos >= 1_000_000_000 {
        (floor as i64 + 1, 0)
    } else {
        (floor as i64, nanos)
    }
}

/// Name of a JSON value's kind, for error messages.
fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ── MonthBucket ───────────────────────────────────────────────────────────────

/// A month name paired with the number of records that fall in it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonthBucket {
    /// English month name, e.g. `"January"`, or [`UNKNOWN_MONTH_LABEL`].
    pub label: String,
    /// Number of records in the bucket; never zero.
    pub count: u64,
}

impl MonthBucket {
    pub fn new(label: impl Into<String>, count: u64) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }

    /// Calendar position of the bucket (1–12), `None` for the unknown bucket
    /// or a label that is not a month name.
    pub fn month_number(&self) -> Option<u32> {
        self.label
            .parse::<chrono::Month>()
            .ok()
            .map(|m| m.number_from_month())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_timestamp_null_is_absent() {
        assert_eq!(RecordTimestamp::from_value(&Value::Null).unwrap(), None);
    }

    #[test]
    fn test_timestamp_blank_string_is_absent() {
        assert_eq!(RecordTimestamp::from_value(&json!("   ")).unwrap(), None);
    }

    #[test]
    fn test_timestamp_string_is_text() {
        let ts = RecordTimestamp::from_value(&json!("January 05, 2023 at 10:00:00 AM")).unwrap();
        assert_eq!(
            ts,
            Some(RecordTimestamp::Text(
                "January 05, 2023 at 10:00:00 AM".to_string()
            ))
        );
    }

    #[test]
    fn test_timestamp_integer_epoch() {
        let ts = RecordTimestamp::from_value(&json!(1_672_531_200)).unwrap();
        let expected = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(ts, Some(RecordTimestamp::Instant(expected)));
    }

    #[test]
    fn test_timestamp_fractional_epoch() {
        let ts = RecordTimestamp::from_value(&json!(1_672_531_200.5)).unwrap();
        match ts {
            Some(RecordTimestamp::Instant(dt)) => {
                assert_eq!(dt.timestamp(), 1_672_531_200);
                assert_eq!(dt.timestamp_subsec_millis(), 500);
            }
            other => panic!("expected instant, got {other:?}"),
        }
    }

    #[test]
    fn test_timestamp_fraction_rounding_to_full_second_carries() {
        let ts = RecordTimestamp::from_value(&json!(10.9999999999)).unwrap();
        let expected = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 11).unwrap();
        assert_eq!(ts, Some(RecordTimestamp::Instant(expected)));
    }

    #[test]
    fn test_split_epoch_seconds() {
        assert_eq!(split_epoch_seconds(10.25), (10, 250_000_000));
        assert_eq!(split_epoch_seconds(10.9999999999), (11, 0));
        assert_eq!(split_epoch_seconds(-1.5), (-2, 500_000_000));
    }

    #[test]
    fn test_timestamp_server_object() {
        let ts = RecordTimestamp::from_value(&json!({"seconds": 1_675_209_600, "nanos": 0}))
            .unwrap();
        let expected = Utc.with_ymd_and_hms(2023, 2, 1, 0, 0, 0).unwrap();
        assert_eq!(ts, Some(RecordTimestamp::Instant(expected)));
    }

    #[test]
    fn test_timestamp_underscored_server_object() {
        let ts = RecordTimestamp::from_value(&json!({"_seconds": 1_675_209_600, "_nanoseconds": 0}))
            .unwrap();
        assert!(matches!(ts, Some(RecordTimestamp::Instant(_))));
    }

    #[test]
    fn test_timestamp_unsupported_shapes_error() {
        assert!(RecordTimestamp::from_value(&json!(true)).is_err());
        assert!(RecordTimestamp::from_value(&json!([1, 2])).is_err());
        assert!(RecordTimestamp::from_value(&json!({"when": "today"})).is_err());
    }

    #[test]
    fn test_record_from_non_object_is_malformed() {
        let err = Record::from_value(7, json!([1, 2, 3])).unwrap_err();
        match err {
            GalleryError::MalformedRecord { index, found } => {
                assert_eq!(index, 7);
                assert_eq!(found, "array");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_record_without_timestamp() {
        let record = Record::from_value(0, json!({"image_url": "https://img/1.png"})).unwrap();
        assert_eq!(record.timestamp().unwrap(), None);
        assert_eq!(record.image_url(), Some("https://img/1.png"));
    }

    #[test]
    fn test_record_at_round_trips_instant() {
        let dt = Utc.with_ymd_and_hms(2023, 3, 14, 15, 9, 26).unwrap();
        let record = Record::at(dt, Some("https://img/pi.png"));
        assert_eq!(
            record.timestamp().unwrap(),
            Some(RecordTimestamp::Instant(dt))
        );
        assert_eq!(record.image_url(), Some("https://img/pi.png"));
    }

    #[test]
    fn test_record_payload_passes_through() {
        let value = json!({"timestamp": null, "owner": "ana", "tags": ["a", "b"]});
        let record = Record::from_value(0, value.clone()).unwrap();
        assert_eq!(Value::Object(record.into_fields()), value);
    }

    #[test]
    fn test_empty_image_url_is_none() {
        let record = Record::from_value(0, json!({"image_url": ""})).unwrap();
        assert_eq!(record.image_url(), None);
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("drop".parse::<UntimestampedPolicy>().unwrap(), UntimestampedPolicy::Drop);
        assert_eq!(
            "Unknown".parse::<UntimestampedPolicy>().unwrap(),
            UntimestampedPolicy::Unknown
        );
        assert!("keep".parse::<UntimestampedPolicy>().is_err());
    }

    #[test]
    fn test_bucket_order_from_str() {
        assert_eq!("label".parse::<BucketOrder>().unwrap(), BucketOrder::Label);
        assert_eq!("CALENDAR".parse::<BucketOrder>().unwrap(), BucketOrder::Calendar);
        assert!("chronological".parse::<BucketOrder>().is_err());
    }

    #[test]
    fn test_month_bucket_month_number() {
        assert_eq!(MonthBucket::new("January", 2).month_number(), Some(1));
        assert_eq!(MonthBucket::new("December", 1).month_number(), Some(12));
        assert_eq!(MonthBucket::new(UNKNOWN_MONTH_LABEL, 4).month_number(), None);
    }
}
