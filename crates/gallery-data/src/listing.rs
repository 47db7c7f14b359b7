//! Record listings with human-readable timestamps.
//!
//! Unlike aggregation, a listing keeps every record: one without a timestamp
//! is still shown, just without a date.

use serde::Serialize;
use serde_json::{Map, Value};

use gallery_core::models::{Record, RecordTimestamp, IMAGE_URL_FIELD, TIMESTAMP_FIELD};
use gallery_core::time_utils::TimezoneHandler;

/// A record prepared for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRecord {
    /// Long display string, the producer's raw text when it could not be
    /// reformatted, or `None` when the record has no timestamp.
    pub timestamp: Option<String>,
    pub image_url: Option<String>,
    /// Remaining fields, unchanged.
    pub payload: Map<String, Value>,
}

/// Rewrite each record's timestamp as a display string in `tz`.
pub fn display_records(records: &[Record], tz: &TimezoneHandler) -> Vec<DisplayRecord> {
    records
        .iter()
        .map(|record| display_record(record, tz))
        .collect()
}

fn display_record(record: &Record, tz: &TimezoneHandler) -> DisplayRecord {
    let timestamp = match record.timestamp() {
        Ok(Some(ts)) => tz.display_string(&ts).or_else(|| match ts {
            RecordTimestamp::Text(raw) => Some(raw),
            RecordTimestamp::Instant(_) => None,
        }),
        Ok(None) => None,
        Err(_) => record.fields().get(TIMESTAMP_FIELD).map(Value::to_string),
    };

    let mut payload = record.fields().clone();
    payload.remove(TIMESTAMP_FIELD);
    payload.remove(IMAGE_URL_FIELD);

    DisplayRecord {
        timestamp,
        image_url: record.image_url().map(str::to_string),
        payload,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
