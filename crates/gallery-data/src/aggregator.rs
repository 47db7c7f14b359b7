//! Monthly histogram aggregation over image records.
//!
//! Each record's timestamp is rendered as a long display string in the
//! configured timezone, the leading month name becomes the grouping key, and
//! the records sharing a key are counted.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use gallery_core::error::Result;
use gallery_core::models::{
    BucketOrder, MonthBucket, Record, UntimestampedPolicy, UNKNOWN_MONTH_LABEL,
};
use gallery_core::time_utils::{month_token, TimezoneHandler};

// ── AggregationOptions ────────────────────────────────────────────────────────

/// Knobs for a single aggregation call.
#[derive(Debug, Clone, Copy, Default)]
pub struct AggregationOptions {
    /// Timezone in which month boundaries are evaluated.
    pub timezone: TimezoneHandler,
    /// Handling of records without a usable timestamp.
    pub untimestamped: UntimestampedPolicy,
    /// Ordering of the resulting buckets.
    pub order: BucketOrder,
}

// ── HistogramSeries ───────────────────────────────────────────────────────────

/// Parallel-array form of a histogram, as plotting libraries expect it.
///
/// `labels[i]` and `counts[i]` always describe the same bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistogramSeries {
    pub labels: Vec<String>,
    pub counts: Vec<u64>,
}

impl HistogramSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Largest count in the series, `0` when empty.
    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

// ── MonthlyHistogram ──────────────────────────────────────────────────────────

/// Result of [`MonthlyAggregator::aggregate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthlyHistogram {
    buckets: Vec<MonthBucket>,
    skipped: usize,
}

impl MonthlyHistogram {
    /// Buckets in output order.
    pub fn buckets(&self) -> &[MonthBucket] {
        &self.buckets
    }

    /// `(label, count)` pairs in output order.
    pub fn pairs(&self) -> Vec<(String, u64)> {
        self.buckets
            .iter()
            .map(|b| (b.label.clone(), b.count))
            .collect()
    }

    /// The same buckets split into parallel label and count arrays.
    pub fn series(&self) -> HistogramSeries {
        HistogramSeries {
            labels: self.buckets.iter().map(|b| b.label.clone()).collect(),
            counts: self.buckets.iter().map(|b| b.count).collect(),
        }
    }

    /// Sum of all bucket counts.
    pub fn total(&self) -> u64 {
        self.buckets.iter().map(|b| b.count).sum()
    }

    /// Records left out because they had no usable timestamp.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// One `"<label>: <count>"` line per bucket.
impl fmt::Display for MonthlyHistogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, bucket) in self.buckets.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {}", bucket.label, bucket.count)?;
        }
        Ok(())
    }
}

// ── MonthlyAggregator ─────────────────────────────────────────────────────────

/// Stateless helper that groups records by calendar month.
pub struct MonthlyAggregator;

impl MonthlyAggregator {
    /// Count `records` per month.
    ///
    /// Records whose timestamp is missing, of an unsupported shape, or not
    /// convertible to a display string are handled per
    /// [`AggregationOptions::untimestamped`]; they never abort the call.
    pub fn aggregate(records: &[Record], options: &AggregationOptions) -> MonthlyHistogram {
        let mut counts: BTreeMap<String, u64> = BTreeMap::new();
        let mut skipped = 0usize;

        for record in records {
            let key = match Self::month_key(record, &options.timezone) {
                Some(key) => key,
                None => match options.untimestamped {
                    UntimestampedPolicy::Drop => {
                        skipped += 1;
                        continue;
                    }
                    UntimestampedPolicy::Unknown => UNKNOWN_MONTH_LABEL.to_string(),
                },
            };
            *counts.entry(key).or_insert(0) += 1;
        }

        let mut buckets: Vec<MonthBucket> = counts
            .into_iter()
            .map(|(label, count)| MonthBucket { label, count })
            .collect();

        if options.order == BucketOrder::Calendar {
            // Stable sort keeps label order among non-month labels.
            buckets.sort_by_key(|b| b.month_number().unwrap_or(u32::MAX));
        }

        debug!(
            "Aggregated {} records into {} month buckets ({} skipped)",
            records.len(),
            buckets.len(),
            skipped
        );

        MonthlyHistogram { buckets, skipped }
    }

    /// Validate raw documents as records, then aggregate them.
    ///
    /// A document that is not a JSON object is a structural error and fails
    /// the whole call.
    pub fn aggregate_values(
        values: Vec<Value>,
        options: &AggregationOptions,
    ) -> Result<MonthlyHistogram> {
        let records = values
            .into_iter()
            .enumerate()
            .map(|(index, value)| Record::from_value(index, value))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::aggregate(&records, options))
    }

    // ── Private ───────────────────────────────────────────────────────────────

    /// Month name of the record's display string, `None` when unusable.
    fn month_key(record: &Record, tz: &TimezoneHandler) -> Option<String> {
        let timestamp = match record.timestamp() {
            Ok(Some(ts)) => ts,
            Ok(None) => return None,
            Err(e) => {
                warn!("Skipping record with unusable timestamp: {}", e);
                return None;
            }
        };
        let display = tz.display_string(&timestamp)?;
        month_token(&display).map(str::to_string)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
