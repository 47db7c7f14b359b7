use gallery_core::error::Result;
use gallery_core::time_utils::TimezoneHandler;
use gallery_data::aggregator::{AggregationOptions, MonthlyAggregator, MonthlyHistogram};
use gallery_data::listing::{display_records, DisplayRecord};
use gallery_data::store::DocumentStore;
use gallery_ui::text_chart::render_text_histogram;

/// Longest bar of the plain-text chart, in cells.
pub const TEXT_BAR_WIDTH: usize = 40;

/// Fetch `collection` from `store` and bucket it by month.
pub fn monthly_histogram(
    store: &impl DocumentStore,
    collection: &str,
    options: &AggregationOptions,
) -> Result<MonthlyHistogram> {
    let records = store.fetch_collection(collection)?;
    let histogram = MonthlyAggregator::aggregate(&records, options);
    tracing::info!(
        "{} of {} records in \"{}\" fall into {} months",
        histogram.total(),
        records.len(),
        collection,
        histogram.buckets().len()
    );
    if histogram.skipped() > 0 {
        tracing::info!(
            "{} records without a usable timestamp left out of the histogram",
            histogram.skipped()
        );
    }
    Ok(histogram)
}

/// Fetch `collection` from `store` with timestamps formatted for display.
pub fn record_listing(
    store: &impl DocumentStore,
    collection: &str,
    tz: &TimezoneHandler,
) -> Result<Vec<DisplayRecord>> {
    let records = store.fetch_collection(collection)?;
    Ok(display_records(&records, tz))
}

/// The histogram as pretty-printed `{"labels": [...], "counts": [...]}`.
pub fn histogram_json(histogram: &MonthlyHistogram) -> Result<String> {
    Ok(serde_json::to_string_pretty(&histogram.series())?)
}

/// The histogram as a plain-text bar chart.
pub fn histogram_text(histogram: &MonthlyHistogram) -> String {
    render_text_histogram(&histogram.series(), TEXT_BAR_WIDTH)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
