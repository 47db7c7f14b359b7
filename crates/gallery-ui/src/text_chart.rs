//! Plain-text histogram for piping and non-interactive terminals.

use unicode_width::UnicodeWidthStr;

use gallery_core::formatting;
use gallery_data::aggregator::HistogramSeries;

const BAR_CHAR: char = '█';

/// Render `series` as horizontal bars, one line per bucket.
///
/// `bar_width` is the length of the longest bar; the others are scaled
/// proportionally, with any non-zero count drawn at least one cell wide.
///
/// ```text
/// January  ████████████ 2
/// March    ██████ 1
/// ```
pub fn render_text_histogram(series: &HistogramSeries, bar_width: usize) -> String {
    if series.is_empty() {
        return "No timestamped images found".to_string();
    }

    let label_width = series
        .labels
        .iter()
        .map(|l| UnicodeWidthStr::width(l.as_str()))
        .max()
        .unwrap_or(0);
    let max = series.max_count();

    series
        .labels
        .iter()
        .zip(series.counts.iter())
        .map(|(label, &count)| {
            let pad = label_width - UnicodeWidthStr::width(label.as_str());
            let cells = scaled_cells(count, max, bar_width);
            format!(
                "{}{}  {} {}",
                label,
                " ".repeat(pad),
                BAR_CHAR.to_string().repeat(cells),
                formatting::format_count(count)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn scaled_cells(count: u64, max: u64, bar_width: usize) -> usize {
    if count == 0 || max == 0 {
        return 0;
    }
    let cells = ((count as f64 / max as f64) * bar_width as f64).round() as usize;
    cells.max(1)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
