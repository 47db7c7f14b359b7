//! Monthly histogram bar chart.
//!
//! Consumes the parallel-array [`HistogramSeries`] and draws one bar per
//! month inside a bordered block, with a summary line underneath.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};

use gallery_core::formatting;
use gallery_data::aggregator::HistogramSeries;

use crate::themes::Theme;

/// Default chart title.
pub const HISTOGRAM_TITLE: &str = "Histogram of images per month";

const X_AXIS_LABEL: &str = "Months";
const Y_AXIS_LABEL: &str = "Number of images";

const MIN_BAR_WIDTH: u16 = 3;
const MAX_BAR_WIDTH: u16 = 12;
const BAR_GAP: u16 = 1;

/// Render the histogram into `area`.
pub fn render_histogram(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    series: &HistogramSeries,
    theme: &Theme,
) {
    let [chart_area, summary_area] =
        Layout::vertical([Constraint::Min(5), Constraint::Length(1)]).areas(area);

    let bar_width = bar_width_for(chart_area.width.saturating_sub(2), series.len());

    let bars: Vec<Bar> = series
        .labels
        .iter()
        .zip(series.counts.iter())
        .enumerate()
        .map(|(i, (label, &count))| {
            Bar::default()
                .value(count)
                .text_value(formatting::format_count(count))
                .label(Line::from(bar_label(label, bar_width)))
                .style(theme.bar_style(i))
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(format!(" {} ", title), theme.title)),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(BAR_GAP)
        .value_style(theme.bar_value)
        .label_style(theme.bar_label)
        .max(series.max_count().max(1));

    frame.render_widget(chart, chart_area);

    let total: u64 = series.counts.iter().sum();
    let mut spans = vec![
        Span::styled(format!(" x: {}  y: {}  ", X_AXIS_LABEL, Y_AXIS_LABEL), theme.dim),
        Span::styled("Total ", theme.label),
        Span::styled(formatting::format_count(total), theme.value),
        Span::styled(format!(" images in {} months", series.len()), theme.label),
    ];
    if let Some((label, count)) = peak(series) {
        spans.push(Span::styled("  Peak ", theme.label));
        spans.push(Span::styled(
            format!("{} ({:.1}%)", label, formatting::percentage(count, total, 1)),
            theme.value,
        ));
    }
    spans.push(Span::styled("  (q to quit)", theme.dim));
    frame.render_widget(Paragraph::new(Line::from(spans)), summary_area);
}

/// Render a "no data" placeholder when there are no buckets to show.
pub fn render_no_data(frame: &mut Frame, area: Rect, collection: &str, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No timestamped images found", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            format!("Collection \"{}\" has no records with a usable timestamp.", collection),
            theme.dim,
        )),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(ratatui::text::Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", HISTOGRAM_TITLE)),
        ),
        area,
    );
}

/// Widest bar that lets all `bars` fit in `available` columns.
fn bar_width_for(available: u16, bars: usize) -> u16 {
    if bars == 0 {
        return MAX_BAR_WIDTH;
    }
    let bars = u16::try_from(bars).unwrap_or(u16::MAX);
    let gaps = BAR_GAP.saturating_mul(bars.saturating_sub(1));
    (available.saturating_sub(gaps) / bars).clamp(MIN_BAR_WIDTH, MAX_BAR_WIDTH)
}

/// The bucket with the highest count; the first one wins a tie.
fn peak(series: &HistogramSeries) -> Option<(&str, u64)> {
    let mut best: Option<(&str, u64)> = None;
    for (label, &count) in series.labels.iter().zip(series.counts.iter()) {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((label.as_str(), count));
        }
    }
    best
}

/// Month label fitted to the bar: the full name when it fits, else its
/// three-letter abbreviation.
fn bar_label(label: &str, bar_width: u16) -> String {
    if label.chars().count() <= usize::from(bar_width) {
        label.to_string()
    } else {
        label.chars().take(3).collect()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
