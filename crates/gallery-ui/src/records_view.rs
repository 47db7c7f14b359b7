//! Record listing table.
//!
//! Renders a bordered [`ratatui::widgets::Table`] with one row per record:
//! its display timestamp, image reference and any other payload fields.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use gallery_core::formatting;
use gallery_data::listing::DisplayRecord;

use crate::themes::Theme;

const URL_COLUMN_CHARS: usize = 48;
const MISSING: &str = "-";

/// Render `records` as a table into `area`, highlighting `state`'s selection.
pub fn render_records_table(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    records: &[DisplayRecord],
    state: &mut TableState,
    theme: &Theme,
) {
    let header_cells = ["#", "Timestamp", "Image URL", "Other fields"]
        .iter()
        .map(|h| Cell::from(*h).style(theme.table_header));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            Row::new(vec![
                Cell::from((i + 1).to_string()),
                Cell::from(record.timestamp.clone().unwrap_or_else(|| MISSING.to_string())),
                Cell::from(
                    record
                        .image_url
                        .as_deref()
                        .map(|url| formatting::truncate(url, URL_COLUMN_CHARS))
                        .unwrap_or_else(|| MISSING.to_string()),
                ),
                Cell::from(payload_summary(record)),
            ])
            .style(theme.row_style(i))
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Length(32),
        Constraint::Length(50),
        Constraint::Min(10),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(format!(
            " {} ({} records) ",
            title,
            formatting::format_count(records.len() as u64)
        )))
        .row_highlight_style(theme.table_selected)
        .style(theme.text);

    frame.render_stateful_widget(table, area, state);
}

/// Render a "no records" placeholder.
pub fn render_no_records(frame: &mut Frame, area: Rect, collection: &str, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No records found", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            format!("Collection \"{}\" is empty.", collection),
            theme.dim,
        )),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(ratatui::text::Text::from(text))
            .block(Block::default().borders(Borders::ALL).title(" Records ")),
        area,
    );
}

/// `key=value` pairs of the non-display fields, sorted by key.
fn payload_summary(record: &DisplayRecord) -> String {
    let mut keys: Vec<&String> = record.payload.keys().collect();
    keys.sort();
    keys.into_iter()
        .map(|k| match &record.payload[k] {
            serde_json::Value::String(s) => format!("{k}={s}"),
            other => format!("{k}={other}"),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use serde_json::{json, Map};

    fn make_records() -> Vec<DisplayRecord> {
        let mut payload = Map::new();
        payload.insert("owner".to_string(), json!("ana"));
        payload.insert("likes".to_string(), json!(3));
        vec![
            DisplayRecord {
                timestamp: Some("January 05, 2023 at 10:00:00 AM".to_string()),
                image_url: Some("https://img.example/1.png".to_string()),
                payload,
            },
            DisplayRecord {
                timestamp: None,
                image_url: None,
                payload: Map::new(),
            },
        ]
    }

    #[test]
    fn test_payload_summary_sorted() {
        let records = make_records();
        assert_eq!(payload_summary(&records[0]), "likes=3, owner=ana");
        assert_eq!(payload_summary(&records[1]), "");
    }

    #[test]
    fn test_render_records_table_shows_rows() {
        let backend = TestBackend::new(140, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        let records = make_records();
        let mut state = TableState::default().with_selected(Some(0));

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_records_table(frame, area, "images", &records, &mut state, &theme);
            })
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("January 05, 2023 at 10:00:00 AM"));
        assert!(text.contains("https://img.example/1.png"));
        assert!(text.contains("(2 records)"));
    }

    #[test]
    fn test_render_records_table_empty_does_not_panic() {
        let backend = TestBackend::new(80, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::light();
        let mut state = TableState::default();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_records_table(frame, area, "images", &[], &mut state, &theme);
            })
            .unwrap();
    }

    #[test]
    fn test_render_no_records_does_not_panic() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_no_records(frame, area, "images", &theme);
            })
            .unwrap();
    }
}
