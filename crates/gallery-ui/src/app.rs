//! Application state and TUI event loops.
//!
//! [`App`] owns the theme and drives the histogram and record-listing views.
//! Both are static snapshots: the loop redraws on resize and exits on `q` or
//! Ctrl+C.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, widgets::TableState, Frame, Terminal};

use gallery_data::aggregator::HistogramSeries;
use gallery_data::listing::DisplayRecord;

use crate::histogram_view::{self, HISTOGRAM_TITLE};
use crate::records_view;
use crate::themes::Theme;

// ── KeyAction ─────────────────────────────────────────────────────────────────

/// What a key press asks the event loop to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Next,
    Previous,
    None,
}

impl From<KeyEvent> for KeyAction {
    fn from(key: KeyEvent) -> Self {
        if key.kind == KeyEventKind::Release {
            return KeyAction::None;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
            KeyCode::Down | KeyCode::Char('j') => KeyAction::Next,
            KeyCode::Up | KeyCode::Char('k') => KeyAction::Previous,
            _ => KeyAction::None,
        }
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the gallery TUI.
pub struct App {
    /// Active colour theme.
    pub theme: Theme,
    /// Collection being shown, for titles and placeholders.
    pub collection: String,
    /// Selected row in the record listing.
    pub table_state: TableState,
}

impl App {
    pub fn new(theme_name: &str, collection: impl Into<String>) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            collection: collection.into(),
            table_state: TableState::default(),
        }
    }

    // ── Public event loops ────────────────────────────────────────────────────

    /// Show the monthly histogram until the user quits.
    pub async fn run_histogram(mut self, series: HistogramSeries) -> io::Result<()> {
        self.run_loop(0, |app, frame| app.render_histogram(frame, &series))
    }

    /// Show the record listing until the user quits. Up/Down move the
    /// selection.
    pub async fn run_records(mut self, records: Vec<DisplayRecord>) -> io::Result<()> {
        if !records.is_empty() {
            self.table_state.select(Some(0));
        }
        self.run_loop(records.len(), |app, frame| {
            app.render_records(frame, &records)
        })
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Draw the histogram, or the placeholder when it has no buckets.
    pub fn render_histogram(&mut self, frame: &mut Frame, series: &HistogramSeries) {
        let area = frame.area();
        if series.is_empty() {
            histogram_view::render_no_data(frame, area, &self.collection, &self.theme);
        } else {
            histogram_view::render_histogram(frame, area, HISTOGRAM_TITLE, series, &self.theme);
        }
    }

    /// Draw the record table, or the placeholder when there are no records.
    pub fn render_records(&mut self, frame: &mut Frame, records: &[DisplayRecord]) {
        let area = frame.area();
        if records.is_empty() {
            records_view::render_no_records(frame, area, &self.collection, &self.theme);
        } else {
            records_view::render_records_table(
                frame,
                area,
                &self.collection,
                records,
                &mut self.table_state,
                &self.theme,
            );
        }
    }

    /// Apply a key action; returns `true` when the loop should exit.
    pub fn handle_action(&mut self, action: KeyAction, rows: usize) -> bool {
        match action {
            KeyAction::Quit => return true,
            KeyAction::Next if rows > 0 => {
                let next = self
                    .table_state
                    .selected()
                    .map_or(0, |i| (i + 1).min(rows - 1));
                self.table_state.select(Some(next));
            }
            KeyAction::Previous if rows > 0 => {
                let prev = self
                    .table_state
                    .selected()
                    .map_or(0, |i| i.saturating_sub(1));
                self.table_state.select(Some(prev));
            }
            _ => {}
        }
        false
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    /// Enter the alternate screen, draw with `draw` until quit, and restore
    /// the terminal whatever the outcome.
    fn run_loop(
        &mut self,
        rows: usize,
        mut draw: impl FnMut(&mut Self, &mut Frame),
    ) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| draw(self, frame)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => {
                        if self.handle_action(KeyAction::from(key), rows) {
                            break Ok(());
                        }
                    }
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use serde_json::Map;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn make_records(n: usize) -> Vec<DisplayRecord> {
        (0..n)
            .map(|i| DisplayRecord {
                timestamp: Some(format!("January {:02}, 2023 at 10:00:00 AM", i + 1)),
                image_url: Some(format!("https://img.example/{i}.png")),
                payload: Map::new(),
            })
            .collect()
    }

    #[test]
    fn test_app_creation_defaults() {
        let app = App::new("dark", "images");
        assert_eq!(app.collection, "images");
        assert_eq!(app.table_state.selected(), None);
    }

    #[test]
    fn test_key_action_mapping() {
        assert_eq!(KeyAction::from(key(KeyCode::Char('q'))), KeyAction::Quit);
        assert_eq!(KeyAction::from(key(KeyCode::Char('Q'))), KeyAction::Quit);
        assert_eq!(KeyAction::from(key(KeyCode::Esc)), KeyAction::Quit);
        assert_eq!(
            KeyAction::from(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            KeyAction::Quit
        );
        assert_eq!(KeyAction::from(key(KeyCode::Char('c'))), KeyAction::None);
        assert_eq!(KeyAction::from(key(KeyCode::Down)), KeyAction::Next);
        assert_eq!(KeyAction::from(key(KeyCode::Char('k'))), KeyAction::Previous);
    }

    #[test]
    fn test_handle_action_moves_selection_within_bounds() {
        let mut app = App::new("dark", "images");
        app.table_state.select(Some(0));

        assert!(!app.handle_action(KeyAction::Previous, 3));
        assert_eq!(app.table_state.selected(), Some(0));

        app.handle_action(KeyAction::Next, 3);
        app.handle_action(KeyAction::Next, 3);
        app.handle_action(KeyAction::Next, 3);
        assert_eq!(app.table_state.selected(), Some(2));
    }

    #[test]
    fn test_handle_action_no_rows_keeps_selection_empty() {
        let mut app = App::new("dark", "images");
        assert!(!app.handle_action(KeyAction::Next, 0));
        assert_eq!(app.table_state.selected(), None);
    }

    #[test]
    fn test_handle_action_quit() {
        let mut app = App::new("dark", "images");
        assert!(app.handle_action(KeyAction::Quit, 0));
    }

    #[test]
    fn test_render_histogram_and_placeholder() {
        let mut app = App::new("classic", "images");
        let mut terminal = Terminal::new(TestBackend::new(90, 20)).unwrap();

        let series = HistogramSeries {
            labels: vec!["January".to_string(), "March".to_string()],
            counts: vec![2, 1],
        };
        terminal
            .draw(|frame| app.render_histogram(frame, &series))
            .unwrap();
        terminal
            .draw(|frame| app.render_histogram(frame, &HistogramSeries::default()))
            .unwrap();
    }

    #[test]
    fn test_render_records_and_placeholder() {
        let mut app = App::new("light", "images");
        let mut terminal = Terminal::new(TestBackend::new(140, 20)).unwrap();
        let records = make_records(5);
        app.table_state.select(Some(4));

        terminal
            .draw(|frame| app.render_records(frame, &records))
            .unwrap();
        terminal.draw(|frame| app.render_records(frame, &[])).unwrap();
    }
}
