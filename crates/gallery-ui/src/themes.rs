use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`.  Background values
/// 0–6 are considered dark; 7–15 are considered light.  If the variable is
/// absent or unparseable, `BackgroundType::Dark` is returned.
pub fn detect_background() -> BackgroundType {
    if let Ok(val) = std::env::var("COLORFGBG") {
        return background_from_colorfgbg(&val);
    }
    BackgroundType::Dark
}

fn background_from_colorfgbg(val: &str) -> BackgroundType {
    match val.split(';').next_back().and_then(|bg| bg.parse::<u8>().ok()) {
        Some(bg) if bg > 6 => BackgroundType::Light,
        _ => BackgroundType::Dark,
    }
}

/// Styles used by the gallery views.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Text ─────────────────────────────────────────────────────────────────
    pub title: Style,
    pub text: Style,
    pub dim: Style,
    pub label: Style,
    pub value: Style,
    pub warning: Style,

    // ── Histogram ────────────────────────────────────────────────────────────
    /// Alternating bar colours, cycled per bucket.
    pub bars: [Style; 3],
    pub bar_value: Style,
    pub bar_label: Style,

    // ── Table ────────────────────────────────────────────────────────────────
    pub table_header: Style,
    pub table_row: Style,
    pub table_row_alt: Style,
    pub table_selected: Style,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            title: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            warning: Style::default().fg(Color::Yellow),

            bars: [
                Style::default().fg(Color::Green),
                Style::default().fg(Color::Magenta),
                Style::default().fg(Color::Yellow),
            ],
            bar_value: Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD),
            bar_label: Style::default().fg(Color::Red),

            table_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_selected: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Light-background terminal theme.
    pub fn light() -> Self {
        Self {
            title: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            warning: Style::default().fg(Color::Yellow),

            bars: [
                Style::default().fg(Color::Green),
                Style::default().fg(Color::Magenta),
                Style::default().fg(Color::Blue),
            ],
            bar_value: Style::default()
                .fg(Color::White)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD),
            bar_label: Style::default().fg(Color::Red),

            table_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            table_row: Style::default().fg(Color::Black),
            table_row_alt: Style::default().fg(Color::DarkGray),
            table_selected: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Classic theme using only the basic 8-colour ANSI palette, no bold.
    pub fn classic() -> Self {
        Self {
            title: Style::default().fg(Color::Green),
            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default().fg(Color::White),
            warning: Style::default().fg(Color::Yellow),

            bars: [
                Style::default().fg(Color::Green),
                Style::default().fg(Color::Cyan),
                Style::default().fg(Color::Yellow),
            ],
            bar_value: Style::default().fg(Color::Black).bg(Color::Green),
            bar_label: Style::default().fg(Color::White),

            table_header: Style::default().fg(Color::Cyan),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_selected: Style::default().fg(Color::Yellow),
        }
    }

    /// Choose a theme automatically based on the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            BackgroundType::Dark => Self::dark(),
        }
    }

    /// Construct a theme by name.  Falls back to `auto_detect` for unknown
    /// names.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    /// Bar colour for the bucket at `index`.
    pub fn bar_style(&self, index: usize) -> Style {
        self.bars[index % self.bars.len()]
    }

    /// Zebra-striped row style for the table row at `index`.
    pub fn row_style(&self, index: usize) -> Style {
        if index % 2 == 0 {
            self.table_row
        } else {
            self.table_row_alt
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dark_theme_creation() {
        let t = Theme::dark();
        assert_eq!(t.title.fg, Some(Color::Green));
        assert_eq!(t.warning.fg, Some(Color::Yellow));
        assert_eq!(t.bars[1].fg, Some(Color::Magenta));
    }

    #[test]
    fn test_light_theme_creation() {
        let t = Theme::light();
        assert_eq!(t.text.fg, Some(Color::Black));
        assert_eq!(t.table_header.fg, Some(Color::Blue));
    }

    #[test]
    fn test_classic_theme_has_no_bold() {
        let t = Theme::classic();
        assert!(!t.title.add_modifier.contains(Modifier::BOLD));
        assert!(!t.table_header.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Theme::from_name("light").text.fg, Some(Color::Black));
        assert_eq!(Theme::from_name("dark").text.fg, Some(Color::White));
        assert_eq!(Theme::from_name("classic").bars[1].fg, Some(Color::Cyan));
    }

    #[test]
    fn test_from_name_unknown_falls_back() {
        let t = Theme::from_name("neon");
        assert!(t.text.fg == Some(Color::White) || t.text.fg == Some(Color::Black));
    }

    #[test]
    fn test_background_from_colorfgbg() {
        assert_eq!(background_from_colorfgbg("15;0"), BackgroundType::Dark);
        assert_eq!(background_from_colorfgbg("0;15"), BackgroundType::Light);
        assert_eq!(background_from_colorfgbg("garbage"), BackgroundType::Dark);
    }

    #[test]
    fn test_bar_style_cycles() {
        let t = Theme::dark();
        assert_eq!(t.bar_style(0), t.bar_style(3));
        assert_ne!(t.bar_style(0), t.bar_style(1));
    }

    #[test]
    fn test_row_style_alternates() {
        let t = Theme::dark();
        assert_eq!(t.row_style(0), t.table_row);
        assert_eq!(t.row_style(1), t.table_row_alt);
    }
}
