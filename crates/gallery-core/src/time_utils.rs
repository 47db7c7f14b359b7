use std::sync::OnceLock;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use regex::Regex;
use tracing::warn;

use crate::models::RecordTimestamp;

/// Long human-readable layout used for display strings,
/// e.g. `"January 05, 2023 at 10:00:00 AM"`.
pub const DISPLAY_FORMAT: &str = "%B %d, %Y at %I:%M:%S %p";

/// Naive layouts accepted for text timestamps, tried in order after RFC 3339
/// and RFC 2822.
const NAIVE_FORMATS: &[&str] = &[
    DISPLAY_FORMAT,
    "%B %e, %Y at %I:%M:%S %p",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

/// Date-only layouts, interpreted as local midnight.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%B %d, %Y"];

// ── System timezone detection ─────────────────────────────────────────────────

/// Detect the IANA timezone name of the running system.
///
/// Falls back to `"UTC"` if detection fails.
pub fn get_system_timezone() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string())
}

// ── TimezoneHandler ───────────────────────────────────────────────────────────

/// Turns stored timestamps into display strings in one configured timezone.
#[derive(Debug, Clone, Copy)]
pub struct TimezoneHandler {
    tz: Tz,
}

impl Default for TimezoneHandler {
    fn default() -> Self {
        Self { tz: Tz::UTC }
    }
}

impl TimezoneHandler {
    /// Create a handler for the given IANA timezone name.
    ///
    /// If `tz_name` is not a recognised IANA timezone, falls back to UTC
    /// and logs a warning.
    pub fn new(tz_name: &str) -> Self {
        let tz = tz_name.parse::<Tz>().unwrap_or_else(|_| {
            warn!(
                "TimezoneHandler: unrecognised timezone \"{}\", falling back to UTC",
                tz_name
            );
            Tz::UTC
        });
        Self { tz }
    }

    /// Validate that `tz_name` is a recognised IANA timezone identifier.
    pub fn validate_timezone(tz_name: &str) -> bool {
        tz_name.parse::<Tz>().is_ok()
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Format an instant with [`DISPLAY_FORMAT`] in the handler's timezone.
    pub fn format_display(&self, dt: DateTime<Utc>) -> String {
        dt.with_timezone(&self.tz).format(DISPLAY_FORMAT).to_string()
    }

    /// Produce the long display string for a stored timestamp.
    ///
    /// Instants are formatted directly. Text is parsed first; strings without
    /// an offset are read as wall-clock time in the handler's timezone so that
    /// an already formatted display string keeps its month. Returns `None`
    /// when the text matches no known layout.
    pub fn display_string(&self, timestamp: &RecordTimestamp) -> Option<String> {
        match timestamp {
            RecordTimestamp::Instant(dt) => Some(self.format_display(*dt)),
            RecordTimestamp::Text(s) => self.parse_text(s).map(|dt| self.format_display(dt)),
        }
    }

    /// Parse a text timestamp into a UTC instant.
    pub fn parse_text(&self, s: &str) -> Option<DateTime<Utc>> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        // Replace trailing 'Z' with '+00:00'.
        let normalised = if let Some(stripped) = s.strip_suffix('Z') {
            format!("{}+00:00", stripped)
        } else {
            s.to_string()
        };

        if let Ok(dt) = DateTime::parse_from_rfc3339(&normalised) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Some(dt) = parse_console_format(s) {
            return Some(dt);
        }

        for fmt in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return self.localize(naive);
            }
        }
        for fmt in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
                return self.localize(date.and_hms_opt(0, 0, 0)?);
            }
        }

        warn!("TimezoneHandler: could not parse timestamp \"{}\"", s);
        None
    }

    /// Read a wall-clock time in the handler's timezone. Ambiguous times (DST
    /// fall-back) resolve to the earlier instant; times skipped by a DST
    /// spring-forward gap are moved forward by an hour, past the gap.
    fn localize(&self, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
        self.tz
            .from_local_datetime(&naive)
            .earliest()
            .or_else(|| {
                let shifted = naive.checked_add_signed(TimeDelta::hours(1))?;
                self.tz.from_local_datetime(&shifted).earliest()
            })
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Parse the document-console layout that appends an offset to the display
/// string, e.g. `"January 5, 2023 at 10:00:00 AM UTC+1"` or `"... UTC-05:30"`.
fn parse_console_format(s: &str) -> Option<DateTime<Utc>> {
    static CONSOLE_RE: OnceLock<Regex> = OnceLock::new();
    let re = CONSOLE_RE.get_or_init(|| {
        Regex::new(r"^(?P<local>.+?\d{1,2}:\d{2}:\d{2}\s*[AaPp][Mm])\s*UTC(?:(?P<sign>[+-])(?P<hours>\d{1,2})(?::(?P<minutes>\d{2}))?)?$")
            .expect("regex is valid")
    });

    let caps = re.captures(s)?;
    let local = caps.name("local")?.as_str();

    let offset_secs = match caps.name("sign") {
        Some(sign) => {
            let hours: i32 = caps.name("hours")?.as_str().parse().ok()?;
            let minutes: i32 = caps
                .name("minutes")
                .map(|m| m.as_str().parse())
                .transpose()
                .ok()?
                .unwrap_or(0);
            let secs = hours * 3600 + minutes * 60;
            if sign.as_str() == "-" {
                -secs
            } else {
                secs
            }
        }
        None => 0,
    };
    let offset = FixedOffset::east_opt(offset_secs)?;

    let naive = ["%B %d, %Y at %I:%M:%S %p", "%B %e, %Y at %I:%M:%S %p"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(local, fmt).ok())?;

    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// The leading month-name token of a display string, e.g. `"January"` for
/// `"January 05, 2023 at 10:00:00 AM"`.
pub fn month_token(display: &str) -> Option<&str> {
    display.split_whitespace().next()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
