use clap::Parser;
use std::path::PathBuf;

use crate::error::{GalleryError, Result};
use crate::models::{BucketOrder, UntimestampedPolicy};
use crate::time_utils::{get_system_timezone, TimezoneHandler};

/// Directory under the home directory holding the default store and logs.
pub const APP_DIR_NAME: &str = ".gallery-stats";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Monthly statistics for image records kept in a document store
#[derive(Parser, Debug, Clone)]
#[command(
    name = "gallery-stats",
    about = "Monthly statistics for image records kept in a document store",
    version
)]
pub struct Settings {
    /// View to show
    #[arg(long, default_value = "histogram", value_parser = ["histogram", "list", "json", "text"])]
    pub view: String,

    /// Root directory of the document store
    #[arg(long, env = "GALLERY_STORE")]
    pub store: Option<PathBuf>,

    /// Collection to read records from
    #[arg(long, default_value = "images")]
    pub collection: String,

    /// Timezone used for display strings and month grouping (auto-detected if not specified)
    #[arg(long, default_value = "auto")]
    pub timezone: String,

    /// How to treat records without a usable timestamp
    #[arg(long, default_value = "drop", value_parser = ["drop", "unknown"])]
    pub untimestamped: String,

    /// Order of the month buckets
    #[arg(long, default_value = "label", value_parser = ["label", "calendar"])]
    pub order: String,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and resolve `"auto"` values.
    pub fn load() -> Result<Self> {
        Self::load_from_args(std::env::args_os())
    }

    /// Same as [`Settings::load`] but with an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::resolve_auto_values(Settings::parse_from(args))
    }

    /// Resolve the `"auto"` timezone, reject unknown zones and apply `--debug`.
    fn resolve_auto_values(mut settings: Settings) -> Result<Settings> {
        if settings.timezone == "auto" {
            let detected = get_system_timezone();
            settings.timezone = if TimezoneHandler::validate_timezone(&detected) {
                detected
            } else {
                tracing::warn!("system timezone \"{}\" not recognised, using UTC", detected);
                "UTC".to_string()
            };
        }
        if !TimezoneHandler::validate_timezone(&settings.timezone) {
            return Err(GalleryError::Config(format!(
                "unrecognised timezone \"{}\"",
                settings.timezone
            )));
        }

        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        Ok(settings)
    }

    /// Store root: `--store` / `GALLERY_STORE`, else `~/.gallery-stats/store`.
    pub fn store_path(&self) -> PathBuf {
        self.store.clone().unwrap_or_else(default_store_path)
    }

    pub fn untimestamped_policy(&self) -> Result<UntimestampedPolicy> {
        self.untimestamped.parse()
    }

    pub fn bucket_order(&self) -> Result<BucketOrder> {
        self.order.parse()
    }

    pub fn timezone_handler(&self) -> TimezoneHandler {
        TimezoneHandler::new(&self.timezone)
    }
}

/// `~/.gallery-stats/store`, or `./.gallery-stats/store` without a home dir.
pub fn default_store_path() -> PathBuf {
    app_dir().join("store")
}

/// `~/.gallery-stats`, or `./.gallery-stats` without a home dir.
pub fn app_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
