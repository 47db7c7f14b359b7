use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gallery_core::settings::app_dir;

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure the standard `~/.gallery-stats/` directory hierarchy exists.
pub fn ensure_directories() -> anyhow::Result<()> {
    ensure_directories_in(&app_dir())
}

/// Create `base/`, `base/logs/` and `base/store/` (including any missing
/// parents).
pub fn ensure_directories_in(base: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(base)?;
    std::fs::create_dir_all(base.join("logs"))?;
    std::fs::create_dir_all(base.join("store"))?;
    Ok(())
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` value to a tracing filter directive.
///
/// Unrecognised values are passed through and left for [`EnvFilter`] to
/// accept or reject.
pub fn level_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        _ => log_level.to_lowercase(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// With `log_file` set, events are appended to that file without ANSI
/// colours; otherwise they go to stderr. Falls back to `"info"` if the level
/// is not a valid filter.
pub fn setup_logging(log_level: &str, log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(level_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            registry
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .try_init()?;
        }
        None => {
            registry
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_writer(std::io::stderr),
                )
                .try_init()?;
        }
    }

    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_directories_in() {
        let tmp = TempDir::new().expect("tempdir");
        let base = tmp.path().join(".gallery-stats");

        ensure_directories_in(&base).expect("ensure_directories_in should succeed");

        assert!(base.is_dir(), ".gallery-stats dir must exist");
        assert!(base.join("logs").is_dir(), "logs subdir must exist");
        assert!(base.join("store").is_dir(), "store subdir must exist");
    }

    #[test]
    fn test_ensure_directories_in_is_idempotent() {
        let tmp = TempDir::new().expect("tempdir");
        ensure_directories_in(tmp.path()).expect("first");
        ensure_directories_in(tmp.path()).expect("second");
    }

    #[test]
    fn test_level_directive_mapping() {
        assert_eq!(level_directive("DEBUG"), "debug");
        assert_eq!(level_directive("INFO"), "info");
        assert_eq!(level_directive("WARNING"), "warn");
        assert_eq!(level_directive("ERROR"), "error");
        assert_eq!(level_directive("CRITICAL"), "error");
        assert_eq!(level_directive("trace"), "trace");
    }

    #[test]
    fn test_setup_logging_to_file() {
        let tmp = TempDir::new().expect("tempdir");
        let log_path = tmp.path().join("logs").join("gallery.log");

        setup_logging("INFO", Some(&log_path)).expect("setup_logging");
        tracing::info!("hello from the test");

        let content = std::fs::read_to_string(&log_path).expect("read log");
        assert!(content.contains("hello from the test"));
    }
}
