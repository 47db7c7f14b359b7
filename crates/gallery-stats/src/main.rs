mod bootstrap;
mod views;

use anyhow::Result;
use gallery_core::settings::Settings;
use gallery_data::aggregator::AggregationOptions;
use gallery_data::store::{DocumentStore, FileStore};
use gallery_ui::app::App;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load()?;

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Gallery Stats v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "View: {}, Collection: {}, Timezone: {}, Theme: {}",
        settings.view,
        settings.collection,
        settings.timezone,
        settings.theme
    );

    let options = AggregationOptions {
        timezone: settings.timezone_handler(),
        untimestamped: settings.untimestamped_policy()?,
        order: settings.bucket_order()?,
    };

    let store_path = settings.store_path();
    tracing::info!("Opening store at {}", store_path.display());
    let store = FileStore::open(&store_path)?;
    match store.list_collections() {
        Ok(names) => tracing::debug!(
            "Collections in {}: {}",
            store.root().display(),
            names.join(", ")
        ),
        Err(e) => tracing::warn!("Could not list collections: {}", e),
    }

    match settings.view.as_str() {
        "histogram" => {
            let histogram = views::monthly_histogram(&store, &settings.collection, &options)?;
            let app = App::new(&settings.theme, settings.collection.clone());

            // The TUI handles 'q' / Ctrl+C itself; the OS-level signal covers
            // the window before raw mode is entered.
            tokio::select! {
                result = app.run_histogram(histogram.series()) => result?,
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Ctrl+C received; shutting down");
                }
            }
        }

        "list" => {
            let records =
                views::record_listing(&store, &settings.collection, &options.timezone)?;
            let app = App::new(&settings.theme, settings.collection.clone());

            tokio::select! {
                result = app.run_records(records) => result?,
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Ctrl+C received; shutting down");
                }
            }
        }

        "json" => {
            let histogram = views::monthly_histogram(&store, &settings.collection, &options)?;
            println!("{}", views::histogram_json(&histogram)?);
        }

        "text" => {
            let histogram = views::monthly_histogram(&store, &settings.collection, &options)?;
            println!("{}", views::histogram_text(&histogram));
        }

        unknown => {
            eprintln!("Unknown view mode: {}", unknown);
        }
    }

    store.close()?;
    tracing::info!("Store closed");

    Ok(())
}
