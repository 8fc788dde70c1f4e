//! Loads the tag and ingredient JSON files named in the `[seed]` section
//! into the configured store, skipping entries that already exist.
//!
//! ```bash
//! cargo run --bin import_catalog
//! ```
use potluck_server::{db::open_store, seed, settings::Settings};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_target(false).init();

    let config_path = Settings::config_path();
    tracing::info!("Loading settings from {}", config_path.display());
    let settings = Settings::load(&config_path)?;
    if settings.seed.tags_path.is_none() && settings.seed.ingredients_path.is_none() {
        tracing::warn!("No seed files configured, nothing to import");
        return Ok(());
    }

    let store = open_store(&settings).await?;
    let report = seed::load_catalog(store.as_ref(), &settings.seed, false).await?;
    tracing::info!(
        tags = report.tags,
        ingredients = report.ingredients,
        "Catalog import finished"
    );

    Ok(())
}
