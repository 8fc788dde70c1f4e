use potluck_server::{
    db::open_store,
    error::Result,
    logging::init_tracing_to_file,
    routes, seed, serve,
    settings::Settings,
    state::AppState,
};

#[tokio::main]
async fn main() {
    let _guard = init_tracing_to_file();

    if let Err(e) = run().await {
        tracing::error!("potluck-server failed: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config_path = Settings::config_path();
    tracing::info!("Loading settings from {}", config_path.display());
    let settings = Settings::load(&config_path)?;

    let store = open_store(&settings).await?;
    let report = seed::load_catalog(store.as_ref(), &settings.seed, true).await?;
    if report.tags + report.ingredients > 0 {
        tracing::info!(
            tags = report.tags,
            ingredients = report.ingredients,
            "Catalog seeded"
        );
    }

    let state = AppState::new(store, settings.shopping_list.clone());
    let router = routes::create_routes(state);

    tracing::info!("potluck started on port {}", settings.http.port);
    tracing::info!(
        "Swagger UI available at: http://localhost:{}/swagger-ui",
        settings.http.port
    );
    serve(settings.http.port, router).await?;
    Ok(())
}
