//! Blindspot Analyzer: Binary Entrypoint
//! Boots the Axum HTTP server, wiring routes, shared state, and middleware.

use blindspot_analyzer::{
    config::AnalyzerConfig, create_router, enable_dev_tracing, ingest::demo::DemoHeadlines,
    metrics::Metrics, AppState, BlindspotService, SourceRegistry,
};
use shuttle_axum::ShuttleAxum;

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    // Picks up ANALYZER_CONFIG_PATH / SOURCES_DB_PATH / BLINDSPOT_DEV_LOG.
    let _ = dotenvy::dotenv();

    enable_dev_tracing();

    let cfg = AnalyzerConfig::load_default()?;
    let registry = SourceRegistry::load_default();
    tracing::info!(
        regions = ?registry.available_regions(),
        threshold = cfg.similarity_threshold,
        "analyzer configured"
    );

    let metrics = Metrics::init(&cfg)?;
    let service = BlindspotService::new(cfg, registry, vec![Box::new(DemoHeadlines)]);
    let router = create_router(AppState::new(service)).merge(metrics.router());

    Ok(router.into())
}
