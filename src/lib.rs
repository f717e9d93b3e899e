// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod bias;
pub mod config;
pub mod similarity;
pub mod sources;

// Headline pipeline: records -> clusters -> coverage
pub mod cluster;
pub mod coverage;
pub mod framing;
pub mod headline;
pub mod ingest;

pub mod api;
pub mod metrics;
pub mod service;
pub mod session;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::coverage::{Blindspot, CoverageAnalysis, CoverageAnalyzer};
pub use crate::headline::{HeadlineRecord, IngestError};
pub use crate::service::BlindspotService;
pub use crate::sources::{BiasLookup, SourceRegistry};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - BLINDSPOT_DEV_LOG=1
pub fn enable_dev_tracing() {
    let dev_flag = std::env::var("BLINDSPOT_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("coverage=info,warn"));

    // try_init: the shuttle runtime may already own a global subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}
