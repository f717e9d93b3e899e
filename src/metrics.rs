use anyhow::Context;
use axum::{routing::get, Router};
use metrics::{describe_counter, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::config::AnalyzerConfig;

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global Prometheus recorder. Fails if one is already installed.
    pub fn init(cfg: &AnalyzerConfig) -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;

        describe_counter!("coverage_runs_total", "Coverage analyses performed");
        describe_counter!("coverage_clusters_total", "Story clusters returned by analyses");
        describe_counter!("coverage_blindspots_total", "Clusters flagged with a blindspot");
        describe_counter!("ingest_headlines_total", "Headlines collected from providers");
        describe_counter!("ingest_provider_errors_total", "Provider fetches that failed");

        // Static gauge with the active clustering threshold
        gauge!("coverage_similarity_threshold").set(cfg.similarity_threshold);

        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
