//! # Blindspot Service
//! Wires the collaborators (headline providers, source registry, config)
//! around the pure coverage engine.

use tracing::info;

use crate::config::AnalyzerConfig;
use crate::coverage::{select_blindspots, CoverageAnalysis, CoverageAnalyzer};
use crate::headline::HeadlineRecord;
use crate::ingest::{collect_headlines, demo::DemoHeadlines, types::HeadlineSource};
use crate::sources::SourceRegistry;

pub struct BlindspotService {
    cfg: AnalyzerConfig,
    registry: SourceRegistry,
    providers: Vec<Box<dyn HeadlineSource>>,
}

impl BlindspotService {
    pub fn new(
        cfg: AnalyzerConfig,
        registry: SourceRegistry,
        providers: Vec<Box<dyn HeadlineSource>>,
    ) -> Self {
        Self {
            cfg,
            registry,
            providers,
        }
    }

    /// Default config/registry with the bundled demo headlines.
    pub fn demo() -> Self {
        Self::new(
            AnalyzerConfig::default(),
            SourceRegistry::load_default(),
            vec![Box::new(DemoHeadlines)],
        )
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.cfg
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    pub async fn headlines(&self, region: &str) -> Vec<HeadlineRecord> {
        collect_headlines(&self.providers, region, self.cfg.max_items_per_source).await
    }

    /// Run the pure engine over an already materialized list.
    pub fn analyze(&self, records: Vec<HeadlineRecord>, region: &str) -> Vec<CoverageAnalysis> {
        CoverageAnalyzer::from_config(&self.registry, &self.cfg).analyze(records, region)
    }

    /// Fetch headlines for `region` and score them.
    pub async fn coverage(&self, region: &str) -> Vec<CoverageAnalysis> {
        let records = self.headlines(region).await;
        let out = self.analyze(records, region);
        info!(region, stories = out.len(), "coverage computed");
        out
    }

    /// Fetch, score and keep the newest `max_items` blindspot stories.
    pub async fn find_blindspots(&self, region: &str, max_items: usize) -> Vec<CoverageAnalysis> {
        select_blindspots(self.coverage(region).await, max_items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn demo_us_batch_is_all_singletons_and_filtered_out() {
        // Nine distinct stories: large batch, every cluster has one member.
        let svc = BlindspotService::new(
            AnalyzerConfig::default(),
            SourceRegistry::default_seed(),
            vec![Box::new(DemoHeadlines)],
        );
        assert_eq!(svc.headlines("US").await.len(), 9);
        assert!(svc.coverage("US").await.is_empty());
    }

    #[tokio::test]
    async fn demo_ca_batch_is_kept_but_unclassified() {
        let svc = BlindspotService::new(
            AnalyzerConfig::default(),
            SourceRegistry::default_seed(),
            vec![Box::new(DemoHeadlines)],
        );
        let out = svc.coverage("CA").await;
        assert_eq!(out.len(), 5);
        assert!(out.iter().all(|a| a.total_sources() == 0 && a.blindspot.is_none()));
        assert!(svc.find_blindspots("CA", 5).await.is_empty());
    }
}
