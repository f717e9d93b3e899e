//! # Coverage Engine
//! Pure logic that maps `(headlines, region)` → ranked `CoverageAnalysis` list.
//! No I/O; safe to call from any thread.
//!
//! Pipeline:
//! 1. Cluster records (greedy first-match by default).
//! 2. Keep significant clusters. Small batches (≤ `small_batch_max_clusters`
//!    clusters) keep everything; larger batches drop clusters with fewer than
//!    `min_cluster_items` members. Both knobs come from `AnalyzerConfig`.
//! 3. Resolve every distinct source of a cluster through the bias registry and
//!    tally left/center/right. Unresolved sources count nowhere.
//! 4. Flag a blindspot when one side's share is below `blindspot_fraction`
//!    while the other side has coverage. The left check runs first.
//! 5. Sort by item count, descending, stable.

use serde::{Serialize, Serializer};
use std::fmt;
use tracing::debug;

use crate::bias::SpectrumBucket;
use crate::cluster::{Clusterer, GreedyTitleClusterer, StoryCluster};
use crate::config::AnalyzerConfig;
use crate::headline::HeadlineRecord;
use crate::sources::BiasLookup;

/// Which end of the spectrum under-covers a story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Blindspot {
    MinimalLeft,
    MinimalRight,
}

impl Blindspot {
    pub fn message(self) -> &'static str {
        match self {
            Blindspot::MinimalLeft => "Minimal coverage from left-leaning sources",
            Blindspot::MinimalRight => "Minimal coverage from right-leaning sources",
        }
    }
}

impl fmt::Display for Blindspot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl Serialize for Blindspot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.message())
    }
}

/// Spectrum coverage of one story cluster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageAnalysis {
    pub story: StoryCluster,
    /// Distinct sources per bucket (not items).
    pub left_sources: usize,
    pub center_sources: usize,
    pub right_sources: usize,
    pub left_leaning_sources: Vec<String>,
    pub center_leaning_sources: Vec<String>,
    pub right_leaning_sources: Vec<String>,
    pub blindspot: Option<Blindspot>,
}

impl CoverageAnalysis {
    /// Sources that resolved to a bias category.
    pub fn total_sources(&self) -> usize {
        self.left_sources + self.center_sources + self.right_sources
    }
}

/// Blindspot rule over distinct-source counts. `None` when nothing was classified.
pub fn detect_blindspot(left: usize, center: usize, right: usize, fraction: f64) -> Option<Blindspot> {
    let total = left + center + right;
    if total == 0 {
        return None;
    }
    let left_frac = left as f64 / total as f64;
    let right_frac = right as f64 / total as f64;

    if left_frac < fraction && right > 0 {
        Some(Blindspot::MinimalLeft)
    } else if right_frac < fraction && left > 0 {
        Some(Blindspot::MinimalRight)
    } else {
        None
    }
}

/// Clusters headlines and scores each cluster's spectrum coverage.
#[derive(Debug, Clone)]
pub struct CoverageAnalyzer<L, C = GreedyTitleClusterer> {
    lookup: L,
    clusterer: C,
    blindspot_fraction: f64,
    small_batch_max_clusters: usize,
    min_cluster_items: usize,
}

impl<L: BiasLookup> CoverageAnalyzer<L, GreedyTitleClusterer> {
    /// Analyzer with the greedy title clusterer and default tunables.
    pub fn new(lookup: L) -> Self {
        Self::from_config(lookup, &AnalyzerConfig::default())
    }

    pub fn from_config(lookup: L, cfg: &AnalyzerConfig) -> Self {
        Self::with_clusterer(lookup, GreedyTitleClusterer::new(cfg.similarity_threshold), cfg)
    }
}

impl<L: BiasLookup, C: Clusterer> CoverageAnalyzer<L, C> {
    pub fn with_clusterer(lookup: L, clusterer: C, cfg: &AnalyzerConfig) -> Self {
        Self {
            lookup,
            clusterer,
            blindspot_fraction: cfg.blindspot_fraction,
            small_batch_max_clusters: cfg.small_batch_max_clusters,
            min_cluster_items: cfg.min_cluster_items,
        }
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Cluster, filter, tally, flag and rank. Empty input → empty output.
    pub fn analyze(&self, records: Vec<HeadlineRecord>, region: &str) -> Vec<CoverageAnalysis> {
        let n_items = records.len();
        let clusters = self.clusterer.cluster(records);
        let n_clusters = clusters.len();

        let significant = self.significant(clusters);
        debug!(
            target: "coverage",
            items = n_items,
            clusters = n_clusters,
            significant = significant.len(),
            region,
            "clustered headlines"
        );

        let mut results: Vec<CoverageAnalysis> = significant
            .into_iter()
            .map(|cluster| self.score_cluster(cluster, region))
            .collect();

        // sort_by is stable: equal counts keep discovery order
        results.sort_by(|a, b| b.story.item_count().cmp(&a.story.item_count()));
        results
    }

    /// Stories with a blindspot, newest first, at most `max_items`.
    pub fn find_blindspots(
        &self,
        records: Vec<HeadlineRecord>,
        region: &str,
        max_items: usize,
    ) -> Vec<CoverageAnalysis> {
        select_blindspots(self.analyze(records, region), max_items)
    }

    fn significant(&self, clusters: Vec<StoryCluster>) -> Vec<StoryCluster> {
        if clusters.len() <= self.small_batch_max_clusters {
            return clusters;
        }
        clusters
            .into_iter()
            .filter(|c| c.item_count() >= self.min_cluster_items)
            .collect()
    }

    fn score_cluster(&self, cluster: StoryCluster, region: &str) -> CoverageAnalysis {
        let mut left = Vec::new();
        let mut center = Vec::new();
        let mut right = Vec::new();

        for source in &cluster.sources {
            let category = self.lookup.bias_category(region, source);
            debug!(target: "coverage", source = %source, bias = ?category, "resolved source");
            match category.map(|c| c.bucket()) {
                Some(SpectrumBucket::Left) => left.push(source.clone()),
                Some(SpectrumBucket::Center) => center.push(source.clone()),
                Some(SpectrumBucket::Right) => right.push(source.clone()),
                None => {}
            }
        }

        let blindspot = detect_blindspot(left.len(), center.len(), right.len(), self.blindspot_fraction);

        CoverageAnalysis {
            story: cluster,
            left_sources: left.len(),
            center_sources: center.len(),
            right_sources: right.len(),
            left_leaning_sources: left,
            center_leaning_sources: center,
            right_leaning_sources: right,
            blindspot,
        }
    }
}

/// Filter to flagged analyses, newest story first (stable), truncated.
pub fn select_blindspots(analyses: Vec<CoverageAnalysis>, max_items: usize) -> Vec<CoverageAnalysis> {
    let mut flagged: Vec<CoverageAnalysis> = analyses
        .into_iter()
        .filter(|a| a.blindspot.is_some())
        .collect();
    flagged.sort_by(|a, b| b.story.recency().cmp(&a.story.recency()));
    flagged.truncate(max_items);
    flagged
}
