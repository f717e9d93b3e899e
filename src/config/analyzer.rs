// src/config/analyzer.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_ANALYZER_CONFIG_PATH: &str = "ANALYZER_CONFIG_PATH";
pub const DEFAULT_ANALYZER_CONFIG_TOML: &str = "config/analyzer.toml";
pub const DEFAULT_ANALYZER_CONFIG_JSON: &str = "config/analyzer.json";

fn default_similarity_threshold() -> f64 {
    0.7
}
fn default_blindspot_fraction() -> f64 {
    0.2
}
fn default_small_batch_max_clusters() -> usize {
    5
}
fn default_min_cluster_items() -> usize {
    2
}
fn default_region() -> String {
    "US".to_string()
}
fn default_max_items_per_source() -> usize {
    5
}
fn default_max_blindspots() -> usize {
    5
}

/// Tunables of the clustering/coverage pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Minimum title ratio for two headlines to share a cluster.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
    /// A side counts as missing when its share of classified sources is below this.
    #[serde(default = "default_blindspot_fraction")]
    pub blindspot_fraction: f64,
    /// Batches with at most this many clusters keep every cluster.
    #[serde(default = "default_small_batch_max_clusters")]
    pub small_batch_max_clusters: usize,
    /// Larger batches keep only clusters with at least this many items.
    #[serde(default = "default_min_cluster_items")]
    pub min_cluster_items: usize,
    #[serde(default = "default_region")]
    pub default_region: String,
    #[serde(default = "default_max_items_per_source")]
    pub max_items_per_source: usize,
    #[serde(default = "default_max_blindspots")]
    pub max_blindspots: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            blindspot_fraction: default_blindspot_fraction(),
            small_batch_max_clusters: default_small_batch_max_clusters(),
            min_cluster_items: default_min_cluster_items(),
            default_region: default_region(),
            max_items_per_source: default_max_items_per_source(),
            max_blindspots: default_max_blindspots(),
        }
    }
}

impl AnalyzerConfig {
    /// Load from an explicit path. TOML or JSON, chosen by extension.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading analyzer config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let cfg: AnalyzerConfig = match ext.as_str() {
            "json" => serde_json::from_str(&content).context("parsing analyzer json")?,
            _ => toml::from_str(&content).context("parsing analyzer toml")?,
        };
        Ok(cfg.sanitized())
    }

    /// Load using env var + fallbacks:
    /// 1) $ANALYZER_CONFIG_PATH
    /// 2) config/analyzer.toml
    /// 3) config/analyzer.json
    /// 4) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_ANALYZER_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from_file(&pb);
            } else {
                return Err(anyhow!("ANALYZER_CONFIG_PATH points to non-existent path"));
            }
        }
        for candidate in [DEFAULT_ANALYZER_CONFIG_TOML, DEFAULT_ANALYZER_CONFIG_JSON] {
            let p = PathBuf::from(candidate);
            if p.exists() {
                return Self::load_from_file(&p);
            }
        }
        Ok(Self::default())
    }

    /// Replace out-of-range values with their defaults.
    pub fn sanitized(mut self) -> Self {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            self.similarity_threshold = default_similarity_threshold();
        }
        if !(0.0..=1.0).contains(&self.blindspot_fraction) {
            self.blindspot_fraction = default_blindspot_fraction();
        }
        if self.min_cluster_items == 0 {
            self.min_cluster_items = default_min_cluster_items();
        }
        if self.max_items_per_source == 0 {
            self.max_items_per_source = default_max_items_per_source();
        }
        self.default_region = self.default_region.trim().to_ascii_uppercase();
        if self.default_region.is_empty() {
            self.default_region = default_region();
        }
        self
    }
}
