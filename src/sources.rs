//! # Source Registry
//!
//! Static reference data keyed by `(region, source name)`: each source carries a
//! continuous bias score in `[-10, +10]` and a reliability score in `[0, 10]`.
//!
//! - Loads from a JSON file (`{ "US": [ {...}, ... ], ... }`).
//! - Falls back to a built-in seed when no file is configured or readable.
//! - Region codes are upper-cased; source names match exactly within a region.
//! - The `BiasLookup` trait is the only thing the coverage analyzer needs.
//!
//! Unknown sources are never given a default score: lookups return `None`
//! and the caller excludes them from tallies.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, path::Path};
use thiserror::Error;
use tracing::{info, warn};

use crate::bias::{BiasCategory, ReliabilityCategory};

pub const ENV_SOURCES_DB_PATH: &str = "SOURCES_DB_PATH";

static SEED: Lazy<BTreeMap<String, Vec<NewsSource>>> = Lazy::new(|| {
    let raw = include_str!("../data/default_sources.json");
    serde_json::from_str(raw).expect("valid default sources seed")
});

/// Registry lookup used by the coverage analyzer.
pub trait BiasLookup {
    fn bias_category(&self, region: &str, source: &str) -> Option<BiasCategory>;
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("invalid region code '{0}' (expected two letters)")]
    InvalidRegion(String),
    #[error("bias score {0} outside [-10, 10]")]
    BiasOutOfRange(f64),
    #[error("reliability score {0} outside [0, 10]")]
    ReliabilityOutOfRange(f64),
    #[error("source '{name}' already registered for {region}")]
    Duplicate { region: String, name: String },
    #[error("reading/writing source registry: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing source registry: {0}")]
    Json(#[from] serde_json::Error),
}

/// One registered outlet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsSource {
    pub name: String,
    pub url: String,
    pub country_code: String,
    /// -10 (far left) .. +10 (far right)
    pub bias_score: f64,
    /// 0 (unreliable) .. 10 (highly reliable)
    pub reliability_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rss_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_endpoint: Option<String>,
}

impl NewsSource {
    pub fn bias_category(&self) -> BiasCategory {
        BiasCategory::from_score(self.bias_score)
    }

    pub fn reliability_category(&self) -> ReliabilityCategory {
        ReliabilityCategory::from_score(self.reliability_score)
    }
}

/// In-memory registry of sources grouped by region.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceRegistry {
    regions: BTreeMap<String, Vec<NewsSource>>,
}

impl SourceRegistry {
    /// Empty registry (every lookup misses).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Built-in seed with a handful of US and UK outlets.
    pub fn default_seed() -> Self {
        Self {
            regions: SEED.clone(),
        }
    }

    /// Strict load from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, RegistryError> {
        let raw = fs::read_to_string(path)?;
        let parsed: BTreeMap<String, Vec<NewsSource>> = serde_json::from_str(&raw)?;
        let regions = parsed
            .into_iter()
            .map(|(k, v)| (normalize_region(&k), v))
            .collect();
        Ok(Self { regions })
    }

    /// Load from a JSON file, falling back to `default_seed()` on any error.
    pub fn load_or_seed<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::load_from_file(path) {
            Ok(reg) => reg,
            Err(e) => {
                warn!(error = %e, path = %path.display(), "source registry unavailable, using seed");
                Self::default_seed()
            }
        }
    }

    /// `$SOURCES_DB_PATH` if set, otherwise the seed.
    pub fn load_default() -> Self {
        match std::env::var(ENV_SOURCES_DB_PATH) {
            Ok(p) if !p.trim().is_empty() => Self::load_or_seed(p.trim()),
            _ => Self::default_seed(),
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), RegistryError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let body = serde_json::to_string_pretty(&self.regions)?;
        fs::write(path, body)?;
        info!(path = %path.display(), regions = self.regions.len(), "source registry saved");
        Ok(())
    }

    pub fn sources_for_region(&self, region: &str) -> &[NewsSource] {
        self.regions
            .get(&normalize_region(region))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Region codes that have at least one entry, sorted.
    pub fn available_regions(&self) -> Vec<String> {
        self.regions
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, _)| k.clone())
            .collect()
    }

    pub fn lookup(&self, region: &str, name: &str) -> Option<&NewsSource> {
        self.sources_for_region(region)
            .iter()
            .find(|s| s.name == name)
    }

    /// Validate and register a new source under its `country_code`.
    pub fn add_source(&mut self, mut source: NewsSource) -> Result<(), RegistryError> {
        let region = normalize_region(&source.country_code);
        if region.len() != 2 || !region.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(RegistryError::InvalidRegion(source.country_code));
        }
        if !(-10.0..=10.0).contains(&source.bias_score) {
            return Err(RegistryError::BiasOutOfRange(source.bias_score));
        }
        if !(0.0..=10.0).contains(&source.reliability_score) {
            return Err(RegistryError::ReliabilityOutOfRange(source.reliability_score));
        }
        if self.lookup(&region, &source.name).is_some() {
            return Err(RegistryError::Duplicate {
                region,
                name: source.name,
            });
        }

        source.country_code = region.clone();
        self.regions.entry(region).or_default().push(source);
        Ok(())
    }

    /// Returns `true` if something was removed.
    pub fn remove_source(&mut self, region: &str, name: &str) -> bool {
        let Some(list) = self.regions.get_mut(&normalize_region(region)) else {
            return false;
        };
        let before = list.len();
        list.retain(|s| s.name != name);
        list.len() < before
    }
}

impl<T: BiasLookup + ?Sized> BiasLookup for &T {
    fn bias_category(&self, region: &str, source: &str) -> Option<BiasCategory> {
        (**self).bias_category(region, source)
    }
}

impl BiasLookup for SourceRegistry {
    fn bias_category(&self, region: &str, source: &str) -> Option<BiasCategory> {
        self.lookup(region, source).map(NewsSource::bias_category)
    }
}

fn normalize_region(region: &str) -> String {
    region.trim().to_ascii_uppercase()
}
