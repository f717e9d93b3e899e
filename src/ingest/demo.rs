//! Built-in demo headlines (US, UK, CA, AU) for offline runs and tests.
//!
//! Ages are stored relative to "now" and materialized on every fetch.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;

use crate::headline::HeadlineRecord;
use crate::ingest::types::HeadlineSource;

const FALLBACK_REGION: &str = "US";

#[derive(Debug, Clone, Deserialize)]
struct DemoItem {
    title: String,
    url: String,
    source: String,
    age_hours: i64,
    #[serde(default)]
    description: Option<String>,
}

static DEMO: Lazy<HashMap<String, Vec<DemoItem>>> = Lazy::new(|| {
    let raw = include_str!("../../data/demo_headlines.json");
    serde_json::from_str(raw).expect("valid demo headlines")
});

/// Offline headline source backed by the bundled demo set.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoHeadlines;

impl DemoHeadlines {
    /// Demo records for `region` relative to `now`; unknown regions get the US set.
    pub fn records_at(region: &str, now: DateTime<Utc>) -> Vec<HeadlineRecord> {
        let key = region.trim().to_ascii_uppercase();
        let items = DEMO
            .get(&key)
            .or_else(|| DEMO.get(FALLBACK_REGION))
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        items
            .iter()
            .filter_map(|it| {
                let ts = now - Duration::hours(it.age_hours);
                let rec = HeadlineRecord::new(&it.title, &it.source, Some(ts)).ok()?;
                let rec = rec.with_url(it.url.clone());
                Some(match &it.description {
                    Some(d) => rec.with_description(d.clone()),
                    None => rec,
                })
            })
            .collect()
    }

    pub fn regions() -> Vec<String> {
        let mut v: Vec<String> = DEMO.keys().cloned().collect();
        v.sort();
        v
    }
}

#[async_trait]
impl HeadlineSource for DemoHeadlines {
    async fn fetch_region(&self, region: &str) -> Result<Vec<HeadlineRecord>> {
        Ok(Self::records_at(region, Utc::now()))
    }

    fn name(&self) -> &'static str {
        "demo"
    }
}
