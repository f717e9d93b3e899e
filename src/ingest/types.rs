// src/ingest/types.rs
use anyhow::Result;

use crate::headline::HeadlineRecord;

/// Anything that can hand the analyzer a list of headlines for a region.
#[async_trait::async_trait]
pub trait HeadlineSource: Send + Sync {
    async fn fetch_region(&self, region: &str) -> Result<Vec<HeadlineRecord>>;
    fn name(&self) -> &'static str;
}
