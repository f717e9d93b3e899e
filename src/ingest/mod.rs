// src/ingest/mod.rs
pub mod demo;
pub mod rss;
pub mod types;

use crate::headline::HeadlineRecord;
use crate::ingest::types::HeadlineSource;
use metrics::counter;
use std::collections::HashMap;

/// Gather headlines for `region` from every provider.
///
/// Providers run in order; a failing provider is logged and skipped. Each
/// outlet contributes at most `max_per_source` records per provider. The
/// merged list is sorted newest first (stable).
pub async fn collect_headlines(
    providers: &[Box<dyn HeadlineSource>],
    region: &str,
    max_per_source: usize,
) -> Vec<HeadlineRecord> {
    let mut all = Vec::new();
    for p in providers {
        match p.fetch_region(region).await {
            Ok(v) => {
                let mut v = cap_per_outlet(v, max_per_source);
                counter!("ingest_headlines_total").increment(v.len() as u64);
                all.append(&mut v);
            }
            Err(e) => {
                tracing::warn!(error = ?e, provider = p.name(), region, "provider error");
                counter!("ingest_provider_errors_total").increment(1);
            }
        }
    }

    sort_newest_first(&mut all);
    all
}

/// Keep the first `max` records of every outlet, preserving order.
pub fn cap_per_outlet(records: Vec<HeadlineRecord>, max: usize) -> Vec<HeadlineRecord> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    records
        .into_iter()
        .filter(|r| {
            let n = seen.entry(r.source.clone()).or_insert(0);
            *n += 1;
            *n <= max
        })
        .collect()
}

pub fn sort_newest_first(records: &mut [HeadlineRecord]) {
    records.sort_by(|a, b| b.published_at.cmp(&a.published_at));
}
