//! Headline framing: how each outlet titled the same story.

use serde::Serialize;

use crate::cluster::StoryCluster;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFraming {
    pub source: String,
    pub titles: Vec<String>,
}

/// Titles grouped per source, sources in first-appearance order.
pub fn headline_framing(cluster: &StoryCluster) -> Vec<SourceFraming> {
    let mut out: Vec<SourceFraming> = Vec::new();
    for item in &cluster.items {
        match out.iter_mut().find(|f| f.source == item.source) {
            Some(f) => f.titles.push(item.title.clone()),
            None => out.push(SourceFraming {
                source: item.source.clone(),
                titles: vec![item.title.clone()],
            }),
        }
    }
    out
}
