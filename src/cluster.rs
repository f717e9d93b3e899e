//! # Story Clustering
//! Groups headline records that refer to the same real-world story.
//!
//! The default strategy is greedy and order-sensitive: each incoming record
//! joins the first existing cluster (in creation order) that holds a member
//! whose title is similar enough, otherwise it opens a new cluster. The output
//! is a partition of the input, not a similarity graph, and an early ambiguous
//! title can pull later near-duplicates into its cluster.
//!
//! The strategy sits behind `Clusterer` so a different algorithm can be
//! plugged into the analyzer without touching the tally/blindspot logic.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::headline::HeadlineRecord;
use crate::similarity::title_similarity;

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.7;

/// A set of records judged to report the same story.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoryCluster {
    /// Title of the first member.
    pub title: String,
    /// Members in discovery order.
    pub items: Vec<HeadlineRecord>,
    /// Distinct source names in first-seen order.
    pub sources: Vec<String>,
}

impl StoryCluster {
    pub fn seeded(record: HeadlineRecord) -> Self {
        Self {
            title: record.title.clone(),
            sources: vec![record.source.clone()],
            items: vec![record],
        }
    }

    pub fn push(&mut self, record: HeadlineRecord) {
        if !self.sources.iter().any(|s| *s == record.source) {
            self.sources.push(record.source.clone());
        }
        self.items.push(record);
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Newest publication time, or `DateTime::<Utc>::MIN_UTC` when empty.
    pub fn recency(&self) -> DateTime<Utc> {
        self.items
            .iter()
            .map(|it| it.published_at)
            .max()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Hours between the newest member and `now`.
    pub fn age_hours(&self, now: DateTime<Utc>) -> f64 {
        let delta = now.signed_duration_since(self.recency());
        delta.num_milliseconds() as f64 / 3_600_000.0
    }
}

/// Pairwise title comparator.
pub trait TitleSimilarity {
    fn similarity(&self, incoming: &str, existing: &str) -> f64;
}

/// Case-insensitive gestalt ratio (see `similarity`).
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceRatio;

impl TitleSimilarity for SequenceRatio {
    fn similarity(&self, incoming: &str, existing: &str) -> f64 {
        title_similarity(incoming, existing)
    }
}

/// Turns an ordered list of records into an ordered list of clusters that
/// covers every record exactly once.
pub trait Clusterer {
    fn cluster(&self, records: Vec<HeadlineRecord>) -> Vec<StoryCluster>;
}

/// First-match greedy clustering.
#[derive(Debug, Clone)]
pub struct GreedyTitleClusterer<S = SequenceRatio> {
    similarity: S,
    threshold: f64,
}

impl GreedyTitleClusterer<SequenceRatio> {
    pub fn new(threshold: f64) -> Self {
        Self::with_similarity(SequenceRatio, threshold)
    }
}

impl Default for GreedyTitleClusterer<SequenceRatio> {
    fn default() -> Self {
        Self::new(DEFAULT_SIMILARITY_THRESHOLD)
    }
}

impl<S: TitleSimilarity> GreedyTitleClusterer<S> {
    pub fn with_similarity(similarity: S, threshold: f64) -> Self {
        Self {
            similarity,
            threshold,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Index of the first cluster with a member at or above the threshold.
    fn first_match(&self, clusters: &[StoryCluster], title: &str) -> Option<usize> {
        clusters.iter().position(|c| {
            c.items
                .iter()
                .any(|member| self.similarity.similarity(title, &member.title) >= self.threshold)
        })
    }
}

impl<S: TitleSimilarity> Clusterer for GreedyTitleClusterer<S> {
    fn cluster(&self, records: Vec<HeadlineRecord>) -> Vec<StoryCluster> {
        let mut clusters: Vec<StoryCluster> = Vec::new();
        for record in records {
            match self.first_match(&clusters, &record.title) {
                Some(idx) => clusters[idx].push(record),
                None => clusters.push(StoryCluster::seeded(record)),
            }
        }
        clusters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn rec(title: &str, source: &str) -> HeadlineRecord {
        HeadlineRecord::new(title, source, Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()))
            .unwrap()
    }

    #[test]
    fn near_duplicates_join_and_others_split() {
        let out = GreedyTitleClusterer::default().cluster(vec![
            rec("Budget Plan", "CNN"),
            rec("Bud get Pl@n", "Fox News"),
            rec("Totally Unrelated", "AP News"),
        ]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].title, "Budget Plan");
        assert_eq!(out[0].item_count(), 2);
        assert_eq!(out[0].sources, vec!["CNN", "Fox News"]);
        assert_eq!(out[1].title, "Totally Unrelated");
        assert_eq!(out[1].item_count(), 1);
    }

    #[test]
    fn sources_are_deduplicated_but_items_are_not() {
        let out = GreedyTitleClusterer::default().cluster(vec![
            rec("Budget Plan", "CNN"),
            rec("Budget Plan", "CNN"),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].item_count(), 2);
        assert_eq!(out[0].sources, vec!["CNN"]);
    }

    #[test]
    fn first_matching_cluster_wins() {
        // "Storm budget" could fit both clusters; it goes to the older one.
        let c = GreedyTitleClusterer::with_similarity(SharedWord, 0.7);
        let out = c.cluster(vec![
            rec("Storm hits coast", "A"),
            rec("Budget talks", "B"),
            rec("Storm budget", "C"),
        ]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].item_count(), 2);
        assert_eq!(out[1].item_count(), 1);
    }

    /// Comparator that matches titles sharing any lower-cased word.
    struct SharedWord;
    impl TitleSimilarity for SharedWord {
        fn similarity(&self, a: &str, b: &str) -> f64 {
            let a = a.to_lowercase();
            let b = b.to_lowercase();
            let hit = a
                .split_whitespace()
                .any(|w| b.split_whitespace().any(|v| v == w));
            if hit {
                1.0
            } else {
                0.0
            }
        }
    }

    #[test]
    fn match_against_any_member_not_just_the_seed() {
        let c = GreedyTitleClusterer::with_similarity(SharedWord, 0.7);
        let out = c.cluster(vec![
            rec("Storm hits coast", "A"),
            rec("Coast guard rescue", "B"),
            rec("Guard promoted", "C"),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "Storm hits coast");
        assert_eq!(out[0].sources, vec!["A", "B", "C"]);
    }

    #[test]
    fn partition_covers_every_record_once() {
        let titles = [
            "Government Announces New Budget Plan",
            "Budget Plan Draws Criticism from Opposition",
            "Government Announces New Budget Plans",
            "Scientists Welcome Climate Initiative",
            "Government announces new budget plan",
        ];
        let input: Vec<HeadlineRecord> = titles
            .iter()
            .enumerate()
            .map(|(i, t)| rec(t, &format!("S{i}")))
            .collect();
        let out = GreedyTitleClusterer::default().cluster(input.clone());

        let flattened: Vec<HeadlineRecord> = out.iter().flat_map(|c| c.items.clone()).collect();
        assert_eq!(flattened.len(), input.len());
        for r in &input {
            assert_eq!(flattened.iter().filter(|x| *x == r).count(), 1);
        }
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn recency_and_age() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut c = StoryCluster::seeded(HeadlineRecord::new("A", "X", Some(t0)).unwrap());
        c.push(HeadlineRecord::new("A", "Y", Some(t0 + Duration::hours(2))).unwrap());
        assert_eq!(c.recency(), t0 + Duration::hours(2));
        assert!((c.age_hours(t0 + Duration::hours(5)) - 3.0).abs() < 1e-9);

        let empty = StoryCluster {
            title: "none".into(),
            items: vec![],
            sources: vec![],
        };
        assert_eq!(empty.recency(), DateTime::<Utc>::MIN_UTC);
    }
}
