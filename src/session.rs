//! # Reading Session
//! Caller-owned memory of the last analysis, so a follow-up request can say
//! "open story 2, article 1" without any process-wide state.
//!
//! Indices are 1-based, the way they are shown to readers.

use chrono::{DateTime, Utc};

use crate::coverage::CoverageAnalysis;
use crate::headline::HeadlineRecord;

#[derive(Debug, Clone, Default)]
pub struct ReadingSession {
    region: Option<String>,
    analyses: Vec<CoverageAnalysis>,
    recorded_at: Option<DateTime<Utc>>,
}

impl ReadingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the remembered results.
    pub fn record(&mut self, region: &str, analyses: Vec<CoverageAnalysis>) {
        self.region = Some(region.to_string());
        self.analyses = analyses;
        self.recorded_at = Some(Utc::now());
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        self.recorded_at
    }

    pub fn len(&self) -> usize {
        self.analyses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.analyses.is_empty()
    }

    pub fn stories(&self) -> &[CoverageAnalysis] {
        &self.analyses
    }

    /// Story `n` (1-based).
    pub fn story(&self, n: usize) -> Option<&CoverageAnalysis> {
        n.checked_sub(1).and_then(|i| self.analyses.get(i))
    }

    /// Article `item` (1-based) of story `n` (1-based).
    pub fn article(&self, n: usize, item: usize) -> Option<&HeadlineRecord> {
        let story = self.story(n)?;
        item.checked_sub(1).and_then(|i| story.story.items.get(i))
    }
}
