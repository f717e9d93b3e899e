//! # Bias Classification
//! Maps continuous source scores onto discrete categories.
//!
//! - Bias score lives on a symmetric `[-10, +10]` scale centered at 0.
//! - Reliability score lives on `[0, 10]`.
//! - Intervals are half-open: the lower endpoint belongs to the category,
//!   so `-6.7` is "Left" and `3.3` is "Right".
//!
//! For coverage tallying the five bias categories collapse into three
//! spectrum buckets (left / center / right).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outer edge between "Far Left"/"Left" and "Right"/"Far Right".
pub const FAR_THRESHOLD: f64 = 6.7;
/// Edge between the leaning categories and "Center".
pub const LEAN_THRESHOLD: f64 = 3.3;

/// Reliability edges on the `[0, 10]` scale.
pub const RELIABILITY_LOW_MAX: f64 = 3.3;
pub const RELIABILITY_MEDIUM_MAX: f64 = 6.7;

/// Five ordered bias categories, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BiasCategory {
    #[serde(rename = "Far Left")]
    FarLeft,
    Left,
    Center,
    Right,
    #[serde(rename = "Far Right")]
    FarRight,
}

impl BiasCategory {
    /// Classify a bias score. Total over all finite inputs.
    pub fn from_score(score: f64) -> Self {
        if score < -FAR_THRESHOLD {
            BiasCategory::FarLeft
        } else if score < -LEAN_THRESHOLD {
            BiasCategory::Left
        } else if score < LEAN_THRESHOLD {
            BiasCategory::Center
        } else if score < FAR_THRESHOLD {
            BiasCategory::Right
        } else {
            BiasCategory::FarRight
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BiasCategory::FarLeft => "Far Left",
            BiasCategory::Left => "Left",
            BiasCategory::Center => "Center",
            BiasCategory::Right => "Right",
            BiasCategory::FarRight => "Far Right",
        }
    }

    /// Three-way bucket used by coverage tallies.
    pub fn bucket(self) -> SpectrumBucket {
        match self {
            BiasCategory::FarLeft | BiasCategory::Left => SpectrumBucket::Left,
            BiasCategory::Center => SpectrumBucket::Center,
            BiasCategory::Right | BiasCategory::FarRight => SpectrumBucket::Right,
        }
    }
}

impl fmt::Display for BiasCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReliabilityCategory {
    Low,
    Medium,
    High,
}

impl ReliabilityCategory {
    pub fn from_score(score: f64) -> Self {
        if score < RELIABILITY_LOW_MAX {
            ReliabilityCategory::Low
        } else if score < RELIABILITY_MEDIUM_MAX {
            ReliabilityCategory::Medium
        } else {
            ReliabilityCategory::High
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReliabilityCategory::Low => "Low",
            ReliabilityCategory::Medium => "Medium",
            ReliabilityCategory::High => "High",
        }
    }
}

impl fmt::Display for ReliabilityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Coarse side of the spectrum a source counts towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpectrumBucket {
    Left,
    Center,
    Right,
}
