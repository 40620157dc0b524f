//! Cluster dominance: which classification a group of markers is drawn as.
//!
//! This ordering is independent of the slider buckets in `size`: it ranks
//! every raw classification individually, largest first.

use crate::model::{Classification, Record};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dominance order, highest priority first.
pub const CLUSTER_PRIORITY: [Classification; 9] = [
    Classification::Super,
    Classification::Large,
    Classification::Medium,
    Classification::Small,
    Classification::Tiny,
    Classification::Unverified,
    Classification::ExistsNotDigitallyClassifiable,
    Classification::UnderConstruction,
    Classification::UnsureIfExists,
];

/// Label used when a cluster has nothing to rank and no raw value to echo.
pub const UNRANKED_DEFAULT: &str = "Unverified";

pub fn priority_rank(classification: Classification) -> usize {
    CLUSTER_PRIORITY
        .iter()
        .position(|c| *c == classification)
        .unwrap_or(CLUSTER_PRIORITY.len())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DominantClassification {
    /// Highest-priority classification among the members.
    Ranked(Classification),
    /// No member had a rankable classification; the first member's raw value.
    Unranked(String),
}

impl DominantClassification {
    pub fn label(&self) -> &str {
        match self {
            DominantClassification::Ranked(c) => c.as_str(),
            DominantClassification::Unranked(s) => s,
        }
    }
}

impl fmt::Display for DominantClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Resolve the dominant classification of a cluster.
///
/// Ranks members by their raw classification. Returns `None` only for an
/// empty group.
pub fn dominant_classification<'a, I>(members: I) -> Option<DominantClassification>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut iter = members.into_iter();
    let first = iter.next()?;

    let rank_of = |r: &Record| {
        r.raw_classification
            .as_deref()
            .and_then(Classification::from_raw)
            .map(|c| (priority_rank(c), c))
    };

    let best = std::iter::once(first)
        .chain(iter)
        .filter_map(rank_of)
        .min_by_key(|(rank, _)| *rank);

    Some(match best {
        Some((_, c)) => DominantClassification::Ranked(c),
        None => DominantClassification::Unranked(
            first
                .raw_classification
                .clone()
                .unwrap_or_else(|| UNRANKED_DEFAULT.to_string()),
        ),
    })
}

/// Discrete cluster icon size, chosen by member count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterTier {
    Small,
    Medium,
    Large,
    Huge,
}

impl ClusterTier {
    pub fn for_count(count: usize) -> ClusterTier {
        match count {
            0..=9 => ClusterTier::Small,
            10..=49 => ClusterTier::Medium,
            50..=99 => ClusterTier::Large,
            _ => ClusterTier::Huge,
        }
    }

    /// Icon diameter in pixels.
    pub fn diameter_px(&self) -> u32 {
        match self {
            ClusterTier::Small => 35,
            ClusterTier::Medium => 45,
            ClusterTier::Large => 55,
            ClusterTier::Huge => 65,
        }
    }

    pub fn font_size_px(&self) -> u32 {
        match self {
            ClusterTier::Small => 12,
            ClusterTier::Medium => 14,
            ClusterTier::Large => 16,
            ClusterTier::Huge => 18,
        }
    }
}
