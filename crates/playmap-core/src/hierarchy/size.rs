//! Slider ordering of classifications: several raw values share one visual
//! bucket, and the range filter works over bucket indices.

use crate::model::Classification;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One slider position and the raw classifications it stands for.
#[derive(Debug, Clone, Copy)]
pub struct SizeBucket {
    pub label: &'static str,
    pub members: &'static [Classification],
}

/// Slider order, smallest emphasis first.
pub const SIZE_BUCKETS: [SizeBucket; 7] = [
    SizeBucket {
        label: "Unverified",
        members: &[
            Classification::Unverified,
            Classification::UnsureIfExists,
            Classification::ExistsNotDigitallyClassifiable,
        ],
    },
    SizeBucket {
        label: "Rebuild",
        members: &[Classification::UnderConstruction],
    },
    SizeBucket {
        label: "Tiny",
        members: &[Classification::Tiny],
    },
    SizeBucket {
        label: "Small",
        members: &[Classification::Small],
    },
    SizeBucket {
        label: "Medium",
        members: &[Classification::Medium],
    },
    SizeBucket {
        label: "Large",
        members: &[Classification::Large],
    },
    SizeBucket {
        label: "Super",
        members: &[Classification::Super],
    },
];

pub const MAX_BUCKET: usize = SIZE_BUCKETS.len() - 1;

/// Bucket index of the slider's default lower handle ("Tiny").
pub const DEFAULT_MIN_BUCKET: usize = 2;

/// Bucket index of a classification.
pub fn bucket_of(classification: Classification) -> usize {
    SIZE_BUCKETS
        .iter()
        .position(|b| b.members.contains(&classification))
        .unwrap_or(0)
}

/// Bucket index of a raw classification string. Missing and unknown values
/// land in the "Unverified" bucket.
pub fn bucket_index(raw: Option<&str>) -> usize {
    raw.and_then(Classification::from_raw)
        .map(bucket_of)
        .unwrap_or(0)
}

/// Bucket index for a slider label ("tiny", "Super") or a bare index ("3").
pub fn bucket_by_label(label: &str) -> Option<usize> {
    let label = label.trim();
    if let Ok(index) = label.parse::<usize>() {
        return (index <= MAX_BUCKET).then_some(index);
    }
    SIZE_BUCKETS
        .iter()
        .position(|b| b.label.eq_ignore_ascii_case(label))
}

/// Inclusive range of bucket indices selected on the slider.
///
/// Both endpoints stay within `0..=MAX_BUCKET` and `min <= max`; out-of-order
/// input is clamped, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SizeRangeDef")]
pub struct SizeRange {
    min: usize,
    max: usize,
}

#[derive(Deserialize)]
struct SizeRangeDef {
    min: usize,
    max: usize,
}

impl From<SizeRangeDef> for SizeRange {
    fn from(def: SizeRangeDef) -> Self {
        SizeRange::new(def.min, def.max)
    }
}

impl Default for SizeRange {
    /// Tiny through Super, the slider's starting position.
    fn default() -> Self {
        SizeRange {
            min: DEFAULT_MIN_BUCKET,
            max: MAX_BUCKET,
        }
    }
}

impl SizeRange {
    /// Build a range; the lower endpoint is pulled down to the upper one
    /// when they cross.
    pub fn new(min: usize, max: usize) -> SizeRange {
        let max = max.min(MAX_BUCKET);
        let min = min.min(max);
        SizeRange { min, max }
    }

    /// Every bucket selected.
    pub fn full() -> SizeRange {
        SizeRange {
            min: 0,
            max: MAX_BUCKET,
        }
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> usize {
        self.max
    }

    /// Move the lower handle; it cannot pass the upper one.
    pub fn with_min(self, min: usize) -> SizeRange {
        SizeRange {
            min: min.min(self.max),
            max: self.max,
        }
    }

    /// Move the upper handle; it cannot pass the lower one.
    pub fn with_max(self, max: usize) -> SizeRange {
        SizeRange {
            min: self.min,
            max: max.clamp(self.min, MAX_BUCKET),
        }
    }

    pub fn contains_bucket(&self, bucket: usize) -> bool {
        (self.min..=self.max).contains(&bucket)
    }

    pub fn is_full(&self) -> bool {
        self.min == 0 && self.max == MAX_BUCKET
    }

    pub fn min_label(&self) -> &'static str {
        SIZE_BUCKETS[self.min].label
    }

    pub fn max_label(&self) -> &'static str {
        SIZE_BUCKETS[self.max].label
    }
}

impl fmt::Display for SizeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "{}", self.min_label())
        } else {
            write!(f, "{} - {}", self.min_label(), self.max_label())
        }
    }
}

/// Raw classifications whose bucket falls inside the range.
pub fn classifications_in_range(range: SizeRange) -> Vec<Classification> {
    SIZE_BUCKETS[range.min..=range.max]
        .iter()
        .flat_map(|b| b.members.iter().copied())
        .collect()
}

/// Whether a raw classification passes the size range.
pub fn is_size_included(raw: Option<&str>, range: SizeRange) -> bool {
    range.contains_bucket(bucket_index(raw))
}
