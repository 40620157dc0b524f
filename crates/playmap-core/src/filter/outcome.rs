use crate::facets::StaleSelection;
use crate::model::{Classification, Record, RecordId};
use crate::view::{Bounds, ClusterSummary};
use serde::{Deserialize, Serialize};

/// A record in the visible set, reduced to what a marker needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisibleRecord {
    pub id: RecordId,
    /// Display name ("Unnamed Playground" when the source has none).
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub classification: Classification,
    /// Source classification string, when it differs from the canonical one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_classification: Option<String>,
    /// Whether the record lies inside the viewport (always true without one).
    pub in_viewport: bool,
}

impl VisibleRecord {
    pub fn from_record(record: &Record, viewport: Option<&Bounds>) -> VisibleRecord {
        VisibleRecord {
            id: record.id.clone(),
            name: record.display_name().to_string(),
            lat: record.lat,
            lng: record.lng,
            classification: record.classification,
            raw_classification: record
                .raw_classification
                .clone()
                .filter(|raw| raw != record.classification.as_str()),
            in_viewport: viewport.map_or(true, |b| b.contains_record(record)),
        }
    }
}

/// Result of one recompute: the visible set, the viewport count and, when
/// requested, the cell clusters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderView {
    /// Visible records in source order.
    pub visible: Vec<VisibleRecord>,
    pub visible_total: usize,
    /// Visible records inside the viewport.
    pub in_viewport: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewport: Option<Bounds>,
    /// Human-readable size range, e.g. "Tiny - Super".
    pub size_range: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub clusters: Vec<ClusterSummary>,
    /// Filter selections that match nothing in the collection.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stale_selections: Vec<StaleSelection>,
}
