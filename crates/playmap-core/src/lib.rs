pub mod error;
pub mod facets;
pub mod filter;
pub mod hierarchy;
pub mod model;
pub mod moderation;
pub mod parsing;
pub mod presets;
pub mod report;
pub mod search;
pub mod view;

use error::PlaymapError;
use facets::FacetIndex;
use filter::{compute_visible_set, FilterState, RenderView, VisibleRecord};
use model::{Record, RecordId};
use report::LoadReport;
use std::collections::HashMap;
use std::path::Path;
use view::{count_in_viewport, group_by_cell, Bounds, ViewOptions};

/// A loaded record collection with its facet choices derived once.
#[derive(Debug, Clone)]
pub struct Collection {
    pub records: Vec<Record>,
    pub facets: FacetIndex,
    pub report: LoadReport,
    by_id: HashMap<RecordId, usize>,
}

impl Collection {
    pub fn new(records: Vec<Record>, report: LoadReport) -> Collection {
        let facets = FacetIndex::build(&records);
        let by_id = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.clone(), i))
            .collect();
        Collection {
            records,
            facets,
            report,
            by_id,
        }
    }

    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.by_id.get(id).map(|&i| &self.records[i])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Main entry point: normalize a JSON record collection.
///
/// Accepts a JSON array of records or a GeoJSON FeatureCollection. Records
/// that cannot be placed on the map are dropped and listed in the report.
pub fn load_collection(json: &str) -> Result<Collection, PlaymapError> {
    let (records, report) = parsing::parse_collection(json)?;
    Ok(Collection::new(records, report))
}

/// Read and normalize a record collection from a file.
pub fn load_collection_file(path: &Path) -> Result<Collection, PlaymapError> {
    let content = std::fs::read_to_string(path)?;
    load_collection(&content)
}

/// Recompute what the map shows for one filter snapshot.
///
/// Without a viewport every visible record counts as in view. Clusters are
/// only built when `options.cluster_precision` is set.
pub fn render_view(
    collection: &Collection,
    filter: &FilterState,
    viewport: Option<&Bounds>,
    options: &ViewOptions,
) -> Result<RenderView, PlaymapError> {
    let visible = compute_visible_set(&collection.records, filter);

    let in_viewport = match viewport {
        Some(bounds) => count_in_viewport(&visible, bounds),
        None => visible.len(),
    };

    let clusters = match options.cluster_precision {
        Some(precision) => group_by_cell(&visible, precision)?,
        None => Vec::new(),
    };

    log::debug!(
        "Rendered view: {} of {} records visible, {} in viewport (size range {})",
        visible.len(),
        collection.len(),
        in_viewport,
        filter.size_range
    );

    Ok(RenderView {
        visible_total: visible.len(),
        in_viewport,
        viewport: viewport.copied(),
        size_range: filter.size_range.to_string(),
        clusters,
        stale_selections: collection.facets.stale_selections(filter),
        visible: visible
            .iter()
            .map(|r| VisibleRecord::from_record(r, viewport))
            .collect(),
    })
}
