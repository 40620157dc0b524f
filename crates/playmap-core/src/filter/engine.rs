use crate::filter::state::{FacilityFilter, FilterState};
use crate::hierarchy::is_size_included;
use crate::model::{Facet, Record};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One clause of the filter that a record failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Clause {
    Facility(FacilityFilter),
    Facet(Facet),
    Keywords,
    Size,
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::Facility(facility) => write!(f, "facility: {}", facility.label()),
            Clause::Facet(facet) => write!(f, "{}", facet.label()),
            Clause::Keywords => f.write_str("keywords"),
            Clause::Size => f.write_str("size range"),
        }
    }
}

/// Whether a record passes every clause of the filter.
pub fn should_show(record: &Record, filter: &FilterState) -> bool {
    filter.facilities.iter().all(|f| f.matches(record))
        && filter
            .facets
            .iter()
            .all(|(facet, selected)| matches_facet(record, *facet, selected))
        && matches_keywords(record, &filter.keywords)
        && is_size_included(record.raw_classification.as_deref(), filter.size_range)
}

/// Exact match against any selected value. Nothing selected means no
/// constraint; a record with no value never matches a non-empty selection.
pub fn matches_facet(record: &Record, facet: Facet, selected: &[String]) -> bool {
    if selected.is_empty() {
        return true;
    }
    match facet.value(record) {
        Some(value) => selected.iter().any(|s| s == value),
        None => false,
    }
}

/// True when no keyword is selected, or the record carries at least one
/// selected keyword as a tag (case-insensitive).
pub fn matches_keywords(record: &Record, keywords: &[String]) -> bool {
    keywords.is_empty() || keywords.iter().any(|k| record.has_tag(k))
}

/// Every clause the record fails, in evaluation order. Empty when the
/// record is shown.
pub fn rejections(record: &Record, filter: &FilterState) -> Vec<Clause> {
    let mut failed: Vec<Clause> = filter
        .facilities
        .iter()
        .filter(|f| !f.matches(record))
        .map(|f| Clause::Facility(*f))
        .collect();

    for (facet, selected) in &filter.facets {
        if !matches_facet(record, *facet, selected) {
            failed.push(Clause::Facet(*facet));
        }
    }
    if !matches_keywords(record, &filter.keywords) {
        failed.push(Clause::Keywords);
    }
    if !is_size_included(record.raw_classification.as_deref(), filter.size_range) {
        failed.push(Clause::Size);
    }

    failed
}

/// Records passing the filter, in input order.
pub fn compute_visible_set<'a>(records: &'a [Record], filter: &FilterState) -> Vec<&'a Record> {
    records.iter().filter(|r| should_show(r, filter)).collect()
}
