//! End-to-end tests: load a collection, apply filter states, render views.
//!
//! Fixtures are inline JSON in both source shapes so the tests need no data
//! files.

use playmap_core::error::PlaymapError;
use playmap_core::filter::{compute_visible_set, FacilityFilter, FilterState};
use playmap_core::hierarchy::{
    dominant_classification, is_size_included, DominantClassification, SizeRange,
};
use playmap_core::model::{Classification, Facet, Record, RecordId};
use playmap_core::moderation::{review, Proposal, ProposalTarget};
use playmap_core::presets::builtin::load_preset;
use playmap_core::presets::load_preset_file;
use playmap_core::view::{count_in_viewport, Bounds, ViewOptions};
use playmap_core::{load_collection, load_collection_file, render_view, Collection};
use std::io::Write;

const FLAT_RECORDS: &str = r#"[
    {"uid": 1, "name": "Speers Point Park", "lat": -32.96, "lng": 151.62, "classification": "Super",
     "type": "Council Playground", "suburb": "Speers Point", "lga": "Lake Macquarie",
     "shade": "Natural and Sail", "fencing": "Partially Fenced", "toilet": true, "bbq": true,
     "water_play": true, "baby_swing": 2, "keywords": "Lake, Shade, BBQ"},
    {"uid": 2, "name": "Lambton Park", "lat": -32.91, "lng": 151.71, "classification": "Large",
     "type": "Council Playground", "suburb": "Lambton", "lga": "Newcastle",
     "shade": "Sail", "fencing": "Fully Fenced", "toilet": true, "trampoline": 1,
     "keywords": "Fenced, Shade"},
    {"uid": 3, "name": "Wallsend School", "lat": -32.90, "lng": 151.66, "classification": "Small",
     "type": "School Playground", "suburb": "Wallsend", "lga": "Newcastle", "shade": "No Shade"},
    {"uid": 4, "name": "Old Quarry Reserve", "lat": -32.93, "lng": 151.69, "classification": null,
     "type": "Council Playground", "suburb": null},
    {"uid": 5, "name": "Merewether Baths", "lat": -32.95, "lng": 151.75,
     "classification": "Under Construction", "type": "Council Playground", "suburb": "Merewether",
     "lga": "Newcastle"}
]"#;

const GEO_RECORDS: &str = r#"{"type": "FeatureCollection", "features": [
    {"type": "Feature", "geometry": {"type": "Point", "coordinates": [151.5, -32.7]},
     "properties": {"UID": 1, "Name": "Toronto Foreshore", "Classification": null,
                    "Skate Park": "Yes", "Keywords": "Lake"}},
    {"type": "Feature", "geometry": {"type": "Point", "coordinates": [151.6, -32.8]},
     "properties": {"UID": 2, "Name": "Warners Bay", "Classification": "Super",
                    "Flying Fox": "Large", "Keywords": "Lake, Scooter"}},
    {"type": "Feature", "geometry": null,
     "properties": {"UID": 3, "Name": "Nowhere Park", "Classification": "Tiny"}}
]}"#;

fn flat() -> Collection {
    load_collection(FLAT_RECORDS).unwrap()
}

fn ids(visible: &[&Record]) -> Vec<String> {
    visible.iter().map(|r| r.id.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Loading: both shapes normalize, bad records are isolated
// ---------------------------------------------------------------------------
#[test]
fn geo_collection_drops_record_without_position() {
    let collection = load_collection(GEO_RECORDS).unwrap();

    assert_eq!(collection.len(), 2);
    assert_eq!(collection.report.total, 3);
    assert_eq!(collection.report.dropped.len(), 1);
    assert_eq!(collection.report.dropped[0].record, "3");

    let warners = collection.get(&RecordId::Int(2)).unwrap();
    assert_eq!((warners.lat, warners.lng), (-32.8, 151.6));
    assert_eq!(warners.facets.flying_fox.as_deref(), Some("Large"));
}

#[test]
fn collection_loads_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(FLAT_RECORDS.as_bytes()).unwrap();

    let collection = load_collection_file(file.path()).unwrap();
    assert_eq!(collection.len(), 5);
    assert!(collection.report.is_clean());
}

// ---------------------------------------------------------------------------
// Scenario 1: null classification passes a full-span range
// ---------------------------------------------------------------------------
#[test]
fn scenario_null_classification_full_span() {
    let collection = load_collection(GEO_RECORDS).unwrap();
    let filter = FilterState::default().with_size_range(SizeRange::full());

    let visible = compute_visible_set(&collection.records, &filter);
    assert_eq!(ids(&visible), vec!["1", "2"]);
    assert!(is_size_included(None, SizeRange::full()));
}

// ---------------------------------------------------------------------------
// Scenario 2: Tiny..Super excludes unverified records
// ---------------------------------------------------------------------------
#[test]
fn scenario_tiny_to_super_excludes_unverified() {
    let collection = load_collection(GEO_RECORDS).unwrap();
    let filter = FilterState::default().with_size_range(SizeRange::new(2, 6));

    let visible = compute_visible_set(&collection.records, &filter);
    assert_eq!(ids(&visible), vec!["2"]);
}

// ---------------------------------------------------------------------------
// Scenario 3: keyword match ignores case
// ---------------------------------------------------------------------------
#[test]
fn scenario_keyword_case_mismatch_matches() {
    let collection = load_collection(
        r#"[{"id": 3, "lat": -32.9, "lng": 151.7, "classification": "Tiny",
             "keywords": "Shaded, Fenced, BBQ"}]"#,
    )
    .unwrap();
    let filter = FilterState::default().select_keyword("fenced");

    assert_eq!(compute_visible_set(&collection.records, &filter).len(), 1);
}

// ---------------------------------------------------------------------------
// Scenario 4: null facet never matches an explicit selection
// ---------------------------------------------------------------------------
#[test]
fn scenario_null_suburb_excluded() {
    let collection = load_collection(
        r#"[{"id": 4, "lat": -32.9, "lng": 151.7, "classification": "Tiny", "suburb": null}]"#,
    )
    .unwrap();
    let filter = FilterState::default().select(Facet::Suburb, "Newcastle");

    assert!(compute_visible_set(&collection.records, &filter).is_empty());
}

// ---------------------------------------------------------------------------
// Scenario 5: Super dominates a mixed cluster
// ---------------------------------------------------------------------------
#[test]
fn scenario_super_dominates_cluster() {
    let collection = load_collection(
        r#"[
            {"id": 1, "lat": -32.9000, "lng": 151.7000, "classification": "Tiny"},
            {"id": 2, "lat": -32.9001, "lng": 151.7001, "classification": "Super"},
            {"id": 3, "lat": -32.9002, "lng": 151.7002, "classification": "Unverified"}
        ]"#,
    )
    .unwrap();

    assert_eq!(
        dominant_classification(&collection.records),
        Some(DominantClassification::Ranked(Classification::Super))
    );

    let view = render_view(
        &collection,
        &FilterState::unrestricted(),
        None,
        &ViewOptions {
            cluster_precision: Some(6),
        },
    )
    .unwrap();
    assert_eq!(view.clusters.len(), 1);
    assert_eq!(view.clusters[0].dominant.label(), "Super");
    assert_eq!(view.clusters[0].tier.diameter_px(), 35);
}

// ---------------------------------------------------------------------------
// Scenario 6: "Exists: Not Digitally Classifiable" sits in the Unverified bucket
// ---------------------------------------------------------------------------
#[test]
fn scenario_exists_not_classifiable_in_unverified_bucket() {
    let collection = load_collection(
        r#"[{"id": 6, "lat": -32.9, "lng": 151.7,
             "classification": "Exists: Not Digitally Classifiable"}]"#,
    )
    .unwrap();
    let filter = FilterState::default().with_size_range(SizeRange::new(0, 0));

    assert_eq!(compute_visible_set(&collection.records, &filter).len(), 1);
}

// ---------------------------------------------------------------------------
// P1: adding a constraint never grows the visible set
// ---------------------------------------------------------------------------
#[test]
fn adding_constraints_only_narrows() {
    let collection = flat();
    let base = FilterState::unrestricted();
    let base_len = compute_visible_set(&collection.records, &base).len();

    let narrowed = [
        base.clone().with_facility(FacilityFilter::Toilet),
        base.clone().with_facility(FacilityFilter::Trampoline),
        base.clone().select(Facet::Lga, "Newcastle"),
        base.clone().select(Facet::Type, "School Playground"),
        base.clone().select_keyword("Shade"),
        base.clone().with_size_min(3),
        base.clone().with_size_max(4),
    ];
    for filter in &narrowed {
        assert!(compute_visible_set(&collection.records, filter).len() <= base_len);
    }

    // More keywords broaden matching but never beyond no keywords at all
    let one = base.clone().select_keyword("Lake");
    let two = one.clone().select_keyword("Fenced");
    let len_one = compute_visible_set(&collection.records, &one).len();
    let len_two = compute_visible_set(&collection.records, &two).len();
    assert!(len_one <= len_two);
    assert!(len_two <= base_len);
}

// ---------------------------------------------------------------------------
// P2: recomputing with the same inputs gives the same output
// ---------------------------------------------------------------------------
#[test]
fn visible_set_is_idempotent() {
    let collection = flat();
    let filter = FilterState::default().select(Facet::Type, "Council Playground");

    let first = compute_visible_set(&collection.records, &filter);
    let second = compute_visible_set(&collection.records, &filter);
    assert_eq!(first, second);
    assert_eq!(ids(&first), vec!["1", "2"]);
}

// ---------------------------------------------------------------------------
// P3: null classification behaves like "Unverified"
// ---------------------------------------------------------------------------
#[test]
fn null_classification_matches_unverified_for_every_range() {
    for min in 0..=6 {
        for max in min..=6 {
            let range = SizeRange::new(min, max);
            assert_eq!(
                is_size_included(None, range),
                is_size_included(Some("Unverified"), range)
            );
        }
    }
}

// ---------------------------------------------------------------------------
// P4: every facet value occurs on some record
// ---------------------------------------------------------------------------
#[test]
fn facet_values_come_from_records() {
    let collection = flat();
    for facet in Facet::ALL {
        for value in collection.facets.values(facet) {
            assert!(!value.is_empty());
            assert!(collection
                .records
                .iter()
                .any(|r| facet.value(r) == Some(value.as_str())));
        }
    }

    assert_eq!(
        collection.facets.values(Facet::Shade),
        ["Natural and Sail", "Sail", "No Shade"]
    );
    assert_eq!(collection.facets.keywords(), ["BBQ", "Fenced", "Lake", "Shade"]);
}

// ---------------------------------------------------------------------------
// P5: viewport count never exceeds the visible count
// ---------------------------------------------------------------------------
#[test]
fn viewport_count_bounded_by_visible() {
    let collection = flat();
    let visible = compute_visible_set(&collection.records, &FilterState::unrestricted());

    let newcastle = Bounds::parse("-32.92,151.65,-32.89,151.72").unwrap();
    assert_eq!(count_in_viewport(&visible, &newcastle), 2);

    let covering = Bounds::covering(visible.iter().copied()).unwrap();
    assert_eq!(count_in_viewport(&visible, &covering), visible.len());
}

// ---------------------------------------------------------------------------
// P6: the resolver is total over non-empty groups
// ---------------------------------------------------------------------------
#[test]
fn resolver_defined_for_unknown_classifications() {
    let collection = load_collection(
        r#"[
            {"id": 1, "lat": -32.9, "lng": 151.7, "classification": "Gigantic"},
            {"id": 2, "lat": -32.9, "lng": 151.7, "classification": "Colossal"}
        ]"#,
    )
    .unwrap();

    assert_eq!(collection.report.warnings.len(), 2);
    assert_eq!(
        dominant_classification(&collection.records),
        Some(DominantClassification::Unranked("Gigantic".into()))
    );
}

// ---------------------------------------------------------------------------
// render_view: counts, viewport flags and stale selections
// ---------------------------------------------------------------------------
#[test]
fn render_view_reports_counts_and_stale_selections() {
    let collection = flat();
    let filter = load_preset("council")
        .unwrap()
        .filter
        .select(Facet::Suburb, "Lambton")
        .select(Facet::Suburb, "Atlantis");
    let viewport = Bounds::parse("-33,151.7,-32.9,151.8").unwrap();

    let view = render_view(&collection, &filter, Some(&viewport), &ViewOptions::default()).unwrap();

    assert_eq!(view.visible_total, 1);
    assert_eq!(view.in_viewport, 1);
    assert!(view.visible[0].in_viewport);
    assert_eq!(view.size_range, "Tiny - Super");
    assert!(view.clusters.is_empty());
    assert_eq!(view.stale_selections.len(), 1);
    assert_eq!(view.stale_selections[0].value, "Atlantis");
}

#[test]
fn render_view_rejects_bad_precision() {
    let collection = flat();
    let err = render_view(
        &collection,
        &FilterState::default(),
        None,
        &ViewOptions {
            cluster_precision: Some(0),
        },
    )
    .unwrap_err();
    assert!(matches!(err, PlaymapError::InvalidClusterPrecision(0)));
}

#[test]
fn empty_collection_renders_empty_view() {
    let collection = load_collection("[]").unwrap();
    let view = render_view(
        &collection,
        &FilterState::default(),
        None,
        &ViewOptions {
            cluster_precision: Some(5),
        },
    )
    .unwrap();
    assert_eq!(view.visible_total, 0);
    assert_eq!(view.in_viewport, 0);
    assert!(collection.facets.values(Facet::Type).is_empty());
}

// ---------------------------------------------------------------------------
// Presets from files
// ---------------------------------------------------------------------------
#[test]
fn preset_file_round_trip() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"name": "Toilets nearby", "version": "1.0",
            "filter": {{"facilities": ["toilet"], "size_range": {{"min": 0, "max": 6}}}}}}"#
    )
    .unwrap();

    let preset = load_preset_file(file.path()).unwrap();
    let binding = flat();
    let visible = compute_visible_set(&binding.records, &preset.filter);
    assert_eq!(visible.len(), 2);
}

#[test]
fn missing_preset_file_reports_path() {
    let err = load_preset_file(std::path::Path::new("/nonexistent/preset.json")).unwrap_err();
    assert!(matches!(err, PlaymapError::PresetLoad { .. }));
}

// ---------------------------------------------------------------------------
// Moderation against a loaded collection
// ---------------------------------------------------------------------------
#[test]
fn review_existing_and_unknown_records() {
    let collection = flat();
    let proposal: Proposal = serde_json::from_str(
        r#"{"target": {"existing": 2}, "submitted_by": "visitor",
            "fields": {"name": "Lambton Park", "type": "Council Playground", "shade": "Sail",
                       "fencing": "Fully Fenced", "keywords": "fenced, shade",
                       "toilet": "Yes", "trampolines": 2}}"#,
    )
    .unwrap();

    let entry = review(&collection, &proposal).unwrap();
    assert_eq!(entry.record_name, "Lambton Park");
    assert!(!entry.is_new());
    assert_eq!(entry.changes.len(), 1);
    assert_eq!(entry.changes[0].field, "Trampolines");
    assert_eq!(entry.changes[0].old_value, "1");
    assert_eq!(entry.changes[0].new_value, "2");

    let unknown = Proposal {
        target: ProposalTarget::Existing(RecordId::Int(99)),
        ..proposal
    };
    assert!(matches!(
        review(&collection, &unknown),
        Err(PlaymapError::UnknownRecord(_))
    ));
}
