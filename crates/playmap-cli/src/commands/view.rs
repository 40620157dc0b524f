use playmap_core::error::PlaymapError;
use playmap_core::filter::{rejections, Clause, FacilityFilter, FilterState};
use playmap_core::hierarchy::SizeRange;
use playmap_core::model::Facet;
use playmap_core::presets::{builtin, load_preset_file};
use playmap_core::view::{Bounds, ViewOptions};
use playmap_core::{render_view, Collection};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::output;

pub struct ViewArgs {
    pub input_file: PathBuf,
    pub preset: Option<String>,
    pub filter_file: Option<PathBuf>,
    pub bounds: Option<Bounds>,
    pub keywords: Vec<String>,
    pub selections: Vec<(Facet, String)>,
    pub facilities: Vec<FacilityFilter>,
    pub size: Option<SizeRange>,
    pub cluster_precision: Option<usize>,
    pub output_format: String,
    pub verbose: bool,
}

/// Starting filter: a preset file, a named preset, or the default state.
fn base_filter(args: &ViewArgs) -> Result<FilterState, PlaymapError> {
    if let Some(ref path) = args.filter_file {
        let preset = load_preset_file(path)?;
        log::info!("Using preset '{}' from {}", preset.name, path.display());
        return Ok(preset.filter);
    }
    match args.preset.as_deref() {
        Some(name) => {
            let preset = builtin::load_preset(name)?;
            log::info!("Using built-in preset '{}'", preset.name);
            Ok(preset.filter)
        }
        None => Ok(FilterState::default()),
    }
}

fn build_filter(args: &ViewArgs) -> Result<FilterState, PlaymapError> {
    let mut filter = base_filter(args)?;

    for (facet, value) in &args.selections {
        filter = filter.select(*facet, value.as_str());
    }
    for keyword in &args.keywords {
        filter = filter.select_keyword(keyword);
    }
    for facility in &args.facilities {
        filter = filter.with_facility(*facility);
    }
    if let Some(range) = args.size {
        filter = filter.with_size_range(range);
    }

    Ok(filter)
}

/// How many hidden records each clause rejected.
fn rejection_counts(collection: &Collection, filter: &FilterState) -> BTreeMap<Clause, usize> {
    let mut counts = BTreeMap::new();
    for record in &collection.records {
        for clause in rejections(record, filter) {
            *counts.entry(clause).or_insert(0) += 1;
        }
    }
    counts
}

pub fn run(args: ViewArgs) -> Result<(), PlaymapError> {
    let collection = playmap_core::load_collection_file(&args.input_file)?;
    let filter = build_filter(&args)?;
    let options = ViewOptions {
        cluster_precision: args.cluster_precision,
    };

    let view = render_view(&collection, &filter, args.bounds.as_ref(), &options)?;

    match args.output_format.as_str() {
        "json" => output::json::print(&view)?,
        _ => {
            let rejected = if args.verbose {
                rejection_counts(&collection, &filter)
            } else {
                BTreeMap::new()
            };
            output::table::print_view(&collection, &filter, &view, &rejected, args.verbose);
        }
    }

    Ok(())
}
