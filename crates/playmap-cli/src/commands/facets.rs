use playmap_core::error::PlaymapError;
use playmap_core::model::Facet;
use serde_json::{Map, Value};
use std::path::PathBuf;

use crate::output;

pub fn run(input_file: PathBuf, output_format: &str) -> Result<(), PlaymapError> {
    let collection = playmap_core::load_collection_file(&input_file)?;
    let index = &collection.facets;

    match output_format {
        "json" => {
            let mut map = Map::new();
            for facet in Facet::ALL {
                map.insert(facet.key().to_string(), serde_json::to_value(index.values(facet))?);
            }
            map.insert("keywords".into(), serde_json::to_value(index.keywords())?);
            output::json::print(&Value::Object(map))?;
        }
        _ => output::table::print_facets(index),
    }

    Ok(())
}
