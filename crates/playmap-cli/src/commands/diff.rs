use playmap_core::error::PlaymapError;
use playmap_core::moderation::{review, Proposal};
use std::path::PathBuf;

use crate::output;

pub fn run(
    input_file: PathBuf,
    proposal_file: PathBuf,
    output_format: &str,
) -> Result<(), PlaymapError> {
    let collection = playmap_core::load_collection_file(&input_file)?;
    let proposal_bytes = std::fs::read(&proposal_file)?;
    let proposal: Proposal = serde_json::from_slice(&proposal_bytes)?;

    let entry = review(&collection, &proposal)?;

    match output_format {
        "json" => output::json::print(&entry)?,
        _ => output::table::print_review(&entry),
    }

    Ok(())
}
