use playmap_core::error::PlaymapError;
use std::path::PathBuf;

use crate::output;

pub fn run(
    input_file: PathBuf,
    output_format: &str,
    output_file: Option<PathBuf>,
) -> Result<(), PlaymapError> {
    let collection = playmap_core::load_collection_file(&input_file)?;

    match output_file {
        Some(path) => {
            // Always write JSON when saving to file
            let json = serde_json::to_string_pretty(&collection.records)?;
            std::fs::write(&path, json)?;
            eprintln!(
                "Normalized {} of {} record(s), written to {}",
                collection.report.loaded,
                collection.report.total,
                path.display()
            );
            for dropped in &collection.report.dropped {
                eprintln!("  dropped {}: {}", dropped.record, dropped.reason);
            }
            for (kind, count) in collection.report.warning_counts() {
                eprintln!("  {count} warning(s): {}", kind.label());
            }
        }
        None => match output_format {
            "json" => output::json::print(&collection.records)?,
            _ => output::table::print_normalized(&collection),
        },
    }

    Ok(())
}
