use playmap_core::error::PlaymapError;
use playmap_core::search::{suggest_names, suggest_tags};
use std::path::PathBuf;

pub fn run(input_file: PathBuf, query: &str, tags: bool, limit: usize) -> Result<(), PlaymapError> {
    let collection = playmap_core::load_collection_file(&input_file)?;

    if tags {
        let hits = suggest_tags(collection.facets.keywords(), query, &[]);
        if hits.is_empty() {
            println!("No tags match '{}'.", query.trim());
        }
        for tag in hits {
            println!("{tag}");
        }
        return Ok(());
    }

    let hits = suggest_names(&collection.records, query, limit);
    if hits.is_empty() {
        println!("No playgrounds match '{}'.", query.trim());
    }
    for record in hits {
        println!(
            "{:<8} {:<40} {:.5}, {:.5}",
            record.id.to_string(),
            record.display_name(),
            record.lat,
            record.lng
        );
    }

    Ok(())
}
