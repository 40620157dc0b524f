mod commands;
mod output;

use clap::{Parser, Subcommand};
use playmap_core::filter::FacilityFilter;
use playmap_core::hierarchy::{bucket_by_label, SizeRange};
use playmap_core::model::Facet;
use playmap_core::view::Bounds;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "playmap",
    version,
    about = "Filter, count and cluster playground map records"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a record collection (JSON array or GeoJSON) and report dropped records
    Normalize {
        /// Path to the record collection
        input_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write normalized records to a JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// List the filter choices derived from a collection
    Facets {
        /// Path to the record collection
        input_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Apply a filter and show the visible set, viewport count and clusters
    View {
        /// Path to the record collection
        input_file: PathBuf,

        /// Start from a predefined preset: default, all, council
        #[arg(short, long, value_name = "NAME", conflicts_with = "filter")]
        preset: Option<String>,

        /// Start from a preset JSON file
        #[arg(short, long, value_name = "FILE")]
        filter: Option<PathBuf>,

        /// Viewport as south,west,north,east
        #[arg(short, long, value_parser = parse_bounds, allow_hyphen_values = true)]
        bounds: Option<Bounds>,

        /// Require a tag (repeatable; any selected tag matches)
        #[arg(short, long = "keyword", value_name = "TAG")]
        keywords: Vec<String>,

        /// Select a facet value, e.g. suburb=Wallsend (repeatable)
        #[arg(short, long = "select", value_name = "FACET=VALUE", value_parser = parse_selection)]
        selections: Vec<(Facet, String)>,

        /// Require a facility, e.g. toilet, skate_park, large_flying_fox (repeatable)
        #[arg(long = "facility", value_name = "NAME", value_parser = parse_facility)]
        facilities: Vec<FacilityFilter>,

        /// Size range as MIN..MAX, bucket names or indices (e.g. Tiny..Super)
        #[arg(long, value_parser = parse_size_range)]
        size: Option<SizeRange>,

        /// Group visible records into geohash cells of this length (1-12)
        #[arg(short, long, value_name = "N")]
        cluster_precision: Option<usize>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// List every visible record and why hidden records were filtered out
        #[arg(long)]
        verbose: bool,
    },
    /// Search record names, or the tag vocabulary with --tags
    Search {
        /// Path to the record collection
        input_file: PathBuf,

        /// Text to look for (case-insensitive substring)
        query: String,

        /// Search the tag vocabulary instead of names
        #[arg(long)]
        tags: bool,

        /// Maximum number of name suggestions
        #[arg(short, long, default_value_t = playmap_core::search::NAME_SUGGESTION_LIMIT)]
        limit: usize,
    },
    /// Compare a submitted edit or new-record proposal against the collection
    Diff {
        /// Path to the record collection
        input_file: PathBuf,

        /// Path to the proposal JSON
        proposal_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Manage and inspect filter presets
    Presets {
        #[command(subcommand)]
        action: PresetsAction,
    },
}

#[derive(Subcommand)]
enum PresetsAction {
    /// List predefined presets
    List,
    /// Explain a preset in plain language
    Explain {
        /// Preset name (e.g., "council")
        preset: String,
    },
    /// Print the preset JSON schema with field descriptions and example
    Schema,
    /// Validate a custom preset file
    Validate {
        /// Path to JSON preset file
        file: PathBuf,
    },
}

fn parse_bounds(s: &str) -> Result<Bounds, String> {
    Bounds::parse(s).map_err(|e| e.to_string())
}

fn parse_selection(s: &str) -> Result<(Facet, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FACET=VALUE, got '{s}'"))?;
    let facet = Facet::from_key(key).ok_or_else(|| {
        let known: Vec<&str> = Facet::ALL.iter().map(|f| f.key()).collect();
        format!("unknown facet '{key}'. Known: {}", known.join(", "))
    })?;
    let value = value.trim();
    if value.is_empty() {
        return Err(format!("empty value for facet '{key}'"));
    }
    Ok((facet, value.to_string()))
}

fn parse_facility(s: &str) -> Result<FacilityFilter, String> {
    FacilityFilter::from_key(s).ok_or_else(|| {
        let known: Vec<&str> = FacilityFilter::ALL.iter().map(|f| f.key()).collect();
        format!("unknown facility '{s}'. Known: {}", known.join(", "))
    })
}

fn parse_size_range(s: &str) -> Result<SizeRange, String> {
    let (min, max) = s
        .split_once("..")
        .ok_or_else(|| format!("expected MIN..MAX, got '{s}'"))?;
    let bucket = |label: &str| {
        bucket_by_label(label).ok_or_else(|| format!("unknown size bucket '{}'", label.trim()))
    };
    Ok(SizeRange::new(bucket(min)?, bucket(max)?))
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Normalize {
            input_file,
            output,
            out,
        } => commands::normalize::run(input_file, &output, out),
        Commands::Facets { input_file, output } => commands::facets::run(input_file, &output),
        Commands::View {
            input_file,
            preset,
            filter,
            bounds,
            keywords,
            selections,
            facilities,
            size,
            cluster_precision,
            output,
            verbose,
        } => commands::view::run(commands::view::ViewArgs {
            input_file,
            preset,
            filter_file: filter,
            bounds,
            keywords,
            selections,
            facilities,
            size,
            cluster_precision,
            output_format: output,
            verbose,
        }),
        Commands::Search {
            input_file,
            query,
            tags,
            limit,
        } => commands::search::run(input_file, &query, tags, limit),
        Commands::Diff {
            input_file,
            proposal_file,
            output,
        } => commands::diff::run(input_file, proposal_file, &output),
        Commands::Presets { action } => match action {
            PresetsAction::List => commands::presets::list(),
            PresetsAction::Explain { preset } => commands::presets::explain(&preset),
            PresetsAction::Schema => commands::presets::schema(),
            PresetsAction::Validate { file } => commands::presets::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selection() {
        assert_eq!(
            parse_selection("Suburb= Wallsend ").unwrap(),
            (Facet::Suburb, "Wallsend".to_string())
        );
        assert!(parse_selection("colour=red").is_err());
        assert!(parse_selection("suburb").is_err());
        assert!(parse_selection("suburb=").is_err());
    }

    #[test]
    fn test_parse_size_range() {
        assert_eq!(parse_size_range("Tiny..Super").unwrap(), SizeRange::new(2, 6));
        assert_eq!(parse_size_range("0..rebuild").unwrap(), SizeRange::new(0, 1));
        assert!(parse_size_range("Tiny-Super").is_err());
        assert!(parse_size_range("Tiny..Huge").is_err());
    }

    #[test]
    fn test_cli_parses_view() {
        let cli = Cli::try_parse_from([
            "playmap",
            "view",
            "records.json",
            "--bounds",
            "-33,151,-32,152",
            "--select",
            "type=Council Playground",
            "--facility",
            "toilet",
            "-k",
            "Lake",
        ])
        .unwrap();
        match cli.command {
            Commands::View {
                bounds,
                selections,
                facilities,
                keywords,
                ..
            } => {
                assert!(bounds.is_some());
                assert_eq!(selections.len(), 1);
                assert_eq!(facilities, vec![FacilityFilter::Toilet]);
                assert_eq!(keywords, vec!["Lake"]);
            }
            _ => panic!("expected view command"),
        }
    }
}
