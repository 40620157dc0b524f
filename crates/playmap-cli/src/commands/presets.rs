use playmap_core::error::PlaymapError;
use playmap_core::filter::FilterState;
use playmap_core::hierarchy::classifications_in_range;
use playmap_core::presets::builtin;
use std::path::Path;

pub fn list() -> Result<(), PlaymapError> {
    println!("Available predefined presets:\n");
    for name in builtin::PRESETS {
        let preset = builtin::load_preset(name)?;
        println!("  {:<8} {} (v{})", name, preset.name, preset.version);
        if let Some(ref desc) = preset.description {
            println!("           {}", desc);
        }
        println!();
    }
    Ok(())
}

/// Plain-language lines describing a filter state.
fn describe(filter: &FilterState) -> Vec<String> {
    let mut lines = Vec::new();

    let members: Vec<&str> = classifications_in_range(filter.size_range)
        .iter()
        .map(|c| c.as_str())
        .collect();
    lines.push(format!(
        "Size: {} ({})",
        filter.size_range,
        members.join(", ")
    ));

    if filter.facilities.is_empty() {
        lines.push("Facilities: no requirement".into());
    } else {
        let names: Vec<&str> = filter.facilities.iter().map(|f| f.label()).collect();
        lines.push(format!("Facilities: must have all of {}", names.join(", ")));
    }

    for (facet, selected) in &filter.facets {
        lines.push(format!("{}: any of {}", facet.label(), selected.join(", ")));
    }

    if filter.keywords.is_empty() {
        lines.push("Keywords: no requirement".into());
    } else {
        lines.push(format!("Keywords: tagged with any of {}", filter.keywords.join(", ")));
    }

    lines
}

pub fn explain(preset: &str) -> Result<(), PlaymapError> {
    let p = builtin::load_preset(preset)?;

    println!("{} (version {})\n", p.name, p.version);

    if let Some(ref desc) = p.description {
        println!("{}\n", desc);
    }

    println!("A record is shown when every line below holds:\n");
    for line in describe(&p.filter) {
        println!("  {line}");
    }
    println!();
    println!("Facets not listed are unconstrained. Records with no value for a");
    println!("listed facet are hidden.\n");

    Ok(())
}

pub fn schema() -> Result<(), PlaymapError> {
    print!(
        r#"JSON Preset Schema
==================

A preset file stores a filter state. When you run `playmap view --filter`,
the preset is the starting point and any command-line flags are added on top.

Top-level fields:
  name          (string, required)  Human-readable name of the preset
  description   (string, optional)  What this preset is for
  version       (string, required)  Version identifier (e.g., "1.0")
  filter        (object, optional)  The filter state (see below).
                                    Omitted parts take their defaults.

Fields of "filter":
  facilities    (array, optional)   Facility toggles that must all hold:
                                    trampoline, skate_park, large_flying_fox,
                                    sandpit, scooter_track, water_play,
                                    accessible, toilet, bbq, bubbler
  facets        (object, optional)  Map of facet -> selected values.
                                    Facets: type, suburb, lga, shade, fencing,
                                    parking, seating, floor. A record matches
                                    when its value equals any selected value.
                                    Lists must not be empty.
  keywords      (array, optional)   Tags; a record matches when it carries
                                    any of them (case-insensitive).
  size_range    (object, optional)  {{"min": N, "max": N}} over slider buckets:
                                    0 Unverified, 1 Rebuild, 2 Tiny, 3 Small,
                                    4 Medium, 5 Large, 6 Super.
                                    Default: 2..6. Crossed values are clamped.

Example:
{{
  "name": "Hot day",
  "description": "Shaded water play with a toilet nearby",
  "version": "1.0",
  "filter": {{
    "facilities": ["water_play", "toilet"],
    "facets": {{
      "shade": ["Natural and Sail", "Sail"]
    }},
    "keywords": ["Shade"],
    "size_range": {{ "min": 3, "max": 6 }}
  }}
}}
"#
    );
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), PlaymapError> {
    let preset = playmap_core::presets::load_preset_file(file)?;

    println!("Preset '{}' (v{}) is valid.", preset.name, preset.version);
    for line in describe(&preset.filter) {
        println!("  {line}");
    }

    // Potential issues (warnings, not errors)
    let mut warnings = Vec::new();
    for (facet, selected) in &preset.filter.facets {
        let mut seen = std::collections::HashSet::new();
        for value in selected {
            if !seen.insert(value) {
                warnings.push(format!("facet '{}' selects '{}' more than once", facet, value));
            }
        }
    }

    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {}", w);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use playmap_core::model::Facet;

    #[test]
    fn test_describe_council() {
        let filter = builtin::load_preset("council").unwrap().filter;
        let lines = describe(&filter);
        assert!(lines[0].starts_with("Size: Tiny - Super"));
        assert!(lines.contains(&"Type: any of Council Playground".to_string()));
    }

    #[test]
    fn test_describe_keywords() {
        let filter = FilterState::default()
            .select_keyword("Lake")
            .select(Facet::Shade, "Sail");
        let lines = describe(&filter);
        assert!(lines.iter().any(|l| l == "Keywords: tagged with any of Lake"));
    }
}
