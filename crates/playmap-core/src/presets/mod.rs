pub mod builtin;
pub mod schema;

use crate::error::PlaymapError;
use schema::PresetDef;
use std::path::Path;

/// Load a preset from a JSON file.
pub fn load_preset_file(path: &Path) -> Result<PresetDef, PlaymapError> {
    let content = std::fs::read_to_string(path).map_err(|e| PlaymapError::PresetLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_preset(&content, path)
}

/// Parse a preset, attributing parse errors to `source`.
pub fn parse_preset(json: &str, source: &Path) -> Result<PresetDef, PlaymapError> {
    let preset: PresetDef = serde_json::from_str(json).map_err(|e| PlaymapError::PresetLoad {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;
    validate_preset(&preset)?;
    Ok(preset)
}

/// Parse a preset from a JSON string (no file path context).
pub fn parse_preset_str(json: &str) -> Result<PresetDef, PlaymapError> {
    let preset: PresetDef = serde_json::from_str(json)?;
    validate_preset(&preset)?;
    Ok(preset)
}

/// Check that a preset is well-formed.
pub fn validate_preset(preset: &PresetDef) -> Result<(), PlaymapError> {
    if preset.name.trim().is_empty() {
        return Err(PlaymapError::PresetInvalid("name must not be empty".into()));
    }

    if preset.version.trim().is_empty() {
        return Err(PlaymapError::PresetInvalid(format!(
            "preset '{}' has an empty version",
            preset.name
        )));
    }

    for (facet, selected) in &preset.filter.facets {
        if selected.is_empty() {
            return Err(PlaymapError::PresetInvalid(format!(
                "preset '{}' lists facet '{}' with no values",
                preset.name, facet
            )));
        }
        if selected.iter().any(|v| v.trim().is_empty()) {
            return Err(PlaymapError::PresetInvalid(format!(
                "preset '{}' selects an empty value for facet '{}'",
                preset.name, facet
            )));
        }
    }

    if preset.filter.keywords.iter().any(|k| k.trim().is_empty()) {
        return Err(PlaymapError::PresetInvalid(format!(
            "preset '{}' selects an empty keyword",
            preset.name
        )));
    }

    Ok(())
}
