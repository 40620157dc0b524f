use crate::error::PlaymapError;
use crate::presets::schema::PresetDef;

const DEFAULT_JSON: &str = include_str!("../../../../presets/default.json");
const ALL_JSON: &str = include_str!("../../../../presets/all.json");
const COUNCIL_JSON: &str = include_str!("../../../../presets/council.json");

/// Built-in presets, by lookup name.
pub const PRESETS: &[&str] = &["default", "all", "council"];

/// Load a built-in preset by name.
pub fn load_preset(name: &str) -> Result<PresetDef, PlaymapError> {
    let json = match name {
        "default" => DEFAULT_JSON,
        "all" => ALL_JSON,
        "council" => COUNCIL_JSON,
        _ => {
            return Err(PlaymapError::PresetInvalid(format!(
                "unknown preset '{}'. Available: {}",
                name,
                PRESETS.join(", ")
            )))
        }
    };
    super::parse_preset_str(json)
}
