use crate::filter::FilterState;
use serde::{Deserialize, Serialize};

/// A named, saved filter state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetDef {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    /// Missing parts fall back to the filter defaults.
    #[serde(default)]
    pub filter: FilterState,
}
