use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Classification outside the known set, remapped to "Unverified".
    UnknownClassification,
    /// Geometry present but unusable; flat lat/lng were tried instead.
    MalformedGeometry,
    /// No identifier in the source; a positional one was assigned.
    MissingId,
}

impl WarningKind {
    pub const ALL: [WarningKind; 3] = [
        WarningKind::UnknownClassification,
        WarningKind::MalformedGeometry,
        WarningKind::MissingId,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            WarningKind::UnknownClassification => "unknown classification",
            WarningKind::MalformedGeometry => "malformed geometry",
            WarningKind::MissingId => "missing id",
        }
    }
}

/// A data-quality note about a record that was kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadWarning {
    /// Record reference (id or name) for display.
    pub record: String,
    pub kind: WarningKind,
    pub message: String,
}

/// A source record that could not be rendered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DroppedRecord {
    /// Position in the source array.
    pub index: usize,
    pub record: String,
    pub reason: String,
}

/// Outcome of loading a record collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadReport {
    /// Number of raw records in the source.
    pub total: usize,
    /// Number of canonical records produced.
    pub loaded: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dropped: Vec<DroppedRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<LoadWarning>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty() && self.warnings.is_empty()
    }

    pub fn warnings_of(&self, kind: WarningKind) -> impl Iterator<Item = &LoadWarning> {
        self.warnings.iter().filter(move |w| w.kind == kind)
    }

    /// Warning counts per kind, skipping kinds with none.
    pub fn warning_counts(&self) -> Vec<(WarningKind, usize)> {
        WarningKind::ALL
            .into_iter()
            .map(|kind| (kind, self.warnings_of(kind).count()))
            .filter(|(_, count)| *count > 0)
            .collect()
    }
}
