use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PlaymapError {
    #[error("record '{record}' has no usable position (neither geometry nor lat/lng)")]
    MissingPosition { record: String },

    #[error("invalid record collection: {0}. Expected a JSON array or a GeoJSON FeatureCollection")]
    InvalidCollection(String),

    #[error("no record with id '{0}' in the collection")]
    UnknownRecord(String),

    #[error("invalid viewport bounds: {0}")]
    InvalidBounds(String),

    #[error("cluster precision {0} is out of range (expected 1..=12)")]
    InvalidClusterPrecision(usize),

    #[error("cannot encode a cell for position ({lat}, {lng}): {reason}")]
    CellEncoding { lat: f64, lng: f64, reason: String },

    #[error("failed to load preset from {path}: {reason}")]
    PresetLoad { path: PathBuf, reason: String },

    #[error("invalid preset: {0}")]
    PresetInvalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
