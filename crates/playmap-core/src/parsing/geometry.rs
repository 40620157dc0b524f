use super::values::{is_valid_position, parse_coordinate};
use serde_json::Value;

/// Extract `(lat, lng)` from a geometry value.
///
/// Accepts a geometry object or a JSON-encoded geometry string, both carrying
/// `coordinates: [lng, lat]` in GeoJSON order. Returns a short reason on failure
/// so the caller can report it and fall back to flat fields.
pub fn parse_geometry(value: &Value) -> Result<(f64, f64), String> {
    match value {
        Value::String(s) => {
            let parsed: Value = serde_json::from_str(s)
                .map_err(|e| format!("geometry string is not valid JSON: {e}"))?;
            parse_geometry_object(&parsed)
        }
        Value::Object(_) => parse_geometry_object(value),
        other => Err(format!("unexpected geometry value {other}")),
    }
}

fn parse_geometry_object(value: &Value) -> Result<(f64, f64), String> {
    let coordinates = value
        .get("coordinates")
        .and_then(Value::as_array)
        .ok_or_else(|| "geometry has no coordinates array".to_string())?;

    if coordinates.len() < 2 {
        return Err(format!(
            "geometry has {} coordinate(s), expected [lng, lat]",
            coordinates.len()
        ));
    }

    let lng = parse_coordinate(coordinates.first());
    let lat = parse_coordinate(coordinates.get(1));

    match (lat, lng) {
        (Some(lat), Some(lng)) if is_valid_position(lat, lng) => Ok((lat, lng)),
        (Some(lat), Some(lng)) => Err(format!("geometry position ({lat}, {lng}) is off the globe")),
        _ => Err("geometry coordinates are not numeric".to_string()),
    }
}
