pub mod geometry;
pub mod normalize;
pub mod values;

use crate::error::PlaymapError;
use crate::model::{Classification, Equipment, Facets, Facility, Media, Record, RecordId};
use crate::report::{DroppedRecord, LoadReport, LoadWarning, WarningKind};
use geometry::parse_geometry;
use normalize::resolve_field_key;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use values::{is_valid_position, parse_coordinate, parse_flag, parse_int_safe, parse_text};

/// A record as it arrives from one of the supported sources.
///
/// Any JSON object deserializes. It is a feature when tagged
/// `"type": "Feature"` or when `geometry` sits next to `properties`.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub enum RawRecord {
    /// GeoJSON feature: capitalized property names, yes/no strings,
    /// position in `geometry.coordinates` as `[lng, lat]`.
    Feature(RawFeature),
    /// Flat row: `lat`/`lng` fields (optionally a `geom`), real booleans.
    Flat(Map<String, Value>),
}

#[derive(Debug, Clone)]
pub struct RawFeature {
    pub id: Option<Value>,
    pub geometry: Option<Value>,
    /// Missing or `null` properties read as an empty map.
    pub properties: Map<String, Value>,
}

impl From<Map<String, Value>> for RawRecord {
    fn from(mut map: Map<String, Value>) -> Self {
        if !is_feature(&map) {
            return RawRecord::Flat(map);
        }
        let properties = match map.remove("properties") {
            Some(Value::Object(properties)) => properties,
            _ => Map::new(),
        };
        RawRecord::Feature(RawFeature {
            id: map.remove("id").filter(|v| !v.is_null()),
            geometry: map.remove("geometry"),
            properties,
        })
    }
}

fn is_feature(map: &Map<String, Value>) -> bool {
    let tagged = map
        .get("type")
        .and_then(Value::as_str)
        .is_some_and(|t| t.trim().eq_ignore_ascii_case("feature"));
    let shaped = map.contains_key("geometry")
        && matches!(map.get("properties"), Some(Value::Object(_) | Value::Null));
    tagged || shaped
}

/// A canonical record plus the data-quality notes raised while building it.
#[derive(Debug, Clone)]
pub struct NormalizedRecord {
    pub record: Record,
    pub warnings: Vec<LoadWarning>,
}

/// Parse a record collection (JSON array or GeoJSON FeatureCollection).
///
/// Per-record failures never abort the load: records without a usable
/// position, non-object entries and duplicate ids are dropped and reported.
pub fn parse_collection(json: &str) -> Result<(Vec<Record>, LoadReport), PlaymapError> {
    let root: Value = serde_json::from_str(json)?;
    let items = collection_items(root)?;

    let mut report = LoadReport {
        total: items.len(),
        ..LoadReport::default()
    };
    let mut records = Vec::with_capacity(items.len());
    let mut seen_ids: HashSet<RecordId> = HashSet::new();

    for (index, item) in items.into_iter().enumerate() {
        let raw = match RawRecord::deserialize(item) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("Dropping source record #{index}: not a record object ({e})");
                report.dropped.push(DroppedRecord {
                    index,
                    record: format!("#{index}"),
                    reason: "not a record object".into(),
                });
                continue;
            }
        };

        match normalize_record(&raw, index) {
            Ok(normalized) => {
                let record = normalized.record;
                if !seen_ids.insert(record.id.clone()) {
                    log::warn!("Dropping record '{}': duplicate id", record.id);
                    report.dropped.push(DroppedRecord {
                        index,
                        record: record.id.to_string(),
                        reason: format!("duplicate id '{}'", record.id),
                    });
                    continue;
                }
                report.warnings.extend(normalized.warnings);
                records.push(record);
            }
            Err(e) => {
                let reference = match &e {
                    PlaymapError::MissingPosition { record } => record.clone(),
                    _ => format!("#{index}"),
                };
                log::warn!("Dropping record '{reference}': {e}");
                report.dropped.push(DroppedRecord {
                    index,
                    record: reference,
                    reason: e.to_string(),
                });
            }
        }
    }

    report.loaded = records.len();
    log::info!(
        "Loaded {} of {} records ({} dropped, {} warnings)",
        report.loaded,
        report.total,
        report.dropped.len(),
        report.warnings.len()
    );

    Ok((records, report))
}

fn collection_items(root: Value) -> Result<Vec<Value>, PlaymapError> {
    match root {
        Value::Array(items) => Ok(items),
        Value::Object(mut obj) => match obj.remove("features") {
            Some(Value::Array(items)) => Ok(items),
            Some(_) => Err(PlaymapError::InvalidCollection(
                "'features' is not an array".into(),
            )),
            None => Err(PlaymapError::InvalidCollection(
                "object has no 'features' array".into(),
            )),
        },
        _ => Err(PlaymapError::InvalidCollection(
            "top-level value is neither an array nor an object".into(),
        )),
    }
}

/// Normalize one raw record into the canonical shape.
///
/// `index` is the record's position in its source, used for a fallback id.
pub fn normalize_record(raw: &RawRecord, index: usize) -> Result<NormalizedRecord, PlaymapError> {
    let fields = collect_fields(raw);
    let field = |key: &str| fields.get(key).copied();

    let mut warnings = Vec::new();

    let name = parse_text(field("name"));
    let parsed_id = parse_id(field("id"));
    let reference = match (&parsed_id, &name) {
        (Some(id), _) => id.to_string(),
        (None, Some(name)) => name.clone(),
        (None, None) => format!("#{index}"),
    };

    let (lat, lng) = resolve_position(&fields, &reference, &mut warnings)?;

    let id = match parsed_id {
        Some(id) => id,
        None => {
            let assigned = RecordId::Text(format!("record-{index}"));
            warnings.push(LoadWarning {
                record: reference.clone(),
                kind: WarningKind::MissingId,
                message: format!("no identifier in source, assigned '{assigned}'"),
            });
            assigned
        }
    };

    let raw_classification = parse_text(field("classification"));
    let classification = match raw_classification.as_deref() {
        None => Classification::Unverified,
        Some(s) => match Classification::from_raw(s) {
            Some(c) => c,
            None => {
                log::warn!("Record '{reference}': unknown classification '{s}', using Unverified");
                warnings.push(LoadWarning {
                    record: reference.clone(),
                    kind: WarningKind::UnknownClassification,
                    message: format!("unknown classification '{s}' remapped to Unverified"),
                });
                Classification::Unverified
            }
        },
    };

    let facets = Facets {
        playground_type: parse_text(field("type")),
        suburb: parse_text(field("suburb")),
        lga: parse_text(field("lga")),
        shade: parse_text(field("shade")),
        fencing: parse_text(field("fencing")),
        parking: parse_text(field("parking")),
        seating: parse_text(field("seating")),
        floor: parse_text(field("floor")),
        flying_fox: parse_text(field("flying_fox")),
    };

    let facilities: BTreeSet<Facility> = Facility::ALL
        .into_iter()
        .filter(|f| parse_flag(field(f.key())))
        .collect();

    let equipment: BTreeMap<Equipment, u32> = Equipment::ALL
        .into_iter()
        .map(|e| (e, parse_int_safe(field(e.key()))))
        .filter(|(_, count)| *count > 0)
        .collect();

    let keywords = parse_text(field("keywords"));
    let tags = keywords.as_deref().map(split_tags).unwrap_or_default();

    let media = Media {
        photo: parse_text(field("photo")),
        link: parse_text(field("link")),
        comments: parse_text(field("comments")),
        last_visit_date: parse_text(field("last_visit_date")),
        verified: parse_text(field("verified")),
    };

    Ok(NormalizedRecord {
        record: Record {
            id,
            name,
            lat,
            lng,
            classification,
            raw_classification,
            facets,
            facilities,
            equipment,
            keywords,
            tags,
            media,
        },
        warnings,
    })
}

/// Flatten either raw shape into one map keyed by canonical field names.
///
/// When several source names share a canonical key, a non-null value beats
/// a null one, then the lower precedence rank wins.
fn collect_fields(raw: &RawRecord) -> HashMap<String, &Value> {
    let mut ranked: HashMap<String, (usize, &Value)> = HashMap::new();

    match raw {
        RawRecord::Feature(feature) => {
            for (key, value) in &feature.properties {
                let (canonical, rank) = resolve_field_key(key);
                offer(&mut ranked, canonical, rank, value);
            }
            if let Some(id) = &feature.id {
                offer(&mut ranked, "id".to_string(), usize::MAX, id);
            }
            if let Some(geometry) = &feature.geometry {
                ranked.insert("geometry".to_string(), (0, geometry));
            }
        }
        RawRecord::Flat(map) => {
            for (key, value) in map {
                let (canonical, rank) = resolve_field_key(key);
                offer(&mut ranked, canonical, rank, value);
            }
        }
    }

    ranked
        .into_iter()
        .map(|(key, (_, value))| (key, value))
        .collect()
}

fn offer<'a>(
    fields: &mut HashMap<String, (usize, &'a Value)>,
    key: String,
    rank: usize,
    value: &'a Value,
) {
    let replace = match fields.get(&key) {
        None => true,
        Some(&(held_rank, held)) => match (held.is_null(), value.is_null()) {
            (true, false) => true,
            (false, true) => false,
            _ => rank < held_rank,
        },
    };
    if replace {
        fields.insert(key, (rank, value));
    }
}

fn parse_id(value: Option<&Value>) -> Option<RecordId> {
    match value {
        Some(Value::Number(n)) => match n.as_i64() {
            Some(v) => Some(RecordId::Int(v)),
            None => Some(RecordId::Text(n.to_string())),
        },
        Some(Value::String(s)) if !s.trim().is_empty() => Some(RecordId::Text(s.trim().to_string())),
        _ => None,
    }
}

/// Geometry first, flat fields second. Malformed geometry is reported and
/// skipped rather than failing the record.
fn resolve_position(
    fields: &HashMap<String, &Value>,
    reference: &str,
    warnings: &mut Vec<LoadWarning>,
) -> Result<(f64, f64), PlaymapError> {
    if let Some(geometry) = fields.get("geometry").filter(|v| !v.is_null()) {
        match parse_geometry(geometry) {
            Ok(position) => return Ok(position),
            Err(reason) => {
                log::warn!("Record '{reference}': {reason}, falling back to lat/lng");
                warnings.push(LoadWarning {
                    record: reference.to_string(),
                    kind: WarningKind::MalformedGeometry,
                    message: reason,
                });
            }
        }
    }

    let lat = parse_coordinate(fields.get("lat").copied());
    let lng = parse_coordinate(fields.get("lng").copied());

    match (lat, lng) {
        (Some(lat), Some(lng)) if is_valid_position(lat, lng) => Ok((lat, lng)),
        _ => Err(PlaymapError::MissingPosition {
            record: reference.to_string(),
        }),
    }
}

/// Split a comma-separated keyword string into a tag set.
///
/// Tags are trimmed, empties dropped, and case-insensitive duplicates
/// collapsed onto their first spelling.
pub fn split_tags(keywords: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    keywords
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.to_lowercase()))
        .map(str::to_string)
        .collect()
}
