//! Field-by-field review of user-submitted edits and new-record proposals.

use crate::error::PlaymapError;
use crate::model::{Equipment, Facet, Facility, Record, RecordId};
use crate::parsing::normalize::normalize_field_key;
use crate::parsing::values::{is_valid_position, parse_flag, parse_int_safe, parse_text};
use crate::Collection;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Shown in place of a missing value.
pub const EMPTY_DISPLAY: &str = "empty";

/// What a proposal is about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalTarget {
    /// An edit to a record already in the collection.
    Existing(RecordId),
    /// A record that does not exist yet, dropped at a map position.
    New { lat: f64, lng: f64 },
}

/// A submitted edit. `fields` uses source field names; they are normalized
/// the same way record fields are.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    pub target: ProposalTarget,
    #[serde(default)]
    pub fields: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_by: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Flag,
    Count,
}

/// Where a reviewed field lives on a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    Name,
    Facet(Facet),
    Keywords,
    Comments,
    Photo,
    Link,
    Verified,
    Facility(Facility),
    Equipment(Equipment),
}

impl FieldSource {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldSource::Facility(_) => FieldKind::Flag,
            FieldSource::Equipment(_) => FieldKind::Count,
            _ => FieldKind::Text,
        }
    }

    /// Canonical field key, as produced by `normalize_field_key`.
    pub fn key(&self) -> &'static str {
        match self {
            FieldSource::Name => "name",
            FieldSource::Facet(f) => f.key(),
            FieldSource::Keywords => "keywords",
            FieldSource::Comments => "comments",
            FieldSource::Photo => "photo",
            FieldSource::Link => "link",
            FieldSource::Verified => "verified",
            FieldSource::Facility(f) => f.key(),
            FieldSource::Equipment(e) => e.key(),
        }
    }

    /// Label shown to moderators.
    pub fn label(&self) -> &'static str {
        match self {
            FieldSource::Name => "Name",
            FieldSource::Facet(f) => f.label(),
            FieldSource::Keywords => "Keywords",
            FieldSource::Comments => "Comments",
            FieldSource::Photo => "Photo",
            FieldSource::Link => "Link",
            FieldSource::Verified => "Verified",
            FieldSource::Facility(f) => f.label(),
            FieldSource::Equipment(e) => e.label(),
        }
    }
}

/// Reviewed fields in display order.
pub fn review_fields() -> Vec<FieldSource> {
    let mut fields = vec![
        FieldSource::Name,
        FieldSource::Facet(Facet::Type),
        FieldSource::Keywords,
        FieldSource::Comments,
        FieldSource::Facet(Facet::Shade),
        FieldSource::Facet(Facet::Parking),
        FieldSource::Facet(Facet::Fencing),
        FieldSource::Facet(Facet::Seating),
        FieldSource::Facet(Facet::Floor),
    ];
    fields.extend(Facility::ALL.into_iter().map(FieldSource::Facility));
    fields.extend(Equipment::ALL.into_iter().map(FieldSource::Equipment));
    fields.extend([FieldSource::Photo, FieldSource::Link, FieldSource::Verified]);
    fields
}

/// One reviewed value: a comparison key (`None` is empty) and its display.
#[derive(Debug, Clone, PartialEq)]
struct Side {
    key: Option<String>,
    display: String,
}

impl Side {
    fn empty() -> Side {
        Side {
            key: None,
            display: EMPTY_DISPLAY.to_string(),
        }
    }

    fn text(value: Option<&str>) -> Side {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) => Side {
                key: Some(v.to_lowercase()),
                display: v.to_string(),
            },
            None => Side::empty(),
        }
    }

    fn flag(value: bool) -> Side {
        Side {
            key: value.then(|| "yes".to_string()),
            display: if value { "Yes" } else { "No" }.to_string(),
        }
    }

    fn count(value: u32) -> Side {
        Side {
            key: (value > 0).then(|| value.to_string()),
            display: value.to_string(),
        }
    }
}

fn record_side(record: Option<&Record>, field: FieldSource) -> Side {
    let Some(record) = record else {
        return Side::empty();
    };
    match field {
        FieldSource::Name => Side::text(record.name.as_deref()),
        FieldSource::Facet(f) => Side::text(f.value(record)),
        FieldSource::Keywords => Side::text(record.keywords.as_deref()),
        FieldSource::Comments => Side::text(record.media.comments.as_deref()),
        FieldSource::Photo => Side::text(record.media.photo.as_deref()),
        FieldSource::Link => Side::text(record.media.link.as_deref()),
        FieldSource::Verified => Side::text(record.media.verified.as_deref()),
        FieldSource::Facility(f) => Side::flag(record.has_facility(f)),
        FieldSource::Equipment(e) => match record.equipment_count(e) {
            0 => Side::empty(),
            n => Side::count(n),
        },
    }
}

fn proposal_side(value: Option<&Value>, kind: FieldKind) -> Side {
    let present = value.filter(|v| !v.is_null() && v.as_str() != Some(""));
    match (kind, present) {
        (FieldKind::Text, _) => Side::text(parse_text(value).as_deref()),
        (_, None) => Side::empty(),
        (FieldKind::Flag, Some(v)) => Side::flag(parse_flag(Some(v))),
        (FieldKind::Count, Some(v)) => Side::count(parse_int_safe(Some(v))),
    }
}

/// A field whose value would change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    /// Moderator-facing label, e.g. "Baby Swings".
    pub field: String,
    pub old_value: String,
    pub new_value: String,
}

/// Compare a proposal against the record it targets (`None` for a new record).
///
/// Fields missing from the proposal compare as empty, except the photo,
/// which is only compared when the proposal carries one. Null, blank and
/// zero are all empty, text compares trimmed and case-insensitively, and an
/// unset flag equals `false`.
pub fn compare_record(original: Option<&Record>, proposal: &Proposal) -> Vec<FieldChange> {
    let submitted: HashMap<String, &Value> = proposal
        .fields
        .iter()
        .map(|(k, v)| (normalize_field_key(k), v))
        .collect();

    review_fields()
        .into_iter()
        .filter(|field| *field != FieldSource::Photo || submitted.contains_key(field.key()))
        .filter_map(|field| {
            let old = record_side(original, field);
            let new = proposal_side(submitted.get(field.key()).copied(), field.kind());
            (old.key != new.key).then(|| FieldChange {
                field: field.label().to_string(),
                old_value: old.display,
                new_value: new.display,
            })
        })
        .collect()
}

/// A proposal ready for a moderator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationEntry {
    pub target: ProposalTarget,
    /// Display name of the existing record, or of the proposed one.
    pub record_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_by: Option<String>,
    pub changes: Vec<FieldChange>,
}

impl ModerationEntry {
    pub fn is_new(&self) -> bool {
        matches!(self.target, ProposalTarget::New { .. })
    }

    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }
}

/// Resolve a proposal's target and build its change list.
pub fn review(collection: &Collection, proposal: &Proposal) -> Result<ModerationEntry, PlaymapError> {
    let original = match &proposal.target {
        ProposalTarget::Existing(id) => Some(
            collection
                .get(id)
                .ok_or_else(|| PlaymapError::UnknownRecord(id.to_string()))?,
        ),
        ProposalTarget::New { lat, lng } => {
            if !is_valid_position(*lat, *lng) {
                return Err(PlaymapError::MissingPosition {
                    record: "new record proposal".into(),
                });
            }
            None
        }
    };

    let changes = compare_record(original, proposal);
    let record_name = match original {
        Some(record) => record.display_name().to_string(),
        None => proposal
            .fields
            .iter()
            .find(|(k, _)| normalize_field_key(k) == "name")
            .and_then(|(_, v)| parse_text(Some(v)))
            .unwrap_or_else(|| "Unnamed Playground".to_string()),
    };

    log::debug!(
        "Reviewed proposal for '{record_name}': {} changed fields",
        changes.len()
    );

    Ok(ModerationEntry {
        target: proposal.target.clone(),
        record_name,
        submitted_by: proposal.submitted_by.clone(),
        changes,
    })
}
