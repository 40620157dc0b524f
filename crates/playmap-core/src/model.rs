use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Stable identity of a record. Sources use either integer or string keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(v) => write!(f, "{v}"),
            RecordId::Text(v) => write!(f, "{v}"),
        }
    }
}

impl RecordId {
    /// Parse an id typed on a command line: integers stay integers.
    pub fn from_str_loose(s: &str) -> RecordId {
        let trimmed = s.trim();
        match trimmed.parse::<i64>() {
            Ok(v) => RecordId::Int(v),
            Err(_) => RecordId::Text(trimmed.to_string()),
        }
    }
}

/// Size/verification category, the closed set of raw values found in the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Classification {
    Super,
    Large,
    Medium,
    Small,
    Tiny,
    Unverified,
    #[serde(rename = "Exists: Not Digitally Classifiable")]
    ExistsNotDigitallyClassifiable,
    #[serde(rename = "Under Construction")]
    UnderConstruction,
    #[serde(rename = "Unsure If Exists")]
    UnsureIfExists,
}

impl Classification {
    pub const ALL: [Classification; 9] = [
        Classification::Super,
        Classification::Large,
        Classification::Medium,
        Classification::Small,
        Classification::Tiny,
        Classification::Unverified,
        Classification::ExistsNotDigitallyClassifiable,
        Classification::UnderConstruction,
        Classification::UnsureIfExists,
    ];

    /// The raw string as it appears in source data.
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Super => "Super",
            Classification::Large => "Large",
            Classification::Medium => "Medium",
            Classification::Small => "Small",
            Classification::Tiny => "Tiny",
            Classification::Unverified => "Unverified",
            Classification::ExistsNotDigitallyClassifiable => "Exists: Not Digitally Classifiable",
            Classification::UnderConstruction => "Under Construction",
            Classification::UnsureIfExists => "Unsure If Exists",
        }
    }

    /// Match a raw classification string, ignoring case and surrounding whitespace.
    pub fn from_raw(s: &str) -> Option<Classification> {
        let trimmed = s.trim();
        Classification::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(trimmed))
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Yes/no facility attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facility {
    Toilet,
    Bbq,
    Bubbler,
    Accessible,
    Basketball,
    PumpTrack,
    ScooterTrack,
    CricketNet,
    TennisCourt,
    SkatePark,
    ActivityWall,
    TalkingTube,
    MusicalPlay,
    SensoryPlay,
    Sandpit,
    WaterPlay,
}

impl Facility {
    pub const ALL: [Facility; 16] = [
        Facility::Toilet,
        Facility::Bbq,
        Facility::Bubbler,
        Facility::Accessible,
        Facility::Basketball,
        Facility::PumpTrack,
        Facility::ScooterTrack,
        Facility::CricketNet,
        Facility::TennisCourt,
        Facility::SkatePark,
        Facility::ActivityWall,
        Facility::TalkingTube,
        Facility::MusicalPlay,
        Facility::SensoryPlay,
        Facility::Sandpit,
        Facility::WaterPlay,
    ];

    /// Canonical field key.
    pub fn key(&self) -> &'static str {
        match self {
            Facility::Toilet => "toilet",
            Facility::Bbq => "bbq",
            Facility::Bubbler => "bubbler",
            Facility::Accessible => "accessible",
            Facility::Basketball => "basketball",
            Facility::PumpTrack => "pump_track",
            Facility::ScooterTrack => "scooter_track",
            Facility::CricketNet => "cricket_net",
            Facility::TennisCourt => "tennis_court",
            Facility::SkatePark => "skate_park",
            Facility::ActivityWall => "activity_wall",
            Facility::TalkingTube => "talking_tube",
            Facility::MusicalPlay => "musical_play",
            Facility::SensoryPlay => "sensory_play",
            Facility::Sandpit => "sandpit",
            Facility::WaterPlay => "water_play",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Facility::Toilet => "Toilet",
            Facility::Bbq => "BBQ",
            Facility::Bubbler => "Bubbler",
            Facility::Accessible => "Accessible",
            Facility::Basketball => "Basketball",
            Facility::PumpTrack => "Pump Track",
            Facility::ScooterTrack => "Scooter Track",
            Facility::CricketNet => "Cricket Net",
            Facility::TennisCourt => "Tennis Court",
            Facility::SkatePark => "Skate Park",
            Facility::ActivityWall => "Activity Wall",
            Facility::TalkingTube => "Talking Tube",
            Facility::MusicalPlay => "Musical Play",
            Facility::SensoryPlay => "Sensory Play",
            Facility::Sandpit => "Sandpit",
            Facility::WaterPlay => "Water Play",
        }
    }
}

/// Countable equipment sub-types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Equipment {
    BabySwing,
    BeltSwing,
    BasketSwing,
    DualSwing,
    Hammock,
    DoubleSlide,
    TripleSlide,
    StraightSlide,
    TubeSlide,
    SpiralSlide,
    Stairs,
    MetalLadder,
    RopeLadder,
    RockClimbing,
    MonkeyBars,
    OtherClimbing,
    RopeGym,
    SpinningPole,
    SpinningBucket,
    MerryGoRound,
    BalanceBeam,
    SteppingStones,
    SpringRocker,
    Seesaw,
    Bridge,
    Tunnel,
    Trampoline,
    FiremansPole,
    HamsterWheel,
}

impl Equipment {
    pub const ALL: [Equipment; 29] = [
        Equipment::BabySwing,
        Equipment::BeltSwing,
        Equipment::BasketSwing,
        Equipment::DualSwing,
        Equipment::Hammock,
        Equipment::DoubleSlide,
        Equipment::TripleSlide,
        Equipment::StraightSlide,
        Equipment::TubeSlide,
        Equipment::SpiralSlide,
        Equipment::Stairs,
        Equipment::MetalLadder,
        Equipment::RopeLadder,
        Equipment::RockClimbing,
        Equipment::MonkeyBars,
        Equipment::OtherClimbing,
        Equipment::RopeGym,
        Equipment::SpinningPole,
        Equipment::SpinningBucket,
        Equipment::MerryGoRound,
        Equipment::BalanceBeam,
        Equipment::SteppingStones,
        Equipment::SpringRocker,
        Equipment::Seesaw,
        Equipment::Bridge,
        Equipment::Tunnel,
        Equipment::Trampoline,
        Equipment::FiremansPole,
        Equipment::HamsterWheel,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Equipment::BabySwing => "baby_swing",
            Equipment::BeltSwing => "belt_swing",
            Equipment::BasketSwing => "basket_swing",
            Equipment::DualSwing => "dual_swing",
            Equipment::Hammock => "hammock",
            Equipment::DoubleSlide => "double_slide",
            Equipment::TripleSlide => "triple_slide",
            Equipment::StraightSlide => "straight_slide",
            Equipment::TubeSlide => "tube_slide",
            Equipment::SpiralSlide => "spiral_slide",
            Equipment::Stairs => "stairs",
            Equipment::MetalLadder => "metal_ladder",
            Equipment::RopeLadder => "rope_ladder",
            Equipment::RockClimbing => "rock_climbing",
            Equipment::MonkeyBars => "monkey_bars",
            Equipment::OtherClimbing => "other_climbing",
            Equipment::RopeGym => "rope_gym",
            Equipment::SpinningPole => "spinning_pole",
            Equipment::SpinningBucket => "spinning_bucket",
            Equipment::MerryGoRound => "merry_go_round",
            Equipment::BalanceBeam => "balance_beam",
            Equipment::SteppingStones => "stepping_stones",
            Equipment::SpringRocker => "spring_rocker",
            Equipment::Seesaw => "seesaw",
            Equipment::Bridge => "bridge",
            Equipment::Tunnel => "tunnel",
            Equipment::Trampoline => "trampoline",
            Equipment::FiremansPole => "firemans_pole",
            Equipment::HamsterWheel => "hamster_wheel",
        }
    }

    /// Plural display label used in change lists.
    pub fn label(&self) -> &'static str {
        match self {
            Equipment::BabySwing => "Baby Swings",
            Equipment::BeltSwing => "Belt Swings",
            Equipment::BasketSwing => "Basket Swings",
            Equipment::DualSwing => "Dual Swings",
            Equipment::Hammock => "Hammocks",
            Equipment::DoubleSlide => "Double Slides",
            Equipment::TripleSlide => "Triple Slides",
            Equipment::StraightSlide => "Straight Slides",
            Equipment::TubeSlide => "Tube Slides",
            Equipment::SpiralSlide => "Spiral Slides",
            Equipment::Stairs => "Stairs",
            Equipment::MetalLadder => "Metal Ladders",
            Equipment::RopeLadder => "Rope Ladders",
            Equipment::RockClimbing => "Rock Climbing",
            Equipment::MonkeyBars => "Monkey Bars",
            Equipment::OtherClimbing => "Other Climbing",
            Equipment::RopeGym => "Rope Gym",
            Equipment::SpinningPole => "Spinning Poles",
            Equipment::SpinningBucket => "Spinning Buckets",
            Equipment::MerryGoRound => "Merry Go Rounds",
            Equipment::BalanceBeam => "Balance Beams",
            Equipment::SteppingStones => "Stepping Stones",
            Equipment::SpringRocker => "Spring Rockers",
            Equipment::Seesaw => "Seesaws",
            Equipment::Bridge => "Bridges",
            Equipment::Tunnel => "Tunnels",
            Equipment::Trampoline => "Trampolines",
            Equipment::FiremansPole => "Firemans Poles",
            Equipment::HamsterWheel => "Hamster Roller Wheels",
        }
    }
}

/// Categorical attributes exposed as multi-select filters and facet lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    Type,
    Suburb,
    Lga,
    Shade,
    Fencing,
    Parking,
    Seating,
    Floor,
}

impl Facet {
    pub const ALL: [Facet; 8] = [
        Facet::Type,
        Facet::Suburb,
        Facet::Lga,
        Facet::Shade,
        Facet::Fencing,
        Facet::Parking,
        Facet::Seating,
        Facet::Floor,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Facet::Type => "type",
            Facet::Suburb => "suburb",
            Facet::Lga => "lga",
            Facet::Shade => "shade",
            Facet::Fencing => "fencing",
            Facet::Parking => "parking",
            Facet::Seating => "seating",
            Facet::Floor => "floor",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Facet::Type => "Type",
            Facet::Suburb => "Suburb",
            Facet::Lga => "LGA",
            Facet::Shade => "Shade",
            Facet::Fencing => "Fencing",
            Facet::Parking => "Parking",
            Facet::Seating => "Seating",
            Facet::Floor => "Floor",
        }
    }

    pub fn from_key(s: &str) -> Option<Facet> {
        let lower = s.trim().to_lowercase();
        Facet::ALL.into_iter().find(|f| f.key() == lower)
    }

    /// The record's value for this facet, if known.
    pub fn value<'a>(&self, record: &'a Record) -> Option<&'a str> {
        let facets = &record.facets;
        let value = match self {
            Facet::Type => &facets.playground_type,
            Facet::Suburb => &facets.suburb,
            Facet::Lga => &facets.lga,
            Facet::Shade => &facets.shade,
            Facet::Fencing => &facets.fencing,
            Facet::Parking => &facets.parking,
            Facet::Seating => &facets.seating,
            Facet::Floor => &facets.floor,
        };
        value.as_deref()
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Facets {
    #[serde(rename = "type")]
    pub playground_type: Option<String>,
    pub suburb: Option<String>,
    pub lga: Option<String>,
    pub shade: Option<String>,
    pub fencing: Option<String>,
    pub parking: Option<String>,
    pub seating: Option<String>,
    pub floor: Option<String>,
    /// Flying fox size ("Large", "Small", ...). Not a multi-select facet.
    pub flying_fox: Option<String>,
}

/// Informational fields, never used in filtering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Media {
    pub photo: Option<String>,
    pub link: Option<String>,
    pub comments: Option<String>,
    pub last_visit_date: Option<String>,
    pub verified: Option<String>,
}

/// A normalized point-of-interest record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub name: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub classification: Classification,
    /// Source classification string, unmodified.
    pub raw_classification: Option<String>,
    pub facets: Facets,
    #[serde(default)]
    pub facilities: BTreeSet<Facility>,
    /// Non-zero equipment counts.
    #[serde(default)]
    pub equipment: BTreeMap<Equipment, u32>,
    pub keywords: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub media: Media,
}

/// Tag equality used everywhere tags are compared: trimmed, Unicode
/// case-insensitive.
pub fn same_tag(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

impl Record {
    pub fn has_facility(&self, facility: Facility) -> bool {
        self.facilities.contains(&facility)
    }

    pub fn equipment_count(&self, equipment: Equipment) -> u32 {
        self.equipment.get(&equipment).copied().unwrap_or(0)
    }

    /// Case-insensitive exact match against one of the record's tags.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| same_tag(t, tag))
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unnamed Playground")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_from_raw_ignores_case() {
        assert_eq!(
            Classification::from_raw("  exists: not digitally classifiable "),
            Some(Classification::ExistsNotDigitallyClassifiable)
        );
        assert_eq!(Classification::from_raw("Gigantic"), None);
    }

    #[test]
    fn test_classification_serializes_raw_string() {
        let json = serde_json::to_string(&Classification::UnderConstruction).unwrap();
        assert_eq!(json, "\"Under Construction\"");
    }

    #[test]
    fn test_record_id_untagged() {
        let int: RecordId = serde_json::from_str("42").unwrap();
        let text: RecordId = serde_json::from_str("\"pg-7\"").unwrap();
        assert_eq!(int, RecordId::Int(42));
        assert_eq!(text, RecordId::Text("pg-7".into()));
        assert_eq!(RecordId::from_str_loose(" 42 "), RecordId::Int(42));
    }

    #[test]
    fn test_facet_from_key() {
        assert_eq!(Facet::from_key("LGA"), Some(Facet::Lga));
        assert_eq!(Facet::from_key("colour"), None);
    }
}
