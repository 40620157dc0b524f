use crate::hierarchy::SizeRange;
use crate::model::{same_tag, Equipment, Facet, Facility, Record};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Facility toggles offered as filters. Each one narrows the visible set to
/// records that have the amenity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacilityFilter {
    Trampoline,
    SkatePark,
    LargeFlyingFox,
    Sandpit,
    ScooterTrack,
    WaterPlay,
    Accessible,
    Toilet,
    Bbq,
    Bubbler,
}

impl FacilityFilter {
    pub const ALL: [FacilityFilter; 10] = [
        FacilityFilter::Trampoline,
        FacilityFilter::SkatePark,
        FacilityFilter::LargeFlyingFox,
        FacilityFilter::Sandpit,
        FacilityFilter::ScooterTrack,
        FacilityFilter::WaterPlay,
        FacilityFilter::Accessible,
        FacilityFilter::Toilet,
        FacilityFilter::Bbq,
        FacilityFilter::Bubbler,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            FacilityFilter::Trampoline => "trampoline",
            FacilityFilter::SkatePark => "skate_park",
            FacilityFilter::LargeFlyingFox => "large_flying_fox",
            FacilityFilter::Sandpit => "sandpit",
            FacilityFilter::ScooterTrack => "scooter_track",
            FacilityFilter::WaterPlay => "water_play",
            FacilityFilter::Accessible => "accessible",
            FacilityFilter::Toilet => "toilet",
            FacilityFilter::Bbq => "bbq",
            FacilityFilter::Bubbler => "bubbler",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FacilityFilter::Trampoline => "Trampoline",
            FacilityFilter::SkatePark => "Skate Park",
            FacilityFilter::LargeFlyingFox => "Large Flying Fox",
            FacilityFilter::Sandpit => "Sandpit",
            FacilityFilter::ScooterTrack => "Scooter Track",
            FacilityFilter::WaterPlay => "Water Play",
            FacilityFilter::Accessible => "Accessible",
            FacilityFilter::Toilet => "Toilet",
            FacilityFilter::Bbq => "BBQ",
            FacilityFilter::Bubbler => "Bubbler",
        }
    }

    pub fn from_key(s: &str) -> Option<FacilityFilter> {
        let key = s.trim().to_lowercase().replace([' ', '-'], "_");
        FacilityFilter::ALL.into_iter().find(|f| f.key() == key)
    }

    /// Whether the record satisfies this toggle.
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            FacilityFilter::Trampoline => record.equipment_count(Equipment::Trampoline) > 0,
            FacilityFilter::LargeFlyingFox => record.facets.flying_fox.as_deref() == Some("Large"),
            FacilityFilter::SkatePark => record.has_facility(Facility::SkatePark),
            FacilityFilter::Sandpit => record.has_facility(Facility::Sandpit),
            FacilityFilter::ScooterTrack => record.has_facility(Facility::ScooterTrack),
            FacilityFilter::WaterPlay => record.has_facility(Facility::WaterPlay),
            FacilityFilter::Accessible => record.has_facility(Facility::Accessible),
            FacilityFilter::Toilet => record.has_facility(Facility::Toilet),
            FacilityFilter::Bbq => record.has_facility(Facility::Bbq),
            FacilityFilter::Bubbler => record.has_facility(Facility::Bubbler),
        }
    }
}

impl fmt::Display for FacilityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything the user has selected. A value: every recompute reads one
/// snapshot, and every transition returns a new state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    /// Enabled facility toggles; all must hold.
    pub facilities: BTreeSet<FacilityFilter>,
    /// Multi-select facet values. A facet with no entry is unconstrained.
    pub facets: BTreeMap<Facet, Vec<String>>,
    /// Selected tags, matched as OR.
    pub keywords: Vec<String>,
    pub size_range: SizeRange,
}

impl FilterState {
    /// A state that lets every record through.
    pub fn unrestricted() -> FilterState {
        FilterState {
            size_range: SizeRange::full(),
            ..FilterState::default()
        }
    }

    pub fn with_facility(mut self, facility: FacilityFilter) -> FilterState {
        self.facilities.insert(facility);
        self
    }

    pub fn without_facility(mut self, facility: FacilityFilter) -> FilterState {
        self.facilities.remove(&facility);
        self
    }

    /// Add a value to a facet's selection. Repeats are ignored.
    pub fn select(mut self, facet: Facet, value: impl Into<String>) -> FilterState {
        let value = value.into();
        let selected = self.facets.entry(facet).or_default();
        if !selected.contains(&value) {
            selected.push(value);
        }
        self
    }

    /// Remove a value; a facet left with nothing selected becomes unconstrained.
    pub fn deselect(mut self, facet: Facet, value: &str) -> FilterState {
        if let Some(selected) = self.facets.get_mut(&facet) {
            selected.retain(|v| v != value);
            if selected.is_empty() {
                self.facets.remove(&facet);
            }
        }
        self
    }

    pub fn clear_facet(mut self, facet: Facet) -> FilterState {
        self.facets.remove(&facet);
        self
    }

    /// Add a tag. Blank tags and case-insensitive repeats are ignored.
    pub fn select_keyword(mut self, keyword: &str) -> FilterState {
        let keyword = keyword.trim();
        if !keyword.is_empty() && !self.has_keyword(keyword) {
            self.keywords.push(keyword.to_string());
        }
        self
    }

    pub fn remove_keyword(mut self, keyword: &str) -> FilterState {
        self.keywords.retain(|k| !same_tag(k, keyword));
        self
    }

    pub fn clear_keywords(mut self) -> FilterState {
        self.keywords.clear();
        self
    }

    pub fn with_size_min(mut self, min: usize) -> FilterState {
        self.size_range = self.size_range.with_min(min);
        self
    }

    pub fn with_size_max(mut self, max: usize) -> FilterState {
        self.size_range = self.size_range.with_max(max);
        self
    }

    pub fn with_size_range(mut self, range: SizeRange) -> FilterState {
        self.size_range = range;
        self
    }

    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| same_tag(k, keyword))
    }

    pub fn selected(&self, facet: Facet) -> &[String] {
        self.facets.get(&facet).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of active constraints beyond the size range.
    pub fn active_constraints(&self) -> usize {
        self.facilities.len()
            + self.facets.values().filter(|v| !v.is_empty()).count()
            + usize::from(!self.keywords.is_empty())
    }
}
