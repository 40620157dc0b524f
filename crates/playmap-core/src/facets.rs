use crate::filter::FilterState;
use crate::model::{same_tag, Facet, Record};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

/// Preferred display order for facets that have one. Values not listed here
/// follow alphabetically.
pub fn preferred_order(facet: Facet) -> &'static [&'static str] {
    match facet {
        Facet::Type => &[
            "Council Playground",
            "Private Playground",
            "School Playground",
        ],
        Facet::Shade => &["Natural and Sail", "Sail", "Natural", "No Shade"],
        Facet::Fencing => &[
            "Fully Fenced",
            "Partially Fenced",
            "Natural Fence",
            "No Fence",
        ],
        _ => &[],
    }
}

fn alphabetical(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Order values with the preferred prefix first (in preferred order), then
/// the remainder alphabetically.
pub fn sort_with_preferred_order(mut values: Vec<String>, preferred: &[&str]) -> Vec<String> {
    values.sort_by(|a, b| {
        let ia = preferred.iter().position(|p| p == a);
        let ib = preferred.iter().position(|p| p == b);
        match (ia, ib) {
            (Some(ia), Some(ib)) => ia.cmp(&ib),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => alphabetical(a, b),
        }
    });
    values
}

/// Distinct known values of a facet, in display order.
pub fn distinct_values(records: &[Record], facet: Facet) -> Vec<String> {
    let mut seen = HashSet::new();
    let values: Vec<String> = records
        .iter()
        .filter_map(|r| facet.value(r))
        .filter(|v| !v.is_empty())
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect();

    sort_with_preferred_order(values, preferred_order(facet))
}

/// Flat tag vocabulary across all records, sorted case-insensitively.
/// Tags differing only by case collapse onto the first spelling seen.
pub fn keyword_vocabulary(records: &[Record]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tags: Vec<String> = records
        .iter()
        .flat_map(|r| r.tags.iter())
        .filter(|t| seen.insert(t.to_lowercase()))
        .cloned()
        .collect();
    tags.sort_by(|a, b| alphabetical(a, b));
    tags
}

/// Where a filter selection points at a value no record carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionKind {
    Facet(Facet),
    Keyword,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaleSelection {
    pub kind: SelectionKind,
    pub value: String,
}

/// Facet choices derived once per loaded collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FacetIndex {
    values: BTreeMap<Facet, Vec<String>>,
    keywords: Vec<String>,
}

impl FacetIndex {
    pub fn build(records: &[Record]) -> FacetIndex {
        let values = Facet::ALL
            .into_iter()
            .map(|f| (f, distinct_values(records, f)))
            .collect();

        FacetIndex {
            values,
            keywords: keyword_vocabulary(records),
        }
    }

    pub fn values(&self, facet: Facet) -> &[String] {
        self.values.get(&facet).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn contains(&self, facet: Facet, value: &str) -> bool {
        self.values(facet).iter().any(|v| v == value)
    }

    pub fn contains_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| same_tag(k, keyword))
    }

    /// Selections in a filter that match nothing in this collection.
    pub fn stale_selections(&self, filter: &FilterState) -> Vec<StaleSelection> {
        let mut stale = Vec::new();

        for (facet, selected) in &filter.facets {
            for value in selected {
                if !self.contains(*facet, value) {
                    stale.push(StaleSelection {
                        kind: SelectionKind::Facet(*facet),
                        value: value.clone(),
                    });
                }
            }
        }

        for keyword in &filter.keywords {
            if !self.contains_keyword(keyword) {
                stale.push(StaleSelection {
                    kind: SelectionKind::Keyword,
                    value: keyword.clone(),
                });
            }
        }

        stale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::parse_collection;

    fn records() -> Vec<Record> {
        let json = r#"[
            {"id": 1, "lat": -32.7, "lng": 151.5, "type": "School Playground", "shade": "No Shade", "suburb": "Wallsend", "keywords": "lake, Shade"},
            {"id": 2, "lat": -32.8, "lng": 151.6, "type": "Adventure Park", "shade": "Sail", "suburb": "adamstown", "keywords": "Lake,BBQ"},
            {"id": 3, "lat": -32.9, "lng": 151.7, "type": "Council Playground", "shade": null, "suburb": "", "keywords": ""},
            {"id": 4, "lat": -32.9, "lng": 151.7, "type": "Council Playground", "shade": "Dense Trees", "suburb": "Merewether"}
        ]"#;
        parse_collection(json).unwrap().0
    }

    #[test]
    fn test_preferred_prefix_then_alphabetical() {
        let types = distinct_values(&records(), Facet::Type);
        assert_eq!(
            types,
            vec!["Council Playground", "School Playground", "Adventure Park"]
        );
        let shade = distinct_values(&records(), Facet::Shade);
        assert_eq!(shade, vec!["Sail", "No Shade", "Dense Trees"]);
    }

    #[test]
    fn test_nulls_and_empties_excluded() {
        let suburbs = distinct_values(&records(), Facet::Suburb);
        assert_eq!(suburbs, vec!["adamstown", "Merewether", "Wallsend"]);
    }

    #[test]
    fn test_keyword_vocabulary() {
        assert_eq!(keyword_vocabulary(&records()), vec!["BBQ", "lake", "Shade"]);
    }

    #[test]
    fn test_empty_collection() {
        let index = FacetIndex::build(&[]);
        assert!(index.values(Facet::Type).is_empty());
        assert!(index.keywords().is_empty());
    }

    #[test]
    fn test_stale_selections() {
        let index = FacetIndex::build(&records());
        let filter = FilterState::default()
            .select(Facet::Suburb, "Wallsend")
            .select(Facet::Suburb, "Atlantis")
            .select_keyword("LAKE")
            .select_keyword("Zipline");
        let stale = index.stale_selections(&filter);
        assert_eq!(stale.len(), 2);
        assert_eq!(stale[0].value, "Atlantis");
        assert_eq!(stale[1].kind, SelectionKind::Keyword);
    }

    #[test]
    fn test_non_ascii_keyword_selection_is_not_stale() {
        let json = r#"[{"id": 1, "lat": -32.7, "lng": 151.5, "keywords": "Été"}]"#;
        let records = parse_collection(json).unwrap().0;
        let index = FacetIndex::build(&records);
        assert!(index.contains_keyword("ÉTÉ"));

        let filter = FilterState::default().select_keyword("ÉTÉ");
        assert!(records[0].has_tag("ÉTÉ"));
        assert!(index.stale_selections(&filter).is_empty());
    }
}
