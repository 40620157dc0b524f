//! Viewport counting and cell grouping over the visible set.

use crate::error::PlaymapError;
use crate::hierarchy::{dominant_classification, ClusterTier, DominantClassification};
use crate::model::{Record, RecordId};
use geohash::{decode_bbox, encode, Coord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Longest geohash the encoder supports.
pub const MAX_CLUSTER_PRECISION: usize = 12;

/// Geographic rectangle, edges inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    /// Build from any two opposite corners given as (lat, lng).
    pub fn from_corners(a: (f64, f64), b: (f64, f64)) -> Result<Bounds, PlaymapError> {
        for (lat, lng) in [a, b] {
            if !lat.is_finite() || !lng.is_finite() {
                return Err(PlaymapError::InvalidBounds(format!(
                    "corner ({lat}, {lng}) is not a finite position"
                )));
            }
            if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
                return Err(PlaymapError::InvalidBounds(format!(
                    "corner ({lat}, {lng}) is outside the globe"
                )));
            }
        }

        Ok(Bounds {
            south: a.0.min(b.0),
            west: a.1.min(b.1),
            north: a.0.max(b.0),
            east: a.1.max(b.1),
        })
    }

    /// Parse `south,west,north,east`.
    pub fn parse(s: &str) -> Result<Bounds, PlaymapError> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(PlaymapError::InvalidBounds(format!(
                "expected 'south,west,north,east', got '{s}'"
            )));
        }

        let mut values = [0.0f64; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part.parse().map_err(|_| {
                PlaymapError::InvalidBounds(format!("'{part}' is not a number"))
            })?;
        }

        Bounds::from_corners((values[0], values[1]), (values[2], values[3]))
    }

    /// Smallest bounds containing every record, `None` when there are none.
    pub fn covering<'a, I>(records: I) -> Option<Bounds>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        records.into_iter().fold(None, |acc, r| {
            Some(match acc {
                None => Bounds {
                    south: r.lat,
                    west: r.lng,
                    north: r.lat,
                    east: r.lng,
                },
                Some(b) => Bounds {
                    south: b.south.min(r.lat),
                    west: b.west.min(r.lng),
                    north: b.north.max(r.lat),
                    east: b.east.max(r.lng),
                },
            })
        })
    }

    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        (self.south..=self.north).contains(&lat) && (self.west..=self.east).contains(&lng)
    }

    pub fn contains_record(&self, record: &Record) -> bool {
        self.contains(record.lat, record.lng)
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.south, self.west, self.north, self.east
        )
    }
}

/// How many visible records fall inside the viewport.
pub fn count_in_viewport(visible: &[&Record], bounds: &Bounds) -> usize {
    visible.iter().filter(|r| bounds.contains_record(r)).count()
}

/// Options for a view recompute.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ViewOptions {
    /// Group visible records into geohash cells of this length.
    pub cluster_precision: Option<usize>,
}

/// One group of visible records sharing a geohash cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub cell: String,
    pub count: usize,
    /// Mean position of the members.
    pub centroid_lat: f64,
    pub centroid_lng: f64,
    /// Extent of the geohash cell itself.
    pub cell_bounds: Bounds,
    pub member_ids: Vec<RecordId>,
    pub dominant: DominantClassification,
    pub tier: ClusterTier,
}

fn cell_of(record: &Record, precision: usize) -> Result<String, PlaymapError> {
    encode(
        Coord {
            x: record.lng,
            y: record.lat,
        },
        precision,
    )
    .map_err(|e| PlaymapError::CellEncoding {
        lat: record.lat,
        lng: record.lng,
        reason: e.to_string(),
    })
}

fn cell_bounds(cell: &str, fallback: &Bounds) -> Bounds {
    match decode_bbox(cell) {
        Ok(rect) => Bounds {
            south: rect.min().y,
            west: rect.min().x,
            north: rect.max().y,
            east: rect.max().x,
        },
        Err(_) => *fallback,
    }
}

/// Group visible records by geohash cell.
///
/// Groups appear in the order their first member appears in `visible`, and
/// members keep their relative order.
pub fn group_by_cell(
    visible: &[&Record],
    precision: usize,
) -> Result<Vec<ClusterSummary>, PlaymapError> {
    if !(1..=MAX_CLUSTER_PRECISION).contains(&precision) {
        return Err(PlaymapError::InvalidClusterPrecision(precision));
    }

    let mut order: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<&Record>)> = Vec::new();

    for record in visible {
        let cell = cell_of(record, precision)?;
        match order.get(&cell) {
            Some(&i) => groups[i].1.push(record),
            None => {
                order.insert(cell.clone(), groups.len());
                groups.push((cell, vec![*record]));
            }
        }
    }

    let mut clusters = Vec::with_capacity(groups.len());
    for (cell, members) in groups {
        let Some(dominant) = dominant_classification(members.iter().copied()) else {
            continue;
        };
        let Some(extent) = Bounds::covering(members.iter().copied()) else {
            continue;
        };

        let count = members.len();
        let n = count as f64;
        clusters.push(ClusterSummary {
            cell_bounds: cell_bounds(&cell, &extent),
            cell,
            count,
            centroid_lat: members.iter().map(|r| r.lat).sum::<f64>() / n,
            centroid_lng: members.iter().map(|r| r.lng).sum::<f64>() / n,
            member_ids: members.iter().map(|r| r.id.clone()).collect(),
            dominant,
            tier: ClusterTier::for_count(count),
        });
    }

    log::debug!(
        "Grouped {} visible records into {} cells at precision {precision}",
        visible.len(),
        clusters.len()
    );

    Ok(clusters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Classification;
    use crate::parsing::parse_collection;

    fn records() -> Vec<Record> {
        let json = r#"[
            {"id": 1, "lat": -32.9000, "lng": 151.7000, "classification": "Tiny"},
            {"id": 2, "lat": -32.9001, "lng": 151.7001, "classification": "Large"},
            {"id": 3, "lat": -33.8688, "lng": 151.2093, "classification": "Small"},
            {"id": 4, "lat": -32.9002, "lng": 151.7002, "classification": "Medium"}
        ]"#;
        parse_collection(json).unwrap().0
    }

    #[test]
    fn test_bounds_from_any_corners() {
        let b = Bounds::from_corners((-32.0, 152.0), (-33.0, 151.0)).unwrap();
        assert_eq!(b.south, -33.0);
        assert_eq!(b.west, 151.0);
        assert_eq!(b.north, -32.0);
        assert_eq!(b.east, 152.0);
    }

    #[test]
    fn test_bounds_parse() {
        let b = Bounds::parse("-33, 151, -32, 152").unwrap();
        assert!(b.contains(-32.5, 151.5));
        assert!(matches!(
            Bounds::parse("-33,151,-32"),
            Err(PlaymapError::InvalidBounds(_))
        ));
        assert!(matches!(
            Bounds::parse("-33,151,abc,152"),
            Err(PlaymapError::InvalidBounds(_))
        ));
        assert!(matches!(
            Bounds::parse("-95,151,-32,152"),
            Err(PlaymapError::InvalidBounds(_))
        ));
    }

    #[test]
    fn test_edges_are_inclusive() {
        let b = Bounds::from_corners((-33.0, 151.0), (-32.0, 152.0)).unwrap();
        assert!(b.contains(-33.0, 151.0));
        assert!(b.contains(-32.0, 152.0));
        assert!(!b.contains(-31.999, 152.0));
    }

    #[test]
    fn test_count_in_viewport() {
        let records = records();
        let visible: Vec<&Record> = records.iter().collect();
        let newcastle = Bounds::parse("-33,151.5,-32.5,152").unwrap();
        assert_eq!(count_in_viewport(&visible, &newcastle), 3);
        let everything = Bounds::covering(records.iter()).unwrap();
        assert_eq!(count_in_viewport(&visible, &everything), 4);
    }

    #[test]
    fn test_group_by_cell_preserves_first_appearance() {
        let records = records();
        let visible: Vec<&Record> = records.iter().collect();
        let clusters = group_by_cell(&visible, 5).unwrap();
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].count, 3);
        assert_eq!(
            clusters[0].member_ids,
            vec![RecordId::Int(1), RecordId::Int(2), RecordId::Int(4)]
        );
        assert_eq!(
            clusters[0].dominant,
            DominantClassification::Ranked(Classification::Large)
        );
        assert_eq!(clusters[1].member_ids, vec![RecordId::Int(3)]);
        assert_eq!(clusters[0].tier, ClusterTier::Small);
        assert!(clusters[0].cell_bounds.contains(-32.9, 151.7));
    }

    #[test]
    fn test_cluster_counts_sum_to_visible() {
        let records = records();
        let visible: Vec<&Record> = records.iter().collect();
        for precision in 1..=MAX_CLUSTER_PRECISION {
            let clusters = group_by_cell(&visible, precision).unwrap();
            let total: usize = clusters.iter().map(|c| c.count).sum();
            assert_eq!(total, visible.len());
        }
    }

    #[test]
    fn test_precision_out_of_range() {
        assert!(matches!(
            group_by_cell(&[], 0),
            Err(PlaymapError::InvalidClusterPrecision(0))
        ));
        assert!(matches!(
            group_by_cell(&[], 13),
            Err(PlaymapError::InvalidClusterPrecision(13))
        ));
    }

    #[test]
    fn test_empty_visible_set() {
        assert!(group_by_cell(&[], 6).unwrap().is_empty());
        assert_eq!(Bounds::covering(std::iter::empty()), None);
    }
}
