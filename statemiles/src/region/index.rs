//! The region index: identifier → boundary map with intersection queries.
//!
//! Built once at startup and read-only afterwards, so it can be shared
//! freely across any number of concurrent trip computations. Regions are
//! stored in a `BTreeMap` keyed by code: query iteration order is then a
//! property of the data, not of hash seeding, which keeps traversal results
//! deterministic across runs.

use std::collections::BTreeMap;

use geo::{Area, BooleanOps};
use geo_types::{MultiLineString, MultiPolygon};

use super::Region;
use crate::error::ConfigurationError;
use crate::path::LegPath;

/// The geometric intersection of a path with one region's boundary.
#[derive(Debug, Clone)]
pub struct RegionCrossing {
    /// Code of the crossed region.
    pub region: String,
    /// Portions of the path inside the region, pooled across all of the
    /// region's sub-polygons.
    pub geometry: MultiLineString<f64>,
}

/// Identifier → boundary map answering intersection queries.
#[derive(Debug)]
pub struct RegionIndex {
    regions: BTreeMap<String, MultiPolygon<f64>>,
}

impl RegionIndex {
    /// Build an index from a collection of regions.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::DuplicateRegion`] if a code appears
    /// twice, and [`ConfigurationError::MalformedBoundary`] if a boundary is
    /// empty or encloses no area (no recoverable interior). Both are
    /// load-time fatal conditions.
    pub fn load(regions: Vec<Region>) -> Result<Self, ConfigurationError> {
        let mut map = BTreeMap::new();

        for region in regions {
            if region.boundary.0.is_empty() {
                return Err(ConfigurationError::MalformedBoundary {
                    region: region.code,
                    reason: "boundary has no polygons".to_string(),
                });
            }
            if region.boundary.unsigned_area() <= 0.0 {
                return Err(ConfigurationError::MalformedBoundary {
                    region: region.code,
                    reason: "boundary encloses no area".to_string(),
                });
            }
            if map.insert(region.code.clone(), region.boundary).is_some() {
                return Err(ConfigurationError::DuplicateRegion(region.code));
            }
        }

        tracing::debug!(regions = map.len(), "region index built");
        Ok(Self { regions: map })
    }

    /// Intersect a path against every region boundary.
    ///
    /// Returns one [`RegionCrossing`] for each region the path crosses or
    /// touches, in code order. Regions with an empty intersection are
    /// omitted. A region composed of disjoint sub-polygons contributes a
    /// single pooled crossing.
    pub fn intersect(&self, path: &LegPath) -> Vec<RegionCrossing> {
        let query = path.to_multi_line_string();

        self.regions
            .iter()
            .filter_map(|(code, boundary)| {
                let clipped = boundary.clip(&query, false);
                if clipped.0.is_empty() {
                    None
                } else {
                    Some(RegionCrossing {
                        region: code.clone(),
                        geometry: clipped,
                    })
                }
            })
            .collect()
    }

    /// Whether a region code exists in the index.
    pub fn contains_code(&self, code: &str) -> bool {
        self.regions.contains_key(code)
    }

    /// Number of regions in the index.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Whether the index holds no regions.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// All region codes, in sorted order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{LineString, Polygon};

    fn square(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![Polygon::new(
            LineString::from(vec![
                (min_lon, min_lat),
                (max_lon, min_lat),
                (max_lon, max_lat),
                (min_lon, max_lat),
                (min_lon, min_lat),
            ]),
            vec![],
        )])
    }

    // =========================================================================
    // Loading and validation
    // =========================================================================

    #[test]
    fn test_load_ok() {
        let index = RegionIndex::load(vec![
            Region::new("AA", square(0.0, 0.0, 1.0, 1.0)),
            Region::new("BB", square(1.0, 0.0, 2.0, 1.0)),
        ])
        .unwrap();

        assert_eq!(index.len(), 2);
        assert!(index.contains_code("AA"));
        assert!(index.contains_code("BB"));
        assert!(!index.contains_code("CC"));
    }

    #[test]
    fn test_load_empty_collection() {
        let index = RegionIndex::load(vec![]).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn test_load_rejects_duplicate_code() {
        let result = RegionIndex::load(vec![
            Region::new("AA", square(0.0, 0.0, 1.0, 1.0)),
            Region::new("AA", square(1.0, 0.0, 2.0, 1.0)),
        ]);
        assert!(matches!(
            result,
            Err(ConfigurationError::DuplicateRegion(code)) if code == "AA"
        ));
    }

    #[test]
    fn test_load_rejects_empty_boundary() {
        let result = RegionIndex::load(vec![Region::new("AA", MultiPolygon::new(vec![]))]);
        assert!(matches!(
            result,
            Err(ConfigurationError::MalformedBoundary { .. })
        ));
    }

    #[test]
    fn test_load_rejects_zero_area_boundary() {
        // All points collinear: no recoverable interior
        let degenerate = MultiPolygon::new(vec![Polygon::new(
            LineString::from(vec![(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (0.0, 0.0)]),
            vec![],
        )]);
        let result = RegionIndex::load(vec![Region::new("AA", degenerate)]);
        assert!(matches!(
            result,
            Err(ConfigurationError::MalformedBoundary { region, .. }) if region == "AA"
        ));
    }

    #[test]
    fn test_codes_sorted() {
        let index = RegionIndex::load(vec![
            Region::new("ZZ", square(0.0, 0.0, 1.0, 1.0)),
            Region::new("AA", square(1.0, 0.0, 2.0, 1.0)),
            Region::new("MM", square(2.0, 0.0, 3.0, 1.0)),
        ])
        .unwrap();

        let codes: Vec<&str> = index.codes().collect();
        assert_eq!(codes, vec!["AA", "MM", "ZZ"]);
    }

    // =========================================================================
    // Intersection queries
    // =========================================================================

    #[test]
    fn test_intersect_crossing_path() {
        let index = RegionIndex::load(vec![Region::new("AA", square(0.0, 0.0, 1.0, 1.0))]).unwrap();

        // Path crossing the square west to east at lat 0.5
        let path = LegPath::build(0.5, -0.5, 0.5, 1.5).unwrap();
        let crossings = index.intersect(&path);

        assert_eq!(crossings.len(), 1);
        assert_eq!(crossings[0].region, "AA");
        assert!(!crossings[0].geometry.0.is_empty());
    }

    #[test]
    fn test_intersect_path_outside_all_regions() {
        let index = RegionIndex::load(vec![Region::new("AA", square(0.0, 0.0, 1.0, 1.0))]).unwrap();

        let path = LegPath::build(5.0, 5.0, 6.0, 6.0).unwrap();
        assert!(index.intersect(&path).is_empty());
    }

    #[test]
    fn test_intersect_path_fully_inside() {
        let index = RegionIndex::load(vec![Region::new("AA", square(0.0, 0.0, 1.0, 1.0))]).unwrap();

        let path = LegPath::build(0.2, 0.2, 0.8, 0.8).unwrap();
        let crossings = index.intersect(&path);

        assert_eq!(crossings.len(), 1);
        assert_eq!(crossings[0].region, "AA");
    }

    #[test]
    fn test_intersect_pools_disjoint_polygons() {
        // One region made of two disjoint squares with a gap between them
        let boundary = MultiPolygon::new(
            square(0.0, 0.0, 1.0, 1.0)
                .0
                .into_iter()
                .chain(square(2.0, 0.0, 3.0, 1.0).0)
                .collect(),
        );
        let index = RegionIndex::load(vec![Region::new("HI", boundary)]).unwrap();

        // Path crossing both sub-polygons
        let path = LegPath::build(0.5, -0.5, 0.5, 3.5).unwrap();
        let crossings = index.intersect(&path);

        assert_eq!(crossings.len(), 1, "disjoint polygons pool to one region");
        assert_eq!(crossings[0].region, "HI");
        assert_eq!(
            crossings[0].geometry.0.len(),
            2,
            "both sub-polygon portions present"
        );
    }

    #[test]
    fn test_intersect_returns_code_order() {
        let index = RegionIndex::load(vec![
            Region::new("ZZ", square(0.0, 0.0, 1.0, 1.0)),
            Region::new("AA", square(1.0, 0.0, 2.0, 1.0)),
        ])
        .unwrap();

        let path = LegPath::build(0.5, -0.5, 0.5, 2.5).unwrap();
        let crossings = index.intersect(&path);

        let codes: Vec<&str> = crossings.iter().map(|c| c.region.as_str()).collect();
        assert_eq!(codes, vec!["AA", "ZZ"], "query order follows code order");
    }
}
