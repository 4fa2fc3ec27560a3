//! Per-leg traversal resolution: which regions a path crosses, how many
//! miles it travels inside each, and the order the regions were entered.
//!
//! # Algorithm
//!
//! For each region the path crosses, the clipped intersection geometry gives
//! the entry point (first coordinate) and exit point (last coordinate); the
//! great-circle distance between them is the region's raw mileage. Entry
//! order is recovered by projecting the centroid of each region's
//! intersection onto the path: walking the path's segments from the start,
//! planar segment lengths accumulate until the centroid falls inside a
//! segment's bounding box, and the partial distance to the centroid becomes
//! the region's ordering key. Regions sort ascending by that key.
//!
//! If a centroid never lands in any segment's bounding box (a numerical
//! edge case), the full path length is used as the key: such regions sort
//! last, tied among themselves in indeterminate order. This is a documented
//! limitation, not an error.

use std::cmp::Ordering;

use geo::Centroid;
use geo_types::{Coord, MultiLineString, Point};

use crate::distance::haversine_miles_with_radius;
use crate::path::LegPath;
use crate::region::RegionIndex;

/// Tolerance for the segment bounding-box containment test.
const BBOX_EPSILON: f64 = 1e-9;

/// Raw and deducted mileage for one region crossing.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionMileage {
    /// Region code.
    pub region: String,
    /// Raw miles traveled inside the region on one path.
    pub miles: f64,
    /// Miles removed by the deduction engine; zero until it runs.
    pub deducted: f64,
}

impl RegionMileage {
    /// Create an entry with no deduction applied yet.
    pub fn new(region: impl Into<String>, miles: f64) -> Self {
        Self {
            region: region.into(),
            miles,
            deducted: 0.0,
        }
    }

    /// Miles remaining after deduction.
    pub fn final_miles(&self) -> f64 {
        self.miles - self.deducted
    }
}

/// A sequence of region mileages ordered by entry sequence along one path.
pub type OrderedTraversal = Vec<RegionMileage>;

/// Resolves paths against a region index.
#[derive(Debug, Clone)]
pub struct TraversalResolver {
    earth_radius_miles: f64,
}

impl TraversalResolver {
    /// Create a resolver using the given sphere radius for mileage.
    pub fn new(earth_radius_miles: f64) -> Self {
        Self { earth_radius_miles }
    }

    /// Resolve a path into an ordered traversal.
    ///
    /// Zero intersected regions yields an empty traversal (the path is fully
    /// outside all known regions — not an error). A path fully inside one
    /// region yields exactly one entry. Intersections that degenerate to a
    /// single point (the path grazes a boundary) are discarded: no mileage
    /// segment exists.
    pub fn resolve(&self, path: &LegPath, index: &RegionIndex) -> OrderedTraversal {
        let mut keyed: Vec<(f64, RegionMileage)> = Vec::new();

        for crossing in index.intersect(path) {
            let Some((entry, exit)) = entry_exit(&crossing.geometry) else {
                tracing::debug!(
                    region = %crossing.region,
                    "discarding single-point boundary graze"
                );
                continue;
            };

            let miles = haversine_miles_with_radius(
                (entry.y, entry.x),
                (exit.y, exit.x),
                self.earth_radius_miles,
            );
            let key = ordering_key(path, &crossing.geometry);
            keyed.push((key, RegionMileage::new(crossing.region, miles)));
        }

        keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
        keyed.into_iter().map(|(_, entry)| entry).collect()
    }
}

/// Entry and exit points of a path within a region.
///
/// The entry is the first coordinate of the intersection geometry, the exit
/// the last. Returns `None` when the intersection degenerates to a single
/// point.
fn entry_exit(geometry: &MultiLineString<f64>) -> Option<(Coord<f64>, Coord<f64>)> {
    let entry = geometry.0.first()?.0.first().copied()?;
    let exit = geometry.0.last()?.0.last().copied()?;
    if entry == exit {
        return None;
    }
    Some((entry, exit))
}

/// Cumulative planar distance of the intersection centroid along the path.
fn ordering_key(path: &LegPath, geometry: &MultiLineString<f64>) -> f64 {
    let Some(centroid) = geometry.centroid() else {
        // Nothing to project; fall through to the sort-last fallback
        return path_length(path);
    };

    let mut traveled = 0.0;
    for segment in path.line_string().lines() {
        if within_bounding_box(segment.start, segment.end, &centroid) {
            return traveled + planar_distance(segment.start, centroid.into());
        }
        traveled += planar_distance(segment.start, segment.end);
    }

    // Fallback ordering key: regions hit by it sort last
    traveled
}

/// Total planar length of the path in coordinate space.
fn path_length(path: &LegPath) -> f64 {
    path.line_string()
        .lines()
        .map(|line| planar_distance(line.start, line.end))
        .sum()
}

/// Whether a point lies within the axis-aligned bounding box of a segment.
fn within_bounding_box(start: Coord<f64>, end: Coord<f64>, point: &Point<f64>) -> bool {
    let (min_x, max_x) = (start.x.min(end.x), start.x.max(end.x));
    let (min_y, max_y) = (start.y.min(end.y), start.y.max(end.y));

    point.x() >= min_x - BBOX_EPSILON
        && point.x() <= max_x + BBOX_EPSILON
        && point.y() >= min_y - BBOX_EPSILON
        && point.y() <= max_y + BBOX_EPSILON
}

/// Euclidean distance in coordinate space (ordering only, never mileage).
fn planar_distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}
