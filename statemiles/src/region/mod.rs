//! Region boundaries and the intersection index.
//!
//! A region is a named geographic area (e.g. a U.S. state) bounded by one or
//! more closed polygons. Regions with disjoint sub-polygons — insular or
//! exclave shapes — are treated as one logical region: all intersections are
//! pooled under one code.

pub mod index;
pub mod loader;

pub use index::{RegionCrossing, RegionIndex};
pub use loader::load_regions;

use geo_types::MultiPolygon;

/// A named geographic region with its boundary geometry.
///
/// Immutable after load and owned exclusively by the [`RegionIndex`].
#[derive(Debug, Clone)]
pub struct Region {
    /// Canonical short code, e.g. `"AL"`.
    pub code: String,
    /// Boundary geometry; possibly disjoint for non-contiguous regions.
    pub boundary: MultiPolygon<f64>,
}

impl Region {
    /// Create a region from a code and boundary geometry.
    pub fn new(code: impl Into<String>, boundary: MultiPolygon<f64>) -> Self {
        Self {
            code: code.into(),
            boundary,
        }
    }
}
