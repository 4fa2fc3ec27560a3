//! Straight-line leg geometry.
//!
//! A travel leg is modeled as the straight line between its two GPS
//! endpoints; road-network routing is out of scope. Coordinates are stored
//! internally as (longitude, latitude) to match planar geometry libraries,
//! while the endpoint accessors return (latitude, longitude) for distance
//! math.

use geo_types::{Coord, LineString, MultiLineString};

use crate::error::InputRowError;

/// The straight-line path of one travel leg.
///
/// Built from raw GPS endpoints. The only validation is that every
/// coordinate is a finite number; out-of-range values are accepted as-is
/// because the boundary dataset is the source of truth for plausibility.
#[derive(Debug, Clone, PartialEq)]
pub struct LegPath {
    line: LineString<f64>,
}

impl LegPath {
    /// Build a path from start and end coordinates in degrees.
    ///
    /// # Errors
    ///
    /// Returns [`InputRowError::NonFinite`] if any coordinate is NaN or
    /// infinite.
    pub fn build(
        start_lat: f64,
        start_lon: f64,
        end_lat: f64,
        end_lon: f64,
    ) -> Result<Self, InputRowError> {
        for (field, value) in [
            ("start_lat", start_lat),
            ("start_lon", start_lon),
            ("end_lat", end_lat),
            ("end_lon", end_lon),
        ] {
            if !value.is_finite() {
                return Err(InputRowError::NonFinite { field, value });
            }
        }

        Ok(Self {
            line: LineString::from(vec![(start_lon, start_lat), (end_lon, end_lat)]),
        })
    }

    /// The path as a (longitude, latitude) line string.
    pub fn line_string(&self) -> &LineString<f64> {
        &self.line
    }

    /// The path wrapped as a multi-line string for clipping queries.
    pub fn to_multi_line_string(&self) -> MultiLineString<f64> {
        MultiLineString::new(vec![self.line.clone()])
    }

    /// Start point as (latitude, longitude) in degrees.
    pub fn start(&self) -> (f64, f64) {
        let c: Coord<f64> = self.line.0[0];
        (c.y, c.x)
    }

    /// End point as (latitude, longitude) in degrees.
    pub fn end(&self) -> (f64, f64) {
        let c: Coord<f64> = self.line.0[self.line.0.len() - 1];
        (c.y, c.x)
    }
}
