//! Great-circle distance in statute miles.
//!
//! All mileage figures in the system come from the haversine formula defined
//! here, so raw miles, deducted miles, and reimbursement totals are mutually
//! comparable. No other distance metric is used anywhere.
//!
//! # Coordinate System
//!
//! - Latitude: degrees north (-90 to 90)
//! - Longitude: degrees east (-180 to 180)
//! - Distance: statute miles

use std::f64::consts::PI;

/// Earth's mean radius in statute miles.
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Degrees to radians conversion factor.
const DEG_TO_RAD: f64 = PI / 180.0;

/// Calculate the great-circle distance between two positions, in miles.
///
/// Uses the haversine formula on a spherical earth with
/// [`EARTH_RADIUS_MILES`].
///
/// # Arguments
///
/// * `from` - First position as (latitude, longitude) in degrees
/// * `to` - Second position as (latitude, longitude) in degrees
///
/// # Example
///
/// ```
/// use statemiles::distance::haversine_miles;
///
/// // 1 degree of latitude is roughly 69 statute miles
/// let dist = haversine_miles((0.0, 0.0), (1.0, 0.0));
/// assert!((dist - 69.1).abs() < 0.1);
/// ```
pub fn haversine_miles(from: (f64, f64), to: (f64, f64)) -> f64 {
    haversine_miles_with_radius(from, to, EARTH_RADIUS_MILES)
}

/// Calculate the great-circle distance with an explicit sphere radius.
///
/// The radius is part of the run configuration; everything in the library
/// routes through this function so a run uses one radius consistently.
pub fn haversine_miles_with_radius(from: (f64, f64), to: (f64, f64), radius_miles: f64) -> f64 {
    let (lat1, lon1) = from;
    let (lat2, lon2) = to;

    let lat1_rad = lat1 * DEG_TO_RAD;
    let lat2_rad = lat2 * DEG_TO_RAD;
    let delta_lat = (lat2 - lat1) * DEG_TO_RAD;
    let delta_lon = (lon2 - lon1) * DEG_TO_RAD;

    // Haversine formula
    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    radius_miles * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_degree_latitude() {
        // 1 degree of latitude = R * pi / 180 ≈ 69.09 miles
        let dist = haversine_miles((0.0, 0.0), (1.0, 0.0));
        assert!(
            (dist - 69.09).abs() < 0.05,
            "1° lat should be ~69.09mi, got {}",
            dist
        );
    }

    #[test]
    fn test_zero_distance() {
        let dist = haversine_miles((33.5, -86.8), (33.5, -86.8));
        assert!(dist.abs() < 1e-9, "Same point should have zero distance");
    }

    #[test]
    fn test_symmetry() {
        let a = (33.5, -86.8);
        let b = (32.4, -84.1);

        let ab = haversine_miles(a, b);
        let ba = haversine_miles(b, a);

        assert!((ab - ba).abs() < 1e-9, "Distance should be symmetric");
    }

    #[test]
    fn test_birmingham_to_atlanta() {
        // Birmingham AL to Atlanta GA is roughly 145 miles straight-line
        let birmingham = (33.52, -86.80);
        let atlanta = (33.75, -84.39);
        let dist = haversine_miles(birmingham, atlanta);

        assert!((dist - 140.0).abs() < 10.0, "Expected ~140mi, got {}", dist);
    }

    #[test]
    fn test_longitude_shrinks_with_latitude() {
        // 1 degree of longitude is shorter at higher latitudes
        let at_equator = haversine_miles((0.0, 0.0), (0.0, 1.0));
        let at_60n = haversine_miles((60.0, 0.0), (60.0, 1.0));

        assert!(
            at_60n < at_equator * 0.55,
            "1° lon at 60°N ({}) should be about half of equator ({})",
            at_60n,
            at_equator
        );
    }

    #[test]
    fn test_custom_radius_scales_linearly() {
        let from = (10.0, 10.0);
        let to = (11.0, 11.0);

        let base = haversine_miles_with_radius(from, to, EARTH_RADIUS_MILES);
        let doubled = haversine_miles_with_radius(from, to, EARTH_RADIUS_MILES * 2.0);

        assert!(
            (doubled - base * 2.0).abs() < 1e-9,
            "Distance should scale with radius"
        );
    }
}
