//! GeoJSON boundary dataset loader.
//!
//! The boundary dataset is a GeoJSON FeatureCollection: one feature per
//! region, with Polygon or MultiPolygon geometry and the canonical short
//! code in a `code`, `STUSPS`, or `postal` property (checked in that order,
//! covering the common U.S. state boundary exports). Loaded once at startup
//! and never mutated.
//!
//! Validation here is load-time fatal: a dataset problem aborts the run
//! before any trip is processed.

use std::fs;
use std::path::Path;

use geo_types::{LineString, MultiPolygon, Polygon};
use geojson::{Feature, GeoJson, Value};

use super::Region;
use crate::error::ConfigurationError;

/// Property keys probed for the region code, in priority order.
const CODE_KEYS: [&str; 3] = ["code", "STUSPS", "postal"];

/// Load regions from a GeoJSON file.
///
/// # Errors
///
/// Returns [`ConfigurationError`] if the file cannot be read, is not valid
/// GeoJSON, or any feature lacks a region code, has an unsupported geometry
/// type, or has a malformed ring.
pub fn load_regions(path: &Path) -> Result<Vec<Region>, ConfigurationError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigurationError::BoundaryIo {
        path: path.to_path_buf(),
        source,
    })?;
    let regions = parse_regions(&content, path)?;
    tracing::info!(
        regions = regions.len(),
        path = %path.display(),
        "boundary dataset loaded"
    );
    Ok(regions)
}

/// Parse regions from GeoJSON text.
pub fn parse_regions(content: &str, path: &Path) -> Result<Vec<Region>, ConfigurationError> {
    let geojson: GeoJson =
        content
            .parse()
            .map_err(|source| ConfigurationError::BoundaryParse {
                path: path.to_path_buf(),
                source,
            })?;

    let features = match geojson {
        GeoJson::FeatureCollection(fc) => fc.features,
        _ => {
            return Err(ConfigurationError::NotFeatureCollection {
                path: path.to_path_buf(),
            })
        }
    };

    features
        .into_iter()
        .enumerate()
        .map(|(index, feature)| feature_to_region(index, feature))
        .collect()
}

/// Convert one GeoJSON feature into a [`Region`].
fn feature_to_region(index: usize, feature: Feature) -> Result<Region, ConfigurationError> {
    let code = region_code(&feature)
        .ok_or(ConfigurationError::MissingRegionCode { index })?
        .to_string();

    let geometry = feature
        .geometry
        .ok_or_else(|| ConfigurationError::MalformedBoundary {
            region: code.clone(),
            reason: "feature has no geometry".to_string(),
        })?;

    let boundary = match geometry.value {
        Value::Polygon(rings) => MultiPolygon::new(vec![polygon_from_rings(&rings, &code)?]),
        Value::MultiPolygon(polygons) => MultiPolygon::new(
            polygons
                .iter()
                .map(|rings| polygon_from_rings(rings, &code))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        other => {
            return Err(ConfigurationError::MalformedBoundary {
                region: code,
                reason: format!("unsupported geometry type '{}'", other.type_name()),
            })
        }
    };

    Ok(Region::new(code, boundary))
}

/// Extract the region code from feature properties.
fn region_code(feature: &Feature) -> Option<&str> {
    let properties = feature.properties.as_ref()?;
    CODE_KEYS
        .iter()
        .find_map(|key| properties.get(*key).and_then(|v| v.as_str()))
}

/// Build a polygon from raw GeoJSON rings, validating each ring.
fn polygon_from_rings(
    rings: &[Vec<Vec<f64>>],
    region: &str,
) -> Result<Polygon<f64>, ConfigurationError> {
    let mut validated = rings
        .iter()
        .map(|ring| ring_to_line_string(ring, region))
        .collect::<Result<Vec<_>, _>>()?;

    if validated.is_empty() {
        return Err(ConfigurationError::MalformedBoundary {
            region: region.to_string(),
            reason: "polygon has no rings".to_string(),
        });
    }

    let exterior = validated.remove(0);
    Ok(Polygon::new(exterior, validated))
}

/// Validate one closed ring and convert it to a line string.
fn ring_to_line_string(
    ring: &[Vec<f64>],
    region: &str,
) -> Result<LineString<f64>, ConfigurationError> {
    if ring.len() < 4 {
        return Err(ConfigurationError::MalformedBoundary {
            region: region.to_string(),
            reason: format!("ring has {} positions, need at least 4", ring.len()),
        });
    }

    let mut coords = Vec::with_capacity(ring.len());
    for position in ring {
        if position.len() < 2 {
            return Err(ConfigurationError::MalformedBoundary {
                region: region.to_string(),
                reason: "position has fewer than 2 coordinates".to_string(),
            });
        }
        coords.push((position[0], position[1]));
    }

    let first = coords[0];
    let last = coords[coords.len() - 1];
    if first != last {
        return Err(ConfigurationError::MalformedBoundary {
            region: region.to_string(),
            reason: "ring is not closed".to_string(),
        });
    }

    Ok(LineString::from(coords))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn test_path() -> PathBuf {
        PathBuf::from("test.geojson")
    }

    fn feature_collection(features: &str) -> String {
        format!(r#"{{"type":"FeatureCollection","features":[{}]}}"#, features)
    }

    fn square_feature(code_prop: &str, code: &str, offset: f64) -> String {
        format!(
            r#"{{"type":"Feature","properties":{{"{}":"{}"}},"geometry":{{"type":"Polygon","coordinates":[[[{o},0],[{m},0],[{m},1],[{o},1],[{o},0]]]}}}}"#,
            code_prop,
            code,
            o = offset,
            m = offset + 1.0
        )
    }

    // =========================================================================
    // Happy paths
    // =========================================================================

    #[test]
    fn test_parse_single_polygon() {
        let content = feature_collection(&square_feature("code", "AL", 0.0));
        let regions = parse_regions(&content, &test_path()).unwrap();

        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].code, "AL");
        assert_eq!(regions[0].boundary.0.len(), 1);
    }

    #[test]
    fn test_parse_multiple_features() {
        let features = format!(
            "{},{}",
            square_feature("code", "AL", 0.0),
            square_feature("code", "GA", 1.0)
        );
        let regions = parse_regions(&feature_collection(&features), &test_path()).unwrap();

        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].code, "AL");
        assert_eq!(regions[1].code, "GA");
    }

    #[test]
    fn test_parse_multi_polygon() {
        let content = feature_collection(
            r#"{"type":"Feature","properties":{"code":"HI"},"geometry":{"type":"MultiPolygon","coordinates":[[[[0,0],[1,0],[1,1],[0,1],[0,0]]],[[[3,0],[4,0],[4,1],[3,1],[3,0]]]]}}"#,
        );
        let regions = parse_regions(&content, &test_path()).unwrap();

        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].code, "HI");
        assert_eq!(regions[0].boundary.0.len(), 2, "two pooled sub-polygons");
    }

    #[test]
    fn test_code_property_fallbacks() {
        for key in ["code", "STUSPS", "postal"] {
            let content = feature_collection(&square_feature(key, "TX", 0.0));
            let regions = parse_regions(&content, &test_path()).unwrap();
            assert_eq!(regions[0].code, "TX", "key '{}' should be accepted", key);
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", feature_collection(&square_feature("code", "NV", 0.0))).unwrap();

        let regions = load_regions(file.path()).unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].code, "NV");
    }

    // =========================================================================
    // Failure modes
    // =========================================================================

    #[test]
    fn test_missing_file() {
        let result = load_regions(Path::new("/nonexistent/states.geojson"));
        assert!(matches!(result, Err(ConfigurationError::BoundaryIo { .. })));
    }

    #[test]
    fn test_invalid_json() {
        let result = parse_regions("not geojson at all", &test_path());
        assert!(matches!(
            result,
            Err(ConfigurationError::BoundaryParse { .. })
        ));
    }

    #[test]
    fn test_not_a_feature_collection() {
        let result = parse_regions(r#"{"type":"Point","coordinates":[0,0]}"#, &test_path());
        assert!(matches!(
            result,
            Err(ConfigurationError::NotFeatureCollection { .. })
        ));
    }

    #[test]
    fn test_missing_region_code() {
        let content = feature_collection(
            r#"{"type":"Feature","properties":{"name":"Alabama"},"geometry":{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,1],[0,0]]]}}"#,
        );
        let result = parse_regions(&content, &test_path());
        assert!(matches!(
            result,
            Err(ConfigurationError::MissingRegionCode { index: 0 })
        ));
    }

    #[test]
    fn test_non_closed_ring() {
        let content = feature_collection(
            r#"{"type":"Feature","properties":{"code":"AL"},"geometry":{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,1]]]}}"#,
        );
        let result = parse_regions(&content, &test_path());
        assert!(matches!(
            result,
            Err(ConfigurationError::MalformedBoundary { region, reason })
                if region == "AL" && reason.contains("not closed")
        ));
    }

    #[test]
    fn test_ring_too_short() {
        let content = feature_collection(
            r#"{"type":"Feature","properties":{"code":"AL"},"geometry":{"type":"Polygon","coordinates":[[[0,0],[1,0],[0,0]]]}}"#,
        );
        let result = parse_regions(&content, &test_path());
        assert!(matches!(
            result,
            Err(ConfigurationError::MalformedBoundary { .. })
        ));
    }

    #[test]
    fn test_unsupported_geometry_type() {
        let content = feature_collection(
            r#"{"type":"Feature","properties":{"code":"AL"},"geometry":{"type":"Point","coordinates":[0,0]}}"#,
        );
        let result = parse_regions(&content, &test_path());
        assert!(matches!(
            result,
            Err(ConfigurationError::MalformedBoundary { region, .. }) if region == "AL"
        ));
    }

    #[test]
    fn test_feature_without_geometry() {
        let content =
            feature_collection(r#"{"type":"Feature","properties":{"code":"AL"},"geometry":null}"#);
        let result = parse_regions(&content, &test_path());
        assert!(matches!(
            result,
            Err(ConfigurationError::MalformedBoundary { region, .. }) if region == "AL"
        ));
    }
}
