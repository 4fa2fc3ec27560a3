//! Error taxonomy for the mileage engine.
//!
//! Two failure classes exist, matching the two kinds of input the system
//! consumes:
//!
//! - [`ConfigurationError`] - boundary or rate configuration problems. These
//!   are fatal and abort the run before any trip is processed.
//! - [`InputRowError`] - a bad trip or leg row. A file-level read failure is
//!   fatal; a per-trip failure causes that trip to be skipped with a warning
//!   naming the trip and stage. No trip record is ever fabricated.
//!
//! Nothing is retried: all inputs are static, already-loaded data, so a
//! failure is definitional rather than transient.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal configuration problems detected before any trip is processed.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Failed to read the boundary dataset from disk.
    #[error("failed to read boundary file {path}: {source}")]
    BoundaryIo { path: PathBuf, source: io::Error },

    /// The boundary dataset is not valid GeoJSON.
    #[error("failed to parse boundary file {path}: {source}")]
    BoundaryParse {
        path: PathBuf,
        source: geojson::Error,
    },

    /// The boundary dataset parsed but is not a FeatureCollection.
    #[error("boundary file {path} is not a GeoJSON FeatureCollection")]
    NotFeatureCollection { path: PathBuf },

    /// A boundary feature carries no recognizable region code property.
    #[error("boundary feature {index} has no region code property")]
    MissingRegionCode { index: usize },

    /// A region's boundary geometry is unusable.
    #[error("region '{region}' has a malformed boundary: {reason}")]
    MalformedBoundary { region: String, reason: String },

    /// The same region code appears more than once in the dataset.
    #[error("region '{0}' appears more than once in the boundary dataset")]
    DuplicateRegion(String),

    /// A configured region code does not exist in the loaded boundary set.
    #[error("unknown region '{0}' referenced in rate configuration")]
    UnknownRegion(String),

    /// Failed to read the rate configuration file.
    #[error("failed to read configuration file {path}: {source}")]
    ConfigIo { path: PathBuf, source: io::Error },

    /// The rate configuration file is not valid TOML.
    #[error("invalid configuration file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A configuration value is out of range.
    #[error("configuration field '{field}' has invalid value {value}")]
    InvalidValue { field: &'static str, value: f64 },
}

/// Failures in trip or leg row data.
#[derive(Debug, Error)]
pub enum InputRowError {
    /// A row file could not be read or decoded.
    #[error("failed to read {kind} rows from {path}: {source}")]
    Read {
        kind: &'static str,
        path: PathBuf,
        source: csv::Error,
    },

    /// A required numeric field is missing or not a finite number.
    #[error("field '{field}' is not a finite number (got {value})")]
    NonFinite { field: &'static str, value: f64 },

    /// A leg row references a trip identifier with no matching trip record.
    #[error("leg references unknown trip '{trip_id}'")]
    UnknownTrip { trip_id: String },
}

/// Top-level error for a batch run.
#[derive(Debug, Error)]
pub enum MileageError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Input(#[from] InputRowError),

    /// Failed to create the output directory.
    #[error("failed to create output directory {path}: {source}")]
    OutputDir { path: PathBuf, source: io::Error },

    /// Failed to write an output file.
    #[error("failed to write output file {path}: {source}")]
    OutputWrite { path: PathBuf, source: csv::Error },
}
