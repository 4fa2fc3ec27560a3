//! Run configuration: rate policy and distance constants.
//!
//! Rates and the high-rate region set are passed explicitly through the run
//! rather than living in process-wide constants, so rate policy is testable
//! and swappable per run. Configuration is read from a TOML file when one is
//! supplied; every field has a default.
//!
//! ```toml
//! default_rate = 0.585
//! high_rate = 0.655
//! high_rate_regions = ["CA", "NY"]
//! earth_radius_miles = 3958.8
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::distance::EARTH_RADIUS_MILES;
use crate::error::ConfigurationError;

/// Default per-mile reimbursement rate for regions outside the high-rate set.
pub const DEFAULT_RATE: f64 = 0.585;

/// Default per-mile reimbursement rate for high-rate regions.
pub const DEFAULT_HIGH_RATE: f64 = 0.655;

/// Configuration for one batch run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Dollars per mile for regions outside the high-rate set.
    pub default_rate: f64,
    /// Dollars per mile for high-rate regions.
    pub high_rate: f64,
    /// Region codes that receive the high rate and deduction priority.
    pub high_rate_regions: BTreeSet<String>,
    /// Sphere radius used for all great-circle distance computation.
    pub earth_radius_miles: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            default_rate: DEFAULT_RATE,
            high_rate: DEFAULT_HIGH_RATE,
            high_rate_regions: BTreeSet::new(),
            earth_radius_miles: EARTH_RADIUS_MILES,
        }
    }
}

impl RunConfig {
    /// Load configuration from a TOML file.
    ///
    /// Missing fields fall back to their defaults; unknown fields are
    /// rejected so typos surface at load time rather than silently using a
    /// default.
    pub fn from_file(path: &Path) -> Result<Self, ConfigurationError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigurationError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config: RunConfig =
            toml::from_str(&content).map_err(|source| ConfigurationError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Check that all numeric fields are finite and in range.
    ///
    /// Rates must be non-negative; the earth radius must be positive.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.default_rate.is_finite() || self.default_rate < 0.0 {
            return Err(ConfigurationError::InvalidValue {
                field: "default_rate",
                value: self.default_rate,
            });
        }
        if !self.high_rate.is_finite() || self.high_rate < 0.0 {
            return Err(ConfigurationError::InvalidValue {
                field: "high_rate",
                value: self.high_rate,
            });
        }
        if !self.earth_radius_miles.is_finite() || self.earth_radius_miles <= 0.0 {
            return Err(ConfigurationError::InvalidValue {
                field: "earth_radius_miles",
                value: self.earth_radius_miles,
            });
        }
        Ok(())
    }
}
