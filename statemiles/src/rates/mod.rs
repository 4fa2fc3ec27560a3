//! Rate policy and reimbursement calculation.
//!
//! The rate table is an explicit value passed into the calculator (and the
//! deduction engine) rather than a process-wide constant, so policy is
//! testable and swappable per run. `rate` is a pure function of the region
//! code and the configured high-rate set.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::config::RunConfig;
use crate::trip::{Trip, TripMileage};

/// Per-mile rates and the set of high-rate regions.
#[derive(Debug, Clone)]
pub struct RatePolicy {
    default_rate: f64,
    high_rate: f64,
    high_rate_regions: BTreeSet<String>,
}

/// Final mileage and reimbursement for one region crossing of one trip.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionResult {
    /// Region code.
    pub region: String,
    /// Dollars per mile applied to this crossing.
    pub rate: f64,
    /// Raw miles traveled inside the region.
    pub miles: f64,
    /// Miles removed by the deduction engine.
    pub deducted: f64,
    /// Miles actually reimbursed: `miles - deducted`.
    pub final_miles: f64,
    /// Reimbursement in dollars: `final_miles * rate`.
    pub reimbursement: f64,
    /// Whether the high rate applied.
    pub high_rate: bool,
}

/// Per-trip totals paired with the trip's reported figures for comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct TripSummary {
    pub trip_id: String,
    pub date: NaiveDate,
    /// Distance the traveler reported for the whole trip.
    pub reported_distance: f64,
    /// Amount actually paid out.
    pub paid_amount: f64,
    /// Computed reimbursable miles across all entries.
    pub total_final_miles: f64,
    /// Computed reimbursement in dollars across all entries.
    pub total_reimbursement: f64,
    /// Whether any entry used the high rate. Only high-rate-affected trips
    /// appear in the filtered and summary reports.
    pub high_rate_affected: bool,
}

impl RatePolicy {
    /// Create a policy from explicit rates and a high-rate region set.
    pub fn new(default_rate: f64, high_rate: f64, high_rate_regions: BTreeSet<String>) -> Self {
        Self {
            default_rate,
            high_rate,
            high_rate_regions,
        }
    }

    /// Create a policy from the run configuration.
    pub fn from_config(config: &RunConfig) -> Self {
        Self::new(
            config.default_rate,
            config.high_rate,
            config.high_rate_regions.clone(),
        )
    }

    /// Whether a region is in the high-rate set.
    pub fn is_high_rate(&self, region: &str) -> bool {
        self.high_rate_regions.contains(region)
    }

    /// Dollars per mile for a region.
    pub fn rate(&self, region: &str) -> f64 {
        if self.is_high_rate(region) {
            self.high_rate
        } else {
            self.default_rate
        }
    }

    /// Compute per-region reimbursement results for a trip.
    ///
    /// One result per mileage entry, in the entry order of the trip mileage.
    pub fn compute(&self, mileage: &TripMileage) -> Vec<RegionResult> {
        mileage
            .entries
            .iter()
            .map(|entry| {
                let rate = self.rate(&entry.region);
                let final_miles = entry.final_miles();
                RegionResult {
                    region: entry.region.clone(),
                    rate,
                    miles: entry.miles,
                    deducted: entry.deducted,
                    final_miles,
                    reimbursement: final_miles * rate,
                    high_rate: self.is_high_rate(&entry.region),
                }
            })
            .collect()
    }

    /// Summarize a trip's results against its reported figures.
    pub fn summarize(&self, trip: &Trip, results: &[RegionResult]) -> TripSummary {
        TripSummary {
            trip_id: trip.id.clone(),
            date: trip.date,
            reported_distance: trip.reported_distance,
            paid_amount: trip.paid_amount,
            total_final_miles: results.iter().map(|r| r.final_miles).sum(),
            total_reimbursement: results.iter().map(|r| r.reimbursement).sum(),
            high_rate_affected: results.iter().any(|r| r.high_rate),
        }
    }
}
