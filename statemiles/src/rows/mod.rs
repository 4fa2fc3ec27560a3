//! CSV input and output rows.
//!
//! The tabular boundary of the system: trip and leg rows come in, per-region
//! and summary rows go out. Everything in between works on domain types;
//! this module owns the serde structs and the readers/writers.
//!
//! Input columns:
//! - trips: `trip_id, date, reported_distance, deduction_budget, paid_amount`
//! - legs: `trip_id, date, start_lat, start_lon, end_lat, end_lon, reported_distance`
//!
//! Output files (written to the output directory):
//! - `per_region.csv` - one row per region crossing, ordered by trip id then
//!   region id
//! - `high_rate.csv` - same shape, filtered to high-rate-affected trips
//! - `summary.csv` - one row per high-rate-affected trip

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{InputRowError, MileageError};
use crate::rates::{RegionResult, TripSummary};
use crate::trip::Trip;

/// One trip record from the input.
#[derive(Debug, Clone, Deserialize)]
pub struct TripRow {
    pub trip_id: String,
    pub date: NaiveDate,
    pub reported_distance: f64,
    pub deduction_budget: f64,
    pub paid_amount: f64,
}

/// One travel leg from the input.
#[derive(Debug, Clone, Deserialize)]
pub struct LegRow {
    pub trip_id: String,
    pub date: NaiveDate,
    pub start_lat: f64,
    pub start_lon: f64,
    pub end_lat: f64,
    pub end_lon: f64,
    pub reported_distance: f64,
}

/// One per-region result row.
#[derive(Debug, Clone, Serialize)]
pub struct OutputRow {
    pub trip_id: String,
    pub date: NaiveDate,
    pub region: String,
    pub rate: f64,
    pub raw_miles: f64,
    pub deducted_miles: f64,
    pub final_miles: f64,
    pub reimbursement: f64,
}

impl OutputRow {
    /// Build an output row from a trip and one of its region results.
    pub fn from_result(trip: &Trip, result: &RegionResult) -> Self {
        Self {
            trip_id: trip.id.clone(),
            date: trip.date,
            region: result.region.clone(),
            rate: result.rate,
            raw_miles: result.miles,
            deducted_miles: result.deducted,
            final_miles: result.final_miles,
            reimbursement: result.reimbursement,
        }
    }
}

/// One per-trip summary row.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRow {
    pub trip_id: String,
    pub date: NaiveDate,
    pub reported_distance: f64,
    pub paid_amount: f64,
    pub total_final_miles: f64,
    pub total_reimbursement: f64,
}

impl From<&TripSummary> for SummaryRow {
    fn from(summary: &TripSummary) -> Self {
        Self {
            trip_id: summary.trip_id.clone(),
            date: summary.date,
            reported_distance: summary.reported_distance,
            paid_amount: summary.paid_amount,
            total_final_miles: summary.total_final_miles,
            total_reimbursement: summary.total_reimbursement,
        }
    }
}

/// Read all trip rows from a CSV file.
pub fn read_trips(path: &Path) -> Result<Vec<TripRow>, InputRowError> {
    read_rows(path, "trip")
}

/// Read all leg rows from a CSV file.
pub fn read_legs(path: &Path) -> Result<Vec<LegRow>, InputRowError> {
    read_rows(path, "leg")
}

fn read_rows<T: for<'de> Deserialize<'de>>(
    path: &Path,
    kind: &'static str,
) -> Result<Vec<T>, InputRowError> {
    let map_err = |source| InputRowError::Read {
        kind,
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::Reader::from_path(path).map_err(map_err)?;
    reader
        .deserialize()
        .map(|result| result.map_err(map_err))
        .collect()
}

/// Write per-region rows to a CSV file.
pub fn write_output_rows(path: &Path, rows: &[OutputRow]) -> Result<(), MileageError> {
    write_rows(path, rows)
}

/// Write summary rows to a CSV file.
pub fn write_summary_rows(path: &Path, rows: &[SummaryRow]) -> Result<(), MileageError> {
    write_rows(path, rows)
}

fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), MileageError> {
    let map_err = |source| MileageError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(map_err)?;
    for row in rows {
        writer.serialize(row).map_err(map_err)?;
    }
    writer.flush().map_err(|e| MileageError::OutputWrite {
        path: path.to_path_buf(),
        source: e.into(),
    })
}
