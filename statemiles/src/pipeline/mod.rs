//! Batch orchestration: files in, reports out.
//!
//! The pipeline loads the boundary dataset and rate configuration, reads the
//! trip and leg rows, and pushes each trip through
//! resolve → aggregate → deduct → compute → summarize. Configuration
//! problems abort the run before any trip is processed; a bad trip or leg
//! row skips that one trip with a warning naming the trip and stage.
//!
//! Trips are independent of one another — the computation is a pure
//! function of one trip's rows plus the shared read-only region index — so
//! the per-trip loop could be parallelized if throughput ever required it.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use crate::config::RunConfig;
use crate::deduction;
use crate::error::{ConfigurationError, InputRowError, MileageError};
use crate::path::LegPath;
use crate::rates::{RatePolicy, RegionResult, TripSummary};
use crate::region::{load_regions, RegionIndex};
use crate::rows::{self, LegRow, OutputRow, SummaryRow, TripRow};
use crate::traversal::TraversalResolver;
use crate::trip::{aggregate, Trip};

/// Output file names inside the output directory.
const PER_REGION_FILE: &str = "per_region.csv";
const HIGH_RATE_FILE: &str = "high_rate.csv";
const SUMMARY_FILE: &str = "summary.csv";

/// Input and output locations plus the run configuration.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// GeoJSON boundary dataset.
    pub regions_path: PathBuf,
    /// Trip rows CSV.
    pub trips_path: PathBuf,
    /// Leg rows CSV.
    pub legs_path: PathBuf,
    /// Directory for the three output CSVs; created if missing.
    pub output_dir: PathBuf,
    /// Rates, high-rate set, and distance constants.
    pub config: RunConfig,
}

/// Counters describing a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Trips processed to completion.
    pub trips_processed: usize,
    /// Trips skipped because of bad input rows.
    pub trips_skipped: usize,
    /// High-rate-affected trips (eligible for the filtered reports).
    pub high_rate_trips: usize,
    /// Per-region rows written to the main report.
    pub region_rows: usize,
}

/// Everything computed for one trip.
struct TripOutcome {
    trip: Trip,
    results: Vec<RegionResult>,
    summary: TripSummary,
}

/// Run the full batch pipeline.
///
/// # Errors
///
/// Returns [`MileageError::Configuration`] for boundary or rate
/// configuration problems (nothing is processed), [`MileageError::Input`]
/// when a row file cannot be read at all, and output variants when results
/// cannot be written. Per-trip row problems are logged and skipped, never
/// silently repaired.
pub fn run(options: &PipelineOptions) -> Result<RunReport, MileageError> {
    options.config.validate()?;

    let regions = load_regions(&options.regions_path)?;
    let index = RegionIndex::load(regions)?;

    // High-rate codes must exist in the loaded dataset; a typo here would
    // silently demote a region to the default rate
    for code in &options.config.high_rate_regions {
        if !index.contains_code(code) {
            return Err(ConfigurationError::UnknownRegion(code.clone()).into());
        }
    }

    let trip_rows = rows::read_trips(&options.trips_path)?;
    let leg_rows = rows::read_legs(&options.legs_path)?;
    tracing::info!(
        trips = trip_rows.len(),
        legs = leg_rows.len(),
        regions = index.len(),
        "inputs loaded"
    );

    let legs_by_trip = group_legs(&trip_rows, &leg_rows);
    let policy = RatePolicy::from_config(&options.config);
    let resolver = TraversalResolver::new(options.config.earth_radius_miles);

    let mut report = RunReport::default();
    let mut outcomes: Vec<TripOutcome> = Vec::with_capacity(trip_rows.len());

    for trip_row in &trip_rows {
        let legs = legs_by_trip
            .get(trip_row.trip_id.as_str())
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        match process_trip(trip_row, legs, &resolver, &index, &policy) {
            Ok(outcome) => {
                report.trips_processed += 1;
                if outcome.summary.high_rate_affected {
                    report.high_rate_trips += 1;
                }
                outcomes.push(outcome);
            }
            Err(error) => {
                tracing::warn!(
                    trip_id = %trip_row.trip_id,
                    stage = "trip processing",
                    %error,
                    "skipping trip"
                );
                report.trips_skipped += 1;
            }
        }
    }

    write_reports(options, &outcomes, &mut report)?;

    tracing::info!(
        processed = report.trips_processed,
        skipped = report.trips_skipped,
        high_rate = report.high_rate_trips,
        "run complete"
    );
    Ok(report)
}

/// Group leg rows by trip id, preserving file order within each trip.
///
/// Legs referencing a trip id with no matching trip record are reported and
/// dropped; a trip record is never fabricated for them.
fn group_legs<'a>(
    trips: &[TripRow],
    legs: &'a [LegRow],
) -> BTreeMap<&'a str, Vec<&'a LegRow>> {
    let known: std::collections::BTreeSet<&str> =
        trips.iter().map(|t| t.trip_id.as_str()).collect();

    let mut grouped: BTreeMap<&str, Vec<&LegRow>> = BTreeMap::new();
    for leg in legs {
        if known.contains(leg.trip_id.as_str()) {
            grouped.entry(leg.trip_id.as_str()).or_default().push(leg);
        } else {
            let error = InputRowError::UnknownTrip {
                trip_id: leg.trip_id.clone(),
            };
            tracing::warn!(stage = "leg grouping", %error, "dropping orphan leg");
        }
    }
    grouped
}

/// Push one trip through the engine.
fn process_trip(
    trip_row: &TripRow,
    legs: &[&LegRow],
    resolver: &TraversalResolver,
    index: &RegionIndex,
    policy: &RatePolicy,
) -> Result<TripOutcome, InputRowError> {
    let trip = Trip::from_row(trip_row)?;

    let mut traversals = Vec::with_capacity(legs.len());
    for leg in legs {
        let path = LegPath::build(leg.start_lat, leg.start_lon, leg.end_lat, leg.end_lon)?;
        traversals.push(resolver.resolve(&path, index));
    }

    let mut mileage = aggregate(trip.id.clone(), traversals);
    deduction::apply(trip.deduction_budget, &mut mileage, policy);

    let results = policy.compute(&mileage);
    let summary = policy.summarize(&trip, &results);

    tracing::debug!(
        trip_id = %trip.id,
        entries = results.len(),
        raw_miles = mileage.total_raw_miles(),
        deducted = mileage.total_deducted(),
        "trip resolved"
    );

    Ok(TripOutcome {
        trip,
        results,
        summary,
    })
}

/// Sort, filter, and write the three output files.
fn write_reports(
    options: &PipelineOptions,
    outcomes: &[TripOutcome],
    report: &mut RunReport,
) -> Result<(), MileageError> {
    fs::create_dir_all(&options.output_dir).map_err(|source| MileageError::OutputDir {
        path: options.output_dir.clone(),
        source,
    })?;

    let mut region_rows: Vec<OutputRow> = Vec::new();
    let mut high_rate_rows: Vec<OutputRow> = Vec::new();
    let mut summary_rows: Vec<SummaryRow> = Vec::new();

    for outcome in outcomes {
        for result in &outcome.results {
            region_rows.push(OutputRow::from_result(&outcome.trip, result));
        }
        if outcome.summary.high_rate_affected {
            for result in &outcome.results {
                high_rate_rows.push(OutputRow::from_result(&outcome.trip, result));
            }
            summary_rows.push(SummaryRow::from(&outcome.summary));
        }
    }

    // Stable sort: repeated crossings of one region keep their relative
    // (aggregation) order within the trip
    region_rows.sort_by(|a, b| (&a.trip_id, &a.region).cmp(&(&b.trip_id, &b.region)));
    high_rate_rows.sort_by(|a, b| (&a.trip_id, &a.region).cmp(&(&b.trip_id, &b.region)));
    summary_rows.sort_by(|a, b| a.trip_id.cmp(&b.trip_id));

    report.region_rows = region_rows.len();

    rows::write_output_rows(&options.output_dir.join(PER_REGION_FILE), &region_rows)?;
    rows::write_output_rows(&options.output_dir.join(HIGH_RATE_FILE), &high_rate_rows)?;
    rows::write_summary_rows(&options.output_dir.join(SUMMARY_FILE), &summary_rows)?;

    Ok(())
}
