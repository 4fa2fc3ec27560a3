//! Command-line entry point for the mileage audit pipeline.

use std::path::PathBuf;
use std::process;

use clap::Parser;

use statemiles::config::RunConfig;
use statemiles::error::MileageError;
use statemiles::pipeline::{self, PipelineOptions, RunReport};

/// Per-region mileage attribution and reimbursement auditing.
#[derive(Debug, Parser)]
#[command(name = "statemiles", version = statemiles::VERSION)]
struct Args {
    /// GeoJSON file of region boundaries
    #[arg(long, value_name = "FILE")]
    regions: PathBuf,

    /// CSV file of trip records
    #[arg(long, value_name = "FILE")]
    trips: PathBuf,

    /// CSV file of travel legs
    #[arg(long, value_name = "FILE")]
    legs: PathBuf,

    /// Directory for the output reports
    #[arg(long, value_name = "DIR", default_value = "output")]
    output_dir: PathBuf,

    /// Optional TOML file overriding rates and the high-rate region set
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory for the log file; stdout only when unset
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    let _logging_guard = match statemiles::logging::init(args.log_dir.as_deref()) {
        Ok(guard) => guard,
        Err(error) => {
            eprintln!("error: failed to initialize logging: {error}");
            process::exit(1);
        }
    };

    match run(&args) {
        Ok(report) => print_report(&report),
        Err(error) => {
            tracing::error!(%error, "run failed");
            eprintln!("error: {error}");
            process::exit(1);
        }
    }
}

fn run(args: &Args) -> Result<RunReport, MileageError> {
    let config = match &args.config {
        Some(path) => RunConfig::from_file(path)?,
        None => RunConfig::default(),
    };

    let options = PipelineOptions {
        regions_path: args.regions.clone(),
        trips_path: args.trips.clone(),
        legs_path: args.legs.clone(),
        output_dir: args.output_dir.clone(),
        config,
    };

    pipeline::run(&options)
}

fn print_report(report: &RunReport) {
    println!("Trips processed:    {}", report.trips_processed);
    println!("Trips skipped:      {}", report.trips_skipped);
    println!("High-rate trips:    {}", report.high_rate_trips);
    println!("Per-region rows:    {}", report.region_rows);
}
