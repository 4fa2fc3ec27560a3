//! Statemiles - Per-state mileage attribution for travel reimbursement auditing
//!
//! This library converts raw GPS start/end coordinates for travel legs into a
//! per-state mileage breakdown. Given a straight-line travel path and a set of
//! state boundary polygons it determines which states the path crosses, how
//! many great-circle miles were traveled inside each, and the order in which
//! the states were entered. Mileage from all legs of a trip is merged, a
//! single deduction budget is applied (high-rate states first), and per-state
//! reimbursement amounts are produced for auditing against the amounts
//! actually paid.
//!
//! # High-Level API
//!
//! The [`pipeline`] module provides the batch entry point:
//!
//! ```ignore
//! use statemiles::config::RunConfig;
//! use statemiles::pipeline::{self, PipelineOptions};
//!
//! let options = PipelineOptions {
//!     regions_path: "states.geojson".into(),
//!     trips_path: "trips.csv".into(),
//!     legs_path: "legs.csv".into(),
//!     output_dir: "output".into(),
//!     config: RunConfig::default(),
//! };
//! let report = pipeline::run(&options)?;
//! println!("{} trips processed", report.trips_processed);
//! ```
//!
//! # Components
//!
//! - [`region`] - state boundaries and the intersection index
//! - [`path`] - straight-line leg geometry
//! - [`traversal`] - per-leg mileage and entry-order resolution
//! - [`trip`] - trip metadata and multi-leg aggregation
//! - [`deduction`] - the per-trip deduction budget
//! - [`rates`] - rate policy and reimbursement amounts
//! - [`rows`] - CSV input and output rows
//! - [`pipeline`] - batch orchestration

pub mod config;
pub mod deduction;
pub mod distance;
pub mod error;
pub mod logging;
pub mod path;
pub mod pipeline;
pub mod rates;
pub mod region;
pub mod rows;
pub mod traversal;
pub mod trip;

/// Version of the statemiles library and CLI.
///
/// Synchronized across all workspace components via the workspace manifest.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
