//! Trip metadata and multi-leg aggregation.
//!
//! A trip is external, read-only metadata; its legs each resolve to an
//! ordered traversal, and aggregation concatenates those traversals into a
//! single per-trip mileage list. The list is the trip's mutable arena: it is
//! created here, mutated by the deduction engine, consumed by the
//! reimbursement calculator, and never persisted beyond one run.

use chrono::NaiveDate;

use crate::error::InputRowError;
use crate::rows::TripRow;
use crate::traversal::{OrderedTraversal, RegionMileage};

/// Read-only trip metadata from the input rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    /// Trip identifier.
    pub id: String,
    /// Trip date.
    pub date: NaiveDate,
    /// Total distance reported by the traveler, in miles.
    pub reported_distance: f64,
    /// Deduction budget in miles, applied exactly once per trip.
    pub deduction_budget: f64,
    /// Amount actually paid out for the trip, in dollars.
    pub paid_amount: f64,
}

impl Trip {
    /// Build a trip from an input row, validating numeric fields.
    ///
    /// # Errors
    ///
    /// Returns [`InputRowError::NonFinite`] if any numeric field is NaN or
    /// infinite.
    pub fn from_row(row: &TripRow) -> Result<Self, InputRowError> {
        for (field, value) in [
            ("reported_distance", row.reported_distance),
            ("deduction_budget", row.deduction_budget),
            ("paid_amount", row.paid_amount),
        ] {
            if !value.is_finite() {
                return Err(InputRowError::NonFinite { field, value });
            }
        }

        Ok(Self {
            id: row.trip_id.clone(),
            date: row.date,
            reported_distance: row.reported_distance,
            deduction_budget: row.deduction_budget,
            paid_amount: row.paid_amount,
        })
    }
}

/// All region mileage entries for one trip, in leg order then intra-leg
/// travel order.
#[derive(Debug, Clone, PartialEq)]
pub struct TripMileage {
    /// Trip identifier the entries belong to.
    pub trip_id: String,
    /// One entry per region crossing; same-region crossings from different
    /// legs (or a single leg crossing a region twice) stay distinct and are
    /// carried through deduction and reporting independently.
    pub entries: Vec<RegionMileage>,
}

impl TripMileage {
    /// Sum of raw miles across all entries.
    pub fn total_raw_miles(&self) -> f64 {
        self.entries.iter().map(|e| e.miles).sum()
    }

    /// Sum of deducted miles across all entries.
    pub fn total_deducted(&self) -> f64 {
        self.entries.iter().map(|e| e.deducted).sum()
    }
}

/// Merge per-leg traversals into one trip mileage list.
///
/// Traversals must be supplied in leg order; each leg's internal entry order
/// is preserved. Entries for the same region are deliberately not merged —
/// each crossing stays auditable as its own row.
pub fn aggregate(trip_id: impl Into<String>, traversals: Vec<OrderedTraversal>) -> TripMileage {
    TripMileage {
        trip_id: trip_id.into(),
        entries: traversals.into_iter().flatten().collect(),
    }
}
