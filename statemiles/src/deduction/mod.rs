//! The per-trip deduction engine.
//!
//! One deduction budget (in miles) is applied exactly once per trip,
//! regardless of how many legs or regions exist. High-rate regions are
//! deducted first — exhausting cheaper reimbursement before it accrues —
//! then the remaining entries, each in their aggregation order.
//!
//! After `apply` runs: `sum(deducted) == min(budget, sum(miles))`, and every
//! entry satisfies `0 <= deducted <= miles`. An entry may be deducted to
//! exactly zero remaining miles but never below.

use crate::rates::RatePolicy;
use crate::trip::TripMileage;

/// Apply a deduction budget to a trip's mileage, in place.
///
/// Entries whose region is in the policy's high-rate set are processed
/// first, then all others; both groups keep their relative order from the
/// trip mileage. Each entry absorbs `min(entry.miles, remaining budget)`
/// until the budget runs out. Entries never reached keep `deducted = 0`.
///
/// Mutation is confined to the per-trip mileage arena; nothing outside the
/// trip is touched. A negative budget is treated as zero.
pub fn apply(budget: f64, trip: &mut TripMileage, policy: &RatePolicy) {
    let budget = if budget < 0.0 {
        tracing::warn!(
            trip_id = %trip.trip_id,
            budget,
            "negative deduction budget treated as zero"
        );
        0.0
    } else {
        budget
    };

    let (high_rate, low_rate): (Vec<usize>, Vec<usize>) = (0..trip.entries.len())
        .partition(|&i| policy.is_high_rate(&trip.entries[i].region));

    let mut remaining = budget;
    for i in high_rate.into_iter().chain(low_rate) {
        if remaining <= 0.0 {
            break;
        }
        let entry = &mut trip.entries[i];
        let taken = entry.miles.min(remaining);
        entry.deducted = taken;
        remaining -= taken;
    }
}
