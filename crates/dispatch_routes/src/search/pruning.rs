//! Time window propagation used to discard extensions before the oracle sees
//! them.
//!
//! Extending a route ending at stop `P` with order `O` adds
//! `dtx = elapsed(P) + hand_in_time + travel(P, O)` minutes between departure
//! and the arrival at `O`. The extension survives when some departure in the
//! predecessor's interval reaches `O` inside its window. This can be computed
//! in arrival time, by shifting the predecessor interval forward, or in
//! departure time, by pulling the window back. Both forms decide the same way
//! away from the ends of the time axis, where shifting saturates. The search
//! uses the departure form, which is what the incremental oracle expects as its
//! admissible interval.

use crate::{
    error::InternalFailure,
    oracle::route_candidate::RouteCandidate,
    problem::time_window::{Minutes, TimeWindow},
};

/// Minutes between departure and the arrival at the appended stop.
pub fn extension_offset(
    predecessor_elapsed: Minutes,
    hand_in_time: Minutes,
    travel_time: Minutes,
) -> Result<Minutes, InternalFailure> {
    predecessor_elapsed
        .checked_add(hand_in_time)
        .and_then(|at| at.checked_add(travel_time))
        .ok_or(InternalFailure::ElapsedOverflow)
}

/// Arrival times at the appended stop that respect its window.
pub fn forward_interval(
    predecessor_interval: &TimeWindow,
    offset: Minutes,
    window: &TimeWindow,
) -> TimeWindow {
    predecessor_interval.shift(offset).intersect(window)
}

/// Departure times from the shop that respect the appended stop's window.
pub fn backward_interval(
    predecessor_interval: &TimeWindow,
    offset: Minutes,
    window: &TimeWindow,
) -> TimeWindow {
    predecessor_interval.intersect(&window.shift(offset.saturating_neg()))
}

/// The departure interval admissible after appending a stop with `window`, or
/// `None` when the extension is pruned.
pub fn admissible_departures(
    predecessor: &RouteCandidate,
    hand_in_time: Minutes,
    travel_time: Minutes,
    window: &TimeWindow,
) -> Result<Option<TimeWindow>, InternalFailure> {
    let Some(elapsed) = predecessor.last_elapsed() else {
        return Ok(None);
    };

    let offset = extension_offset(elapsed, hand_in_time, travel_time)?;
    let admissible = backward_interval(predecessor.feasible_interval(), offset, window);
    Ok((!admissible.is_empty()).then_some(admissible))
}
