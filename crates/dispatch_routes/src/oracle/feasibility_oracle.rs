use std::fmt;

use smallvec::SmallVec;

use crate::problem::{
    dispatch_problem::DispatchProblem,
    geo_matrix::{GeoIdx, GeoMatrix},
    order::{Order, OrderIdx},
    shop::Shop,
    time_window::{Minutes, TimeWindow},
    vehicle::{LoopMode, Vehicle},
};

use super::route_candidate::{MAX_ROUTE_LENGTH, RouteCandidate};

/// Why an oracle refused an ordering. The code is opaque to the search and
/// never zero; a rejection is skipped without retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rejection {
    code: u16,
}

impl Rejection {
    pub const fn new(code: u16) -> Self {
        debug_assert!(code != 0);
        Rejection { code }
    }

    pub const fn code(&self) -> u16 {
        self.code
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rejected ({})", self.code)
    }
}

/// A complete ordering submitted for validation.
pub struct RouteQuery<'a> {
    pub calc_time: Minutes,
    pub shop: &'a Shop,
    pub stops: &'a [OrderIdx],
    pub orders: SmallVec<[&'a Order; MAX_ROUTE_LENGTH]>,
    /// Geo index of each stop followed by the shop as terminus
    pub geo_indices: SmallVec<[GeoIdx; MAX_ROUTE_LENGTH + 1]>,
    pub loop_mode: LoopMode,
    pub vehicle: &'a Vehicle,
    pub geo_matrix: &'a GeoMatrix,
}

impl<'a> RouteQuery<'a> {
    pub fn new(problem: &'a DispatchProblem, stops: &'a [OrderIdx]) -> Self {
        let mut geo_indices: SmallVec<[GeoIdx; MAX_ROUTE_LENGTH + 1]> =
            stops.iter().map(|&stop| problem.geo_idx(stop)).collect();
        geo_indices.push(problem.shop_geo_idx());

        RouteQuery {
            calc_time: problem.calc_time(),
            shop: problem.shop(),
            stops,
            orders: stops.iter().map(|&stop| problem.order(stop)).collect(),
            geo_indices,
            loop_mode: problem.vehicle().loop_mode(),
            vehicle: problem.vehicle(),
            geo_matrix: problem.geo_matrix(),
        }
    }

    pub fn route_length(&self) -> usize {
        self.stops.len()
    }

    pub fn terminus(&self) -> Option<GeoIdx> {
        self.geo_indices.last().copied()
    }
}

/// A known-feasible route extended by one stop.
///
/// `admissible` is the departure interval that already survived local time
/// window propagation; the oracle only has to confirm the remaining rules.
pub struct RouteExtension<'a> {
    pub predecessor: &'a RouteCandidate,
    pub next: OrderIdx,
    pub next_order: &'a Order,
    /// Travel time from the predecessor's last stop to `next`
    pub travel_from_previous: Minutes,
    /// Travel time from `next` to the terminus
    pub travel_to_terminus: Minutes,
    pub admissible: TimeWindow,
    pub vehicle: &'a Vehicle,
}

/// Converts an ordered sequence of stops into feasibility, cost and timing.
///
/// Implementations are stateless between calls and shared across worker
/// slices, hence `Send + Sync`.
pub trait FeasibilityOracle: Send + Sync {
    fn check(&self, query: &RouteQuery<'_>) -> Result<RouteCandidate, Rejection>;

    fn check_incremental(
        &self,
        extension: &RouteExtension<'_>,
    ) -> Result<RouteCandidate, Rejection>;
}

impl<O: FeasibilityOracle + ?Sized> FeasibilityOracle for &O {
    fn check(&self, query: &RouteQuery<'_>) -> Result<RouteCandidate, Rejection> {
        (**self).check(query)
    }

    fn check_incremental(
        &self,
        extension: &RouteExtension<'_>,
    ) -> Result<RouteCandidate, Rejection> {
        (**self).check_incremental(extension)
    }
}
