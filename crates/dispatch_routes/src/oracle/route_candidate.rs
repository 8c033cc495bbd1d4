use std::cmp::Ordering;

use serde::Serialize;
use smallvec::SmallVec;

use crate::problem::{
    order::OrderIdx,
    time_window::{Minutes, TimeWindow},
};

pub type Cost = i64;

/// Longest route the enumeration ever builds.
pub const MAX_ROUTE_LENGTH: usize = 8;

pub type Stops = SmallVec<[OrderIdx; MAX_ROUTE_LENGTH]>;
pub type ElapsedTimes = SmallVec<[Minutes; MAX_ROUTE_LENGTH]>;

/// A feasible ordering of orders as validated by a
/// [`FeasibilityOracle`](super::feasibility_oracle::FeasibilityOracle).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RouteCandidate {
    stops: Stops,
    cost: Cost,

    /// Departure times from the shop for which every stop's window holds
    feasible_interval: TimeWindow,

    /// Minutes between departure and the arrival at each stop
    elapsed: ElapsedTimes,

    load: u32,
}

impl RouteCandidate {
    pub fn new(
        stops: Stops,
        cost: Cost,
        feasible_interval: TimeWindow,
        elapsed: ElapsedTimes,
        load: u32,
    ) -> Self {
        debug_assert_eq!(stops.len(), elapsed.len());
        RouteCandidate {
            stops,
            cost,
            feasible_interval,
            elapsed,
            load,
        }
    }

    /// This route with `next` appended.
    pub fn extended(
        &self,
        next: OrderIdx,
        next_elapsed: Minutes,
        cost: Cost,
        feasible_interval: TimeWindow,
        load: u32,
    ) -> Self {
        let mut stops = self.stops.clone();
        stops.push(next);
        let mut elapsed = self.elapsed.clone();
        elapsed.push(next_elapsed);

        RouteCandidate {
            stops,
            cost,
            feasible_interval,
            elapsed,
            load,
        }
    }

    pub fn stops(&self) -> &[OrderIdx] {
        &self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn last_stop(&self) -> Option<OrderIdx> {
        self.stops.last().copied()
    }

    pub fn cost(&self) -> Cost {
        self.cost
    }

    pub fn feasible_interval(&self) -> &TimeWindow {
        &self.feasible_interval
    }

    pub fn elapsed(&self) -> &[Minutes] {
        &self.elapsed
    }

    pub fn last_elapsed(&self) -> Option<Minutes> {
        self.elapsed.last().copied()
    }

    pub fn load(&self) -> u32 {
        self.load
    }

    /// Total order used to pick the best route of a subset: cheaper first,
    /// equal costs broken by the lexicographically smaller stop sequence.
    pub fn ranking_cmp(&self, other: &RouteCandidate) -> Ordering {
        self.cost
            .cmp(&other.cost)
            .then_with(|| self.stops.cmp(&other.stops))
    }

    pub fn ranks_before(&self, other: &RouteCandidate) -> bool {
        self.ranking_cmp(other) == Ordering::Less
    }
}

#[cfg(test)]
mod tests {
    use smallvec::smallvec;

    use super::*;

    fn candidate(stops: &[usize], cost: Cost) -> RouteCandidate {
        RouteCandidate::new(
            stops.iter().copied().map(OrderIdx::new).collect(),
            cost,
            TimeWindow::new(0, 10),
            stops.iter().map(|_| 1).collect(),
            stops.len() as u32,
        )
    }

    #[test]
    fn test_extended() {
        let route = RouteCandidate::new(
            smallvec![OrderIdx::new(3)],
            10,
            TimeWindow::new(0, 10),
            smallvec![5],
            1,
        );
        let extended = route.extended(OrderIdx::new(1), 12, 20, TimeWindow::new(2, 8), 2);

        assert_eq!(extended.stops(), &[OrderIdx::new(3), OrderIdx::new(1)]);
        assert_eq!(extended.elapsed(), &[5, 12]);
        assert_eq!(extended.last_stop(), Some(OrderIdx::new(1)));
        assert_eq!(extended.last_elapsed(), Some(12));
        assert_eq!(extended.cost(), 20);
        assert_eq!(extended.load(), 2);
        assert_eq!(route.len(), 1);
    }

    #[test]
    fn test_ranking_prefers_cost() {
        let cheap = candidate(&[2, 1], 5);
        let expensive = candidate(&[1, 2], 6);

        assert!(cheap.ranks_before(&expensive));
        assert!(!expensive.ranks_before(&cheap));
    }

    #[test]
    fn test_ranking_breaks_ties_by_stops() {
        let a = candidate(&[1, 2], 5);
        let b = candidate(&[2, 1], 5);

        assert!(a.ranks_before(&b));
        assert!(!a.ranks_before(&a));
    }
}
