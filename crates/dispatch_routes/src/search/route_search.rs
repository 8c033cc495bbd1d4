use fixedbitset::FixedBitSet;
use itertools::Itertools;

use crate::{
    error::InternalFailure,
    keys::SubsetKeyEncoding,
    oracle::{
        feasibility_oracle::{FeasibilityOracle, RouteExtension, RouteQuery},
        route_candidate::{RouteCandidate, Stops},
    },
    problem::{
        dispatch_problem::DispatchProblem,
        order::OrderIdx,
        time_window::{Minutes, TimeWindow},
    },
    table::{OfferOutcome, RouteTable},
};

use super::{pruning, search_params::SearchParams, statistics::SearchStatistics};

/// Depth-first enumeration of stop orderings from a set of first stops.
///
/// Every ordering accepted by the oracle is offered to the table under the key
/// of its order set. Orderings are extended one stop at a time while they stay
/// shorter than the level; the visited set keeps each ordering free of
/// repeated orders.
pub(crate) struct RouteSearch<'a, O, T> {
    problem: &'a DispatchProblem,
    oracle: &'a O,
    params: &'a SearchParams,
    table: T,
    visited: FixedBitSet,
    statistics: SearchStatistics,
}

impl<'a, O, T> RouteSearch<'a, O, T>
where
    O: FeasibilityOracle,
    T: RouteTable,
{
    pub fn new(
        problem: &'a DispatchProblem,
        oracle: &'a O,
        params: &'a SearchParams,
        table: T,
    ) -> Self {
        RouteSearch {
            problem,
            oracle,
            params,
            table,
            visited: FixedBitSet::with_capacity(problem.num_orders()),
            statistics: SearchStatistics::default(),
        }
    }

    pub fn run_root(&mut self, root: OrderIdx) -> Result<(), InternalFailure> {
        self.statistics.roots += 1;

        let stops = [root];
        let Some(candidate) = self.check(&stops) else {
            return Ok(());
        };

        self.record(&candidate)?;
        self.descend(root, &candidate)
    }

    pub fn finish(self) -> (T, SearchStatistics) {
        (self.table, self.statistics)
    }

    fn descend(&mut self, stop: OrderIdx, candidate: &RouteCandidate) -> Result<(), InternalFailure> {
        if candidate.len() >= self.params.level {
            return Ok(());
        }

        self.visited.insert(stop.get());
        let result = self.extend(candidate);
        self.visited.set(stop.get(), false);
        result
    }

    fn extend(&mut self, predecessor: &RouteCandidate) -> Result<(), InternalFailure> {
        let Some(previous) = predecessor.last_stop() else {
            return Ok(());
        };

        let problem = self.problem;
        let hand_in_time = problem.vehicle().hand_in_time();
        let from = problem.geo_idx(previous);

        for index in 0..problem.num_orders() {
            if self.visited.contains(index) {
                continue;
            }

            let next = OrderIdx::new(index);
            let travel_time = problem.travel_time(from, problem.geo_idx(next));
            let window = problem.order(next).time_window();

            let Some(admissible) =
                pruning::admissible_departures(predecessor, hand_in_time, travel_time, window)?
            else {
                self.statistics.pruned += 1;
                continue;
            };

            let Some(candidate) = self.check_extension(predecessor, next, travel_time, admissible)
            else {
                continue;
            };

            self.record(&candidate)?;
            self.descend(next, &candidate)?;
        }

        Ok(())
    }

    fn check(&mut self, stops: &[OrderIdx]) -> Option<RouteCandidate> {
        self.statistics.oracle_calls += 1;
        match self.oracle.check(&RouteQuery::new(self.problem, stops)) {
            Ok(candidate) => Some(candidate),
            Err(_) => {
                self.statistics.rejected += 1;
                None
            }
        }
    }

    fn check_extension(
        &mut self,
        predecessor: &RouteCandidate,
        next: OrderIdx,
        travel_from_previous: Minutes,
        admissible: TimeWindow,
    ) -> Option<RouteCandidate> {
        if !self.params.incremental_oracle {
            let mut stops: Stops = predecessor.stops().iter().copied().collect();
            stops.push(next);
            return self.check(&stops);
        }

        self.statistics.incremental_calls += 1;
        let problem = self.problem;
        let extension = RouteExtension {
            predecessor,
            next,
            next_order: problem.order(next),
            travel_from_previous,
            travel_to_terminus: problem.travel_time(problem.geo_idx(next), problem.shop_geo_idx()),
            admissible,
            vehicle: problem.vehicle(),
        };

        match self.oracle.check_incremental(&extension) {
            Ok(candidate) => Some(candidate),
            Err(_) => {
                self.statistics.rejected += 1;
                None
            }
        }
    }

    fn record(&mut self, candidate: &RouteCandidate) -> Result<(), InternalFailure> {
        let key = T::Key::encode(candidate.stops())?;

        if self.params.ordering.exhausts(candidate.len()) && !self.table.contains(&key) {
            self.exhaust(key, candidate.stops())?;
        }

        self.store(key, candidate)
    }

    /// Offers every other ordering of the subset the first time it is found.
    fn exhaust(&mut self, key: T::Key, found: &[OrderIdx]) -> Result<(), InternalFailure> {
        for ordering in found.iter().copied().permutations(found.len()) {
            if ordering == found {
                continue;
            }

            self.statistics.permutations_checked += 1;
            if let Some(candidate) = self.check(&ordering) {
                self.store(key, &candidate)?;
            }
        }

        Ok(())
    }

    fn store(&mut self, key: T::Key, candidate: &RouteCandidate) -> Result<(), InternalFailure> {
        match self.table.offer(key, candidate)? {
            OfferOutcome::Inserted => self.statistics.stores += 1,
            OfferOutcome::Replaced => self.statistics.replacements += 1,
            OfferOutcome::Kept => {}
        }
        Ok(())
    }
}
