use serde::{Deserialize, Serialize};

use crate::oracle::route_candidate::MAX_ROUTE_LENGTH;

#[derive(Clone, Debug)]
pub struct SearchParams {
    /// Maximum number of orders per route, `1..=8`
    pub level: usize,
    pub ordering: OrderingPolicy,
    pub key_encoding: KeyEncodingChoice,

    /// Largest subset domain a sorted-tuple search enumerates up front. Bigger
    /// domains fall back to a hash table.
    pub sorted_domain_limit: usize,

    /// Extend known-feasible prefixes through
    /// [`check_incremental`](crate::oracle::feasibility_oracle::FeasibilityOracle::check_incremental)
    /// instead of re-checking the whole ordering.
    pub incremental_oracle: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            level: 3,
            ordering: OrderingPolicy::Exhaustive { up_to: 5 },
            key_encoding: KeyEncodingChoice::Auto,
            sorted_domain_limit: 65_536,
            incremental_oracle: true,
        }
    }
}

/// How many orderings of a subset the search tries before trusting its best
/// route.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderingPolicy {
    /// Only the orderings reached by extending feasible prefixes one stop at a
    /// time.
    Incremental,

    /// Additionally every permutation of each subset of size `<= up_to`, the
    /// first time the subset is found.
    Exhaustive { up_to: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderingGuarantee {
    /// The stored route is the cheapest among the orderings whose every prefix
    /// the oracle accepted. A cheaper ordering with an infeasible prefix can be
    /// missed.
    VisitedOrderingsOnly,

    /// The stored route is the cheapest feasible ordering of its subset.
    PerSubsetOptimal,
}

impl OrderingPolicy {
    pub fn guarantee(&self, depth: usize) -> OrderingGuarantee {
        match self {
            // a single stop has a single ordering
            _ if depth <= 1 => OrderingGuarantee::PerSubsetOptimal,
            OrderingPolicy::Exhaustive { up_to } if depth <= *up_to => {
                OrderingGuarantee::PerSubsetOptimal
            }
            _ => OrderingGuarantee::VisitedOrderingsOnly,
        }
    }

    /// Guarantee for every route length `1..=level`.
    pub fn guarantees(&self, level: usize) -> Vec<(usize, OrderingGuarantee)> {
        (1..=level.min(MAX_ROUTE_LENGTH))
            .map(|depth| (depth, self.guarantee(depth)))
            .collect()
    }

    pub(crate) fn exhausts(&self, depth: usize) -> bool {
        depth > 1 && matches!(self, OrderingPolicy::Exhaustive { up_to } if depth <= *up_to)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyEncodingChoice {
    /// Bitmask keys for pools of at most 24 orders, sorted tuples otherwise.
    #[default]
    Auto,
    Bitmask,
    SortedTuple,
}

#[derive(Clone, Debug)]
pub struct FanOutParams {
    /// Number of worker slices; slice `i` roots the search at orders
    /// `i, i + slices, ...`
    pub slices: usize,
    pub threads: Threads,
}

impl Default for FanOutParams {
    fn default() -> Self {
        let threads = Threads::Auto;
        Self {
            slices: threads.number_of_threads(),
            threads,
        }
    }
}

#[derive(Clone, Debug)]
pub enum Threads {
    Single,
    Auto,
    Multi(usize),
}

impl Threads {
    pub fn number_of_threads(&self) -> usize {
        match self {
            Threads::Single => 1,
            Threads::Multi(num) => (*num).max(1),
            Threads::Auto => std::thread::available_parallelism().map_or(1, |n| n.get()),
        }
    }
}
