use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
};

use serde::Serialize;
use tracing::{Level, debug, instrument, warn};

use crate::{
    error::{InternalFailure, InvalidInput, SearchError, SearchStatus},
    keys::{BITMASK_POOL_LIMIT, SORTED_TUPLE_POOL_LIMIT},
    oracle::{feasibility_oracle::FeasibilityOracle, route_candidate::MAX_ROUTE_LENGTH},
    problem::{dispatch_problem::DispatchProblem, order::OrderIdx},
    table::{BestRouteTable, DenseBitmaskTable, HashedTable, RouteTable, SortedDomainTable},
    utils::enumerate_idx::StridedIdx,
};

use super::{
    route_search::RouteSearch,
    search_params::{KeyEncodingChoice, SearchParams},
    statistics::SearchStatistics,
};

/// The first stops one worker roots its search at:
/// `start_index, start_index + stride, ...`
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerSlice {
    pub start_index: usize,
    pub stride: usize,
}

impl WorkerSlice {
    pub fn new(start_index: usize, stride: usize) -> Self {
        WorkerSlice {
            start_index,
            stride,
        }
    }

    /// Every order as a first stop.
    pub fn whole_pool() -> Self {
        WorkerSlice::new(0, 1)
    }
}

impl Default for WorkerSlice {
    fn default() -> Self {
        WorkerSlice::whole_pool()
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct SliceResult {
    pub table: BestRouteTable,
    pub statistics: SearchStatistics,
}

/// What a slice hands back to its caller. A failed slice carries no table.
#[derive(Debug, Clone)]
pub struct SliceOutcome {
    pub slice: WorkerSlice,
    pub result: Result<SliceResult, SearchError>,
}

impl SliceOutcome {
    pub fn status(&self) -> SearchStatus {
        match &self.result {
            Ok(_) => SearchStatus::Ok,
            Err(error) => error.status(),
        }
    }

    /// Zero on success.
    pub fn diagnostic_code(&self) -> u16 {
        self.result
            .as_ref()
            .err()
            .map_or(0, SearchError::diagnostic_code)
    }

    pub fn table(&self) -> Option<&BestRouteTable> {
        self.result.as_ref().ok().map(|result| &result.table)
    }

    pub fn statistics(&self) -> Option<&SearchStatistics> {
        self.result.as_ref().ok().map(|result| &result.statistics)
    }

    pub fn into_result(self) -> Result<SliceResult, SearchError> {
        self.result
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backing {
    DenseBitmask,
    SortedDomain,
    Hashed,
}

/// Runs the route search for one slice of first stops.
///
/// Never panics: invalid parameters are reported before any search work and
/// any fault inside the search, panics included, becomes an internal failure
/// with the partial table discarded.
#[instrument(skip_all, level = Level::DEBUG, fields(start_index = slice.start_index, stride = slice.stride))]
pub fn run_slice<O>(
    problem: &DispatchProblem,
    oracle: &O,
    params: &SearchParams,
    slice: WorkerSlice,
) -> SliceOutcome
where
    O: FeasibilityOracle,
{
    let result = validate(problem, params, slice)
        .map_err(SearchError::from)
        .and_then(|backing| {
            debug!(
                ?backing,
                guarantees = ?params.ordering.guarantees(params.level),
                "Starting slice search"
            );

            panic::catch_unwind(AssertUnwindSafe(|| {
                search_with_backing(problem, oracle, params, slice, backing)
            }))
            .unwrap_or_else(|payload| Err(InternalFailure::Panicked(panic_message(&*payload))))
            .map_err(SearchError::from)
        });

    match &result {
        Ok(result) => debug!(
            entries = result.table.len(),
            statistics = ?result.statistics,
            "Slice search finished"
        ),
        Err(error) => warn!(
            code = error.diagnostic_code(),
            "Slice search failed: {error}"
        ),
    }

    SliceOutcome { slice, result }
}

fn validate(
    problem: &DispatchProblem,
    params: &SearchParams,
    slice: WorkerSlice,
) -> Result<Backing, InvalidInput> {
    let pool_size = problem.num_orders();

    if pool_size == 0 {
        return Err(InvalidInput::EmptyOrderPool);
    }

    if slice.stride == 0 {
        return Err(InvalidInput::ZeroStride);
    }

    if slice.start_index >= pool_size {
        return Err(InvalidInput::StartIndexOutOfRange {
            start_index: slice.start_index,
            pool_size,
        });
    }

    if !(1..=MAX_ROUTE_LENGTH).contains(&params.level) {
        return Err(InvalidInput::LevelOutOfRange(params.level));
    }

    if !problem.has_consistent_geo_matrix() {
        return Err(InvalidInput::MatrixDimensionMismatch {
            expected: pool_size + 1,
            actual: problem.geo_matrix().num_locations(),
        });
    }

    let use_bitmask = match params.key_encoding {
        KeyEncodingChoice::Auto => pool_size <= BITMASK_POOL_LIMIT,
        KeyEncodingChoice::Bitmask => true,
        KeyEncodingChoice::SortedTuple => false,
    };

    if use_bitmask {
        if pool_size > BITMASK_POOL_LIMIT {
            return Err(InvalidInput::PoolTooLargeForBitmask {
                pool_size,
                limit: BITMASK_POOL_LIMIT,
            });
        }
        return Ok(Backing::DenseBitmask);
    }

    if pool_size > SORTED_TUPLE_POOL_LIMIT {
        return Err(InvalidInput::PoolTooLargeForSortedTuple {
            pool_size,
            limit: SORTED_TUPLE_POOL_LIMIT,
        });
    }

    match SortedDomainTable::domain_size(pool_size, params.level) {
        Some(size) if size <= params.sorted_domain_limit => Ok(Backing::SortedDomain),
        _ => Ok(Backing::Hashed),
    }
}

fn search_with_backing<O>(
    problem: &DispatchProblem,
    oracle: &O,
    params: &SearchParams,
    slice: WorkerSlice,
    backing: Backing,
) -> Result<SliceResult, InternalFailure>
where
    O: FeasibilityOracle,
{
    let pool_size = problem.num_orders();
    match backing {
        Backing::DenseBitmask => {
            search(problem, oracle, params, slice, DenseBitmaskTable::new(pool_size))
        }
        Backing::SortedDomain => search(
            problem,
            oracle,
            params,
            slice,
            SortedDomainTable::new(pool_size, params.level)?,
        ),
        Backing::Hashed => search(problem, oracle, params, slice, HashedTable::new()),
    }
}

fn search<O, T>(
    problem: &DispatchProblem,
    oracle: &O,
    params: &SearchParams,
    slice: WorkerSlice,
    table: T,
) -> Result<SliceResult, InternalFailure>
where
    O: FeasibilityOracle,
    T: RouteTable,
{
    let mut route_search = RouteSearch::new(problem, oracle, params, table);

    for root in StridedIdx::<OrderIdx>::new(slice.start_index, slice.stride, problem.num_orders())
    {
        route_search.run_root(root)?;
    }

    let (table, statistics) = route_search.finish();
    Ok(SliceResult {
        table: BestRouteTable::from_compacted(table.compact()),
        statistics,
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        String::from("unknown panic payload")
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        oracle::{
            feasibility_oracle::{Rejection, RouteExtension, RouteQuery},
            route_candidate::RouteCandidate,
            time_window_oracle::TimeWindowOracle,
        },
        problem::{geo_matrix::GeoMatrix, vehicle::LoopMode},
        test_utils::{self, TestOrder},
    };

    use super::*;

    struct PanickingOracle;

    impl FeasibilityOracle for PanickingOracle {
        fn check(&self, _query: &RouteQuery<'_>) -> Result<RouteCandidate, Rejection> {
            panic!("oracle exploded")
        }

        fn check_incremental(
            &self,
            _extension: &RouteExtension<'_>,
        ) -> Result<RouteCandidate, Rejection> {
            panic!("oracle exploded")
        }
    }

    fn open_problem(num_orders: usize) -> DispatchProblem {
        test_utils::create_test_problem(
            (0..num_orders).map(|_| TestOrder::open()).collect(),
            GeoMatrix::from_constant(num_orders + 1, 1),
            LoopMode::RoundTrip,
        )
    }

    #[test]
    fn test_invalid_slice_parameters() {
        let problem = open_problem(3);
        let params = SearchParams::default();

        let outcome = run_slice(&problem, &TimeWindowOracle, &params, WorkerSlice::new(0, 0));
        assert_eq!(outcome.status(), SearchStatus::InvalidInput);
        assert_eq!(outcome.diagnostic_code(), 102);
        assert!(outcome.table().is_none());

        let outcome = run_slice(&problem, &TimeWindowOracle, &params, WorkerSlice::new(3, 1));
        assert_eq!(outcome.diagnostic_code(), 103);

        let params = SearchParams {
            level: 9,
            ..SearchParams::default()
        };
        let outcome = run_slice(&problem, &TimeWindowOracle, &params, WorkerSlice::whole_pool());
        assert_eq!(outcome.diagnostic_code(), 104);
    }

    #[test]
    fn test_bitmask_rejects_large_pool() {
        let problem = open_problem(BITMASK_POOL_LIMIT + 1);
        let params = SearchParams {
            key_encoding: KeyEncodingChoice::Bitmask,
            ..SearchParams::default()
        };

        let outcome = run_slice(&problem, &TimeWindowOracle, &params, WorkerSlice::whole_pool());
        assert_eq!(
            outcome.result.unwrap_err(),
            SearchError::InvalidInput(InvalidInput::PoolTooLargeForBitmask {
                pool_size: BITMASK_POOL_LIMIT + 1,
                limit: BITMASK_POOL_LIMIT,
            })
        );
    }

    #[test]
    fn test_backing_selection() {
        let params = SearchParams::default();
        assert_eq!(
            validate(&open_problem(24), &params, WorkerSlice::whole_pool()),
            Ok(Backing::DenseBitmask)
        );
        assert_eq!(
            validate(&open_problem(25), &params, WorkerSlice::whole_pool()),
            Ok(Backing::SortedDomain)
        );

        let params = SearchParams {
            sorted_domain_limit: 10,
            ..SearchParams::default()
        };
        assert_eq!(
            validate(&open_problem(25), &params, WorkerSlice::whole_pool()),
            Ok(Backing::Hashed)
        );
    }

    #[test]
    fn test_backings_agree() {
        let problem = open_problem(5);
        let bitmask = SearchParams::default();
        let sorted = SearchParams {
            key_encoding: KeyEncodingChoice::SortedTuple,
            ..SearchParams::default()
        };
        let hashed = SearchParams {
            sorted_domain_limit: 0,
            ..sorted.clone()
        };

        let routes = |params: &SearchParams| {
            run_slice(&problem, &TimeWindowOracle, params, WorkerSlice::whole_pool())
                .into_result()
                .unwrap()
                .table
                .into_entries()
                .into_iter()
                .map(|entry| entry.route)
                .collect::<Vec<_>>()
        };

        let mut from_bitmask = routes(&bitmask);
        let mut from_sorted = routes(&sorted);
        let from_hashed = routes(&hashed);

        assert_eq!(from_sorted, from_hashed);

        // bitmask and sorted tuple keys order subsets differently
        from_bitmask.sort_by(|a, b| a.stops().cmp(b.stops()));
        from_sorted.sort_by(|a, b| a.stops().cmp(b.stops()));
        assert_eq!(from_bitmask, from_sorted);
        assert_eq!(from_bitmask.len(), 5 + 10 + 10);
    }

    #[test]
    fn test_panic_becomes_internal_failure() {
        let problem = open_problem(2);
        let outcome = run_slice(
            &problem,
            &PanickingOracle,
            &SearchParams::default(),
            WorkerSlice::whole_pool(),
        );

        assert_eq!(outcome.status(), SearchStatus::InternalError);
        assert_eq!(outcome.diagnostic_code(), 207);
        assert!(outcome.table().is_none());
    }

    #[test]
    fn test_successful_outcome() {
        let problem = open_problem(3);
        let outcome = run_slice(
            &problem,
            &TimeWindowOracle,
            &SearchParams::default(),
            WorkerSlice::new(1, 2),
        );

        assert_eq!(outcome.status(), SearchStatus::Ok);
        assert_eq!(outcome.diagnostic_code(), 0);
        assert_eq!(outcome.statistics().map(|s| s.roots), Some(1));
    }
}
