use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::{Level, info, instrument};

use crate::{
    error::{InternalFailure, SearchError},
    oracle::feasibility_oracle::FeasibilityOracle,
    problem::dispatch_problem::DispatchProblem,
    table::BestRouteTable,
};

use super::{
    search_params::{FanOutParams, SearchParams},
    slice::{SliceOutcome, WorkerSlice, run_slice},
    statistics::SearchStatistics,
};

/// Outcomes of every slice of a fan-out, in slice order.
#[derive(Debug, Clone)]
pub struct FanOutReport {
    outcomes: Vec<SliceOutcome>,
}

impl FanOutReport {
    pub fn outcomes(&self) -> &[SliceOutcome] {
        &self.outcomes
    }

    pub fn num_failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.result.is_err())
            .count()
    }

    /// Counters summed over the successful slices.
    pub fn statistics(&self) -> SearchStatistics {
        let mut total = SearchStatistics::default();
        for statistics in self.outcomes.iter().filter_map(SliceOutcome::statistics) {
            total += *statistics;
        }
        total
    }

    /// Merges every slice table into one, keeping the best route per subset.
    /// The first failed slice, in slice order, fails the whole merge.
    pub fn merged(self) -> Result<BestRouteTable, SearchError> {
        let tables = self
            .outcomes
            .into_iter()
            .map(|outcome| outcome.into_result().map(|result| result.table))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(BestRouteTable::merge_all(tables))
    }
}

/// Runs one slice per stride offset on a dedicated thread pool.
///
/// The number of slices is clamped to the pool size so that every slice has
/// at least one first stop. Slices share only the read-only inputs.
#[instrument(skip_all, level = Level::DEBUG)]
pub fn fan_out<O>(
    problem: &DispatchProblem,
    oracle: &O,
    params: &SearchParams,
    fan_out_params: &FanOutParams,
) -> Result<FanOutReport, SearchError>
where
    O: FeasibilityOracle,
{
    let stride = fan_out_params.slices.clamp(1, problem.num_orders().max(1));

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(fan_out_params.threads.number_of_threads())
        .thread_name(|index| format!("dispatch-slice-{index}"))
        .build()
        .map_err(|error| InternalFailure::ThreadPool(error.to_string()))?;

    let outcomes = pool.install(|| {
        (0..stride)
            .into_par_iter()
            .map(|start_index| {
                run_slice(problem, oracle, params, WorkerSlice::new(start_index, stride))
            })
            .collect::<Vec<_>>()
    });

    let report = FanOutReport { outcomes };
    info!(
        slices = stride,
        failed = report.num_failed(),
        "Fan-out finished"
    );

    Ok(report)
}
