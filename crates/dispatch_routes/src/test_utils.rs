use itertools::Itertools;

use crate::{
    oracle::{
        feasibility_oracle::{FeasibilityOracle, RouteQuery},
        route_candidate::RouteCandidate,
    },
    problem::{
        dispatch_problem::{DispatchProblem, DispatchProblemBuilder},
        geo_matrix::GeoMatrix,
        order::{OrderBuilder, OrderIdx},
        shop::Shop,
        time_window::{Minutes, TimeWindow},
        vehicle::{LoopMode, VehicleBuilder},
    },
};

pub const HAND_IN_TIME: Minutes = 2;
pub const CALC_TIME: Minutes = 0;

pub struct TestOrder {
    time_window: TimeWindow,
    demand: u32,
}

impl TestOrder {
    pub fn open() -> Self {
        TestOrder {
            time_window: TimeWindow::UNBOUNDED,
            demand: 1,
        }
    }

    pub fn window(start: Minutes, end: Minutes) -> Self {
        TestOrder {
            time_window: TimeWindow::new(start, end),
            demand: 1,
        }
    }

    pub fn demand(mut self, demand: u32) -> Self {
        self.demand = demand;
        self
    }
}

fn build_problem(
    orders: Vec<TestOrder>,
    geo_matrix: GeoMatrix,
    loop_mode: LoopMode,
    capacity: Option<u32>,
) -> DispatchProblem {
    let orders = orders
        .into_iter()
        .enumerate()
        .map(|(index, order)| {
            let mut builder = OrderBuilder::default();
            builder
                .set_external_id(index.to_string())
                .set_location_id(index)
                .set_time_window(order.time_window)
                .set_demand(order.demand);
            builder.build().unwrap()
        })
        .collect::<Vec<_>>();

    let mut vehicle = VehicleBuilder::default();
    vehicle
        .set_vehicle_id(String::from("test_vehicle"))
        .set_loop_mode(loop_mode)
        .set_hand_in_time(HAND_IN_TIME);
    if let Some(capacity) = capacity {
        vehicle.set_capacity(capacity);
    }

    let shop_location = orders.len();
    let mut builder = DispatchProblemBuilder::default();
    builder
        .set_orders(orders)
        .set_geo_matrix(geo_matrix)
        .set_shop(Shop::new(String::from("shop"), shop_location))
        .set_vehicle(vehicle.build().unwrap())
        .set_calc_time(CALC_TIME);

    builder.build().unwrap()
}

pub fn create_test_problem(
    orders: Vec<TestOrder>,
    geo_matrix: GeoMatrix,
    loop_mode: LoopMode,
) -> DispatchProblem {
    build_problem(orders, geo_matrix, loop_mode, None)
}

pub fn create_test_problem_with_capacity(
    orders: Vec<TestOrder>,
    geo_matrix: GeoMatrix,
    loop_mode: LoopMode,
    capacity: u32,
) -> DispatchProblem {
    build_problem(orders, geo_matrix, loop_mode, Some(capacity))
}

/// Travel times on a line: location `i` sits at kilometre `positions[i]`, the
/// shop is the last entry.
pub fn create_line_matrix(positions: &[Minutes]) -> GeoMatrix {
    GeoMatrix::from_rows(
        positions
            .iter()
            .map(|from| positions.iter().map(|to| (from - to).abs()).collect())
            .collect(),
    )
    .unwrap()
}

pub fn order_indices(indices: &[usize]) -> Vec<OrderIdx> {
    indices.iter().copied().map(OrderIdx::new).collect()
}

/// Best feasible ordering of `subset` found by trying every permutation.
pub fn brute_force_best<O: FeasibilityOracle>(
    problem: &DispatchProblem,
    oracle: &O,
    subset: &[OrderIdx],
) -> Option<RouteCandidate> {
    subset
        .iter()
        .copied()
        .permutations(subset.len())
        .filter_map(|ordering| oracle.check(&RouteQuery::new(problem, &ordering)).ok())
        .min_by(|a, b| a.ranking_cmp(b))
}
