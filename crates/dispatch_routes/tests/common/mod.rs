#![allow(dead_code)]

use dispatch_routes::{
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
use itertools::Itertools;

pub const HAND_IN_TIME: Minutes = 2;

/// Orders on a line with the shop at `shop_position`; travel time is the
/// distance.
pub fn line_problem(
    windows: &[TimeWindow],
    positions: &[Minutes],
    shop_position: Minutes,
    loop_mode: LoopMode,
    calc_time: Minutes,
) -> DispatchProblem {
    assert_eq!(windows.len(), positions.len());

    let all_positions = positions
        .iter()
        .copied()
        .chain(std::iter::once(shop_position))
        .collect::<Vec<_>>();
    let geo_matrix = GeoMatrix::from_rows(
        all_positions
            .iter()
            .map(|from| all_positions.iter().map(|to| (from - to).abs()).collect())
            .collect(),
    )
    .unwrap();

    let orders = windows
        .iter()
        .enumerate()
        .map(|(index, window)| {
            let mut builder = OrderBuilder::default();
            builder
                .set_external_id(format!("order-{index}"))
                .set_location_id(index)
                .set_time_window(*window);
            builder.build().unwrap()
        })
        .collect();

    let mut vehicle = VehicleBuilder::default();
    vehicle
        .set_vehicle_id(String::from("vehicle"))
        .set_loop_mode(loop_mode)
        .set_hand_in_time(HAND_IN_TIME);

    let mut builder = DispatchProblemBuilder::default();
    builder
        .set_orders(orders)
        .set_geo_matrix(geo_matrix)
        .set_shop(Shop::new(String::from("shop"), positions.len()))
        .set_vehicle(vehicle.build().unwrap())
        .set_calc_time(calc_time);
    builder.build().unwrap()
}

/// A mixed pool: some tight windows, some open, spread over 0..40.
pub fn mixed_problem(num_orders: usize) -> DispatchProblem {
    let windows = (0..num_orders)
        .map(|index| match index % 3 {
            0 => TimeWindow::new(0, 45),
            1 => TimeWindow::new(10 + index as Minutes, 70),
            _ => TimeWindow::UNBOUNDED,
        })
        .collect::<Vec<_>>();
    let positions = (0..num_orders)
        .map(|index| ((index * 7) % 41) as Minutes)
        .collect::<Vec<_>>();

    line_problem(&windows, &positions, 20, LoopMode::RoundTrip, 0)
}

pub fn order_indices(indices: &[usize]) -> Vec<OrderIdx> {
    indices.iter().copied().map(OrderIdx::new).collect()
}

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
