use jiff::{SignedDuration, Timestamp};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    oracle::route_candidate::Cost,
    problem::{
        dispatch_problem::{DispatchProblem, DispatchProblemBuilder},
        error::ProblemBuildError,
        geo_matrix::GeoMatrix,
        order::OrderBuilder,
        shop::Shop,
        time_window::{Minutes, TimeWindowBuilder, minutes_from_timestamp, timestamp_from_minutes},
        vehicle::{LoopMode, VehicleBuilder},
    },
    table::{BestRoute, BestRouteTable},
};

pub trait FromProblem<T> {
    fn from_problem(value: T, problem: &DispatchProblem) -> Self;
}

/// A shop's pending orders and the vehicle to plan them for.
///
/// `travel_times` is the square minutes matrix over the orders, in order, with
/// the shop as last row and column.
#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "DispatchProblem")]
pub struct JsonDispatchProblem {
    pub id: Option<String>,
    pub calc_time: Timestamp,
    pub shop: JsonShop,
    pub vehicle: JsonVehicle,
    pub orders: Vec<JsonOrder>,
    pub travel_times: Vec<Vec<Minutes>>,
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "Shop")]
pub struct JsonShop {
    pub id: String,
    pub location_id: usize,
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "Vehicle")]
pub struct JsonVehicle {
    pub id: String,
    pub loop_mode: Option<LoopMode>,
    pub hand_in_time: Option<SignedDuration>,
    pub capacity: Option<u32>,
}

#[derive(Serialize, Deserialize, JsonSchema, Default)]
#[serde(deny_unknown_fields, rename = "TimeWindow")]
pub struct JsonTimeWindow {
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "Order")]
pub struct JsonOrder {
    pub id: String,
    pub location_id: usize,
    #[serde(default)]
    pub time_window: JsonTimeWindow,
    pub demand: Option<u32>,
}

impl JsonDispatchProblem {
    #[instrument(skip_all, level = "debug")]
    pub fn build_problem(self) -> Result<DispatchProblem, ProblemBuildError> {
        let orders = self
            .orders
            .into_iter()
            .map(|order| {
                let mut time_window = TimeWindowBuilder::default();
                if let Some(start) = order.time_window.start {
                    time_window = time_window.with_start(minutes_from_timestamp(start));
                }
                if let Some(end) = order.time_window.end {
                    time_window = time_window.with_end(minutes_from_timestamp(end));
                }

                let mut builder = OrderBuilder::default();
                builder
                    .set_external_id(order.id)
                    .set_location_id(order.location_id)
                    .set_time_window(time_window.build());

                if let Some(demand) = order.demand {
                    builder.set_demand(demand);
                }

                builder.build()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut vehicle = VehicleBuilder::default();
        vehicle.set_vehicle_id(self.vehicle.id);

        if let Some(loop_mode) = self.vehicle.loop_mode {
            vehicle.set_loop_mode(loop_mode);
        }

        if let Some(hand_in_time) = self.vehicle.hand_in_time {
            vehicle.set_hand_in_time(hand_in_time.as_mins());
        }

        if let Some(capacity) = self.vehicle.capacity {
            vehicle.set_capacity(capacity);
        }

        let mut builder = DispatchProblemBuilder::default();
        builder
            .set_orders(orders)
            .set_geo_matrix(GeoMatrix::from_rows(self.travel_times)?)
            .set_shop(Shop::new(self.shop.id, self.shop.location_id))
            .set_vehicle(vehicle.build()?)
            .set_calc_time(minutes_from_timestamp(self.calc_time));

        builder.build()
    }
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq, Eq)]
#[serde(rename = "BestRoute")]
pub struct JsonBestRoute {
    /// External ids of the orders in delivery sequence
    pub order_ids: Vec<String>,
    /// Pool indices of the orders in delivery sequence
    pub stops: Vec<usize>,
    pub cost: Cost,
    pub earliest_departure: Option<Timestamp>,
    /// Absent when the route can leave at any later time
    pub latest_departure: Option<Timestamp>,
}

impl FromProblem<&BestRoute> for JsonBestRoute {
    fn from_problem(value: &BestRoute, problem: &DispatchProblem) -> Self {
        let route = &value.route;
        let interval = route.feasible_interval();
        JsonBestRoute {
            order_ids: route
                .stops()
                .iter()
                .map(|&stop| problem.order(stop).external_id().to_owned())
                .collect(),
            stops: route.stops().iter().map(|stop| stop.get()).collect(),
            cost: route.cost(),
            earliest_departure: timestamp_from_minutes(interval.start()),
            latest_departure: timestamp_from_minutes(interval.end()),
        }
    }
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq, Eq)]
#[serde(rename = "BestRouteTable")]
pub struct JsonBestRouteTable {
    pub vehicle_id: String,
    pub routes: Vec<JsonBestRoute>,
}

impl FromProblem<&BestRouteTable> for JsonBestRouteTable {
    fn from_problem(value: &BestRouteTable, problem: &DispatchProblem) -> Self {
        JsonBestRouteTable {
            vehicle_id: problem.vehicle().external_id().to_owned(),
            routes: value
                .iter()
                .map(|entry| JsonBestRoute::from_problem(entry, problem))
                .collect(),
        }
    }
}
