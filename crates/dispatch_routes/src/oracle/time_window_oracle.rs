use crate::problem::{
    time_window::{Minutes, TimeWindow},
    vehicle::Vehicle,
};

use super::{
    feasibility_oracle::{FeasibilityOracle, Rejection, RouteExtension, RouteQuery},
    route_candidate::{Cost, ElapsedTimes, RouteCandidate},
};

/// Reference oracle for courier routes with hard delivery windows.
///
/// The courier leaves the shop at a single departure time and never waits:
/// arrival at a stop is departure plus the elapsed driving and hand-in time,
/// and it must fall inside the order's window. Departure is never earlier than
/// the calculation time. The summed demand must fit the vehicle's capacity.
/// The cost is the route duration, including the drive back to the shop for
/// round trips.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimeWindowOracle;

impl TimeWindowOracle {
    pub const EMPTY_ROUTE: Rejection = Rejection::new(1);
    pub const TIME_WINDOW: Rejection = Rejection::new(2);
    pub const CAPACITY: Rejection = Rejection::new(3);

    fn route_cost(vehicle: &Vehicle, last_elapsed: Cost, travel_to_terminus: Cost) -> Cost {
        let at_last_stop = last_elapsed.saturating_add(vehicle.hand_in_time());
        if vehicle.should_return_to_shop() {
            at_last_stop.saturating_add(travel_to_terminus)
        } else {
            at_last_stop
        }
    }
}

impl FeasibilityOracle for TimeWindowOracle {
    fn check(&self, query: &RouteQuery<'_>) -> Result<RouteCandidate, Rejection> {
        let Some(shop) = query.terminus() else {
            return Err(Self::EMPTY_ROUTE);
        };
        if query.stops.is_empty() {
            return Err(Self::EMPTY_ROUTE);
        }

        let hand_in_time = query.vehicle.hand_in_time();
        let mut interval = TimeWindow::starting_at(query.calc_time);
        let mut elapsed = ElapsedTimes::new();
        let mut load: u32 = 0;
        let mut previous = shop;
        let mut at: Minutes = 0;

        for (position, order) in query.orders.iter().enumerate() {
            let current = query.geo_indices[position];
            let travel = query.geo_matrix.travel_time(previous, current);
            let arrival = if position == 0 {
                travel
            } else {
                at.saturating_add(hand_in_time).saturating_add(travel)
            };

            interval = interval.intersect(&order.time_window().shift(-arrival));
            if interval.is_empty() {
                return Err(Self::TIME_WINDOW);
            }

            load = load.saturating_add(order.demand());
            if !query.vehicle.fits(load) {
                return Err(Self::CAPACITY);
            }

            elapsed.push(arrival);
            at = arrival;
            previous = current;
        }

        let cost = Self::route_cost(
            query.vehicle,
            at,
            query.geo_matrix.travel_time(previous, shop),
        );

        Ok(RouteCandidate::new(
            query.stops.iter().copied().collect(),
            cost,
            interval,
            elapsed,
            load,
        ))
    }

    fn check_incremental(
        &self,
        extension: &RouteExtension<'_>,
    ) -> Result<RouteCandidate, Rejection> {
        let predecessor = extension.predecessor;
        let Some(previous_elapsed) = predecessor.last_elapsed() else {
            return Err(Self::EMPTY_ROUTE);
        };

        let arrival = previous_elapsed
            .saturating_add(extension.vehicle.hand_in_time())
            .saturating_add(extension.travel_from_previous);

        let interval = extension
            .admissible
            .intersect(predecessor.feasible_interval())
            .intersect(&extension.next_order.time_window().shift(-arrival));
        if interval.is_empty() {
            return Err(Self::TIME_WINDOW);
        }

        let load = predecessor
            .load()
            .saturating_add(extension.next_order.demand());
        if !extension.vehicle.fits(load) {
            return Err(Self::CAPACITY);
        }

        let cost = Self::route_cost(extension.vehicle, arrival, extension.travel_to_terminus);

        Ok(predecessor.extended(extension.next, arrival, cost, interval, load))
    }
}
