use super::{
    error::ProblemBuildError,
    geo_matrix::{GeoIdx, GeoMatrix},
    order::{Order, OrderIdx},
    shop::Shop,
    time_window::Minutes,
    vehicle::Vehicle,
};

/// Read-only inputs of one route enumeration call.
#[derive(Debug, Clone)]
pub struct DispatchProblem {
    orders: Vec<Order>,
    geo_matrix: GeoMatrix,
    shop: Shop,
    vehicle: Vehicle,
    calc_time: Minutes,
}

impl DispatchProblem {
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn order(&self, index: OrderIdx) -> &Order {
        &self.orders[index]
    }

    pub fn num_orders(&self) -> usize {
        self.orders.len()
    }

    pub fn geo_matrix(&self) -> &GeoMatrix {
        &self.geo_matrix
    }

    pub fn shop(&self) -> &Shop {
        &self.shop
    }

    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    /// The earliest possible departure from the shop.
    pub fn calc_time(&self) -> Minutes {
        self.calc_time
    }

    #[inline(always)]
    pub fn geo_idx(&self, order: OrderIdx) -> GeoIdx {
        GeoIdx::new(order.get())
    }

    #[inline(always)]
    pub fn shop_geo_idx(&self) -> GeoIdx {
        GeoIdx::new(self.orders.len())
    }

    #[inline(always)]
    pub fn travel_time(&self, from: GeoIdx, to: GeoIdx) -> Minutes {
        self.geo_matrix.travel_time(from, to)
    }

    /// `true` when the matrix has exactly one row per order plus the shop.
    pub fn has_consistent_geo_matrix(&self) -> bool {
        self.geo_matrix.num_locations() == self.orders.len() + 1
    }
}

#[derive(Default)]
pub struct DispatchProblemBuilder {
    orders: Option<Vec<Order>>,
    geo_matrix: Option<GeoMatrix>,
    shop: Option<Shop>,
    vehicle: Option<Vehicle>,
    calc_time: Option<Minutes>,
}

impl DispatchProblemBuilder {
    pub fn set_orders(&mut self, orders: Vec<Order>) -> &mut DispatchProblemBuilder {
        self.orders = Some(orders);
        self
    }

    pub fn set_geo_matrix(&mut self, geo_matrix: GeoMatrix) -> &mut DispatchProblemBuilder {
        self.geo_matrix = Some(geo_matrix);
        self
    }

    pub fn set_shop(&mut self, shop: Shop) -> &mut DispatchProblemBuilder {
        self.shop = Some(shop);
        self
    }

    pub fn set_vehicle(&mut self, vehicle: Vehicle) -> &mut DispatchProblemBuilder {
        self.vehicle = Some(vehicle);
        self
    }

    pub fn set_calc_time(&mut self, calc_time: Minutes) -> &mut DispatchProblemBuilder {
        self.calc_time = Some(calc_time);
        self
    }

    /// Assembles the problem. The pool size is not checked against the
    /// matrix here; the search reports that as invalid input.
    pub fn build(self) -> Result<DispatchProblem, ProblemBuildError> {
        Ok(DispatchProblem {
            orders: self.orders.unwrap_or_default(),
            geo_matrix: self
                .geo_matrix
                .ok_or(ProblemBuildError::MissingField("geo_matrix"))?,
            shop: self.shop.ok_or(ProblemBuildError::MissingField("shop"))?,
            vehicle: self
                .vehicle
                .ok_or(ProblemBuildError::MissingField("vehicle"))?,
            calc_time: self.calc_time.unwrap_or(0),
        })
    }
}
