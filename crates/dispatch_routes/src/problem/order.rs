use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::define_index_newtype;

use super::{error::ProblemBuildError, time_window::TimeWindow};

define_index_newtype!(OrderIdx, Order);

/// A pending delivery of the shop.
///
/// The order's position in the pool is its [`OrderIdx`], which also addresses
/// its row and column in the [`GeoMatrix`](super::geo_matrix::GeoMatrix).
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq, Eq)]
pub struct Order {
    external_id: String,
    location_id: usize,
    time_window: TimeWindow,
    demand: u32,
}

impl Order {
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn location_id(&self) -> usize {
        self.location_id
    }

    pub fn time_window(&self) -> &TimeWindow {
        &self.time_window
    }

    pub fn demand(&self) -> u32 {
        self.demand
    }
}

#[derive(Default)]
pub struct OrderBuilder {
    external_id: Option<String>,
    location_id: Option<usize>,
    time_window: Option<TimeWindow>,
    demand: Option<u32>,
}

impl OrderBuilder {
    pub fn set_external_id(&mut self, external_id: String) -> &mut OrderBuilder {
        self.external_id = Some(external_id);
        self
    }

    pub fn set_location_id(&mut self, location_id: usize) -> &mut OrderBuilder {
        self.location_id = Some(location_id);
        self
    }

    pub fn set_time_window(&mut self, time_window: TimeWindow) -> &mut OrderBuilder {
        self.time_window = Some(time_window);
        self
    }

    pub fn set_demand(&mut self, demand: u32) -> &mut OrderBuilder {
        self.demand = Some(demand);
        self
    }

    pub fn build(self) -> Result<Order, ProblemBuildError> {
        Ok(Order {
            external_id: self
                .external_id
                .ok_or(ProblemBuildError::MissingField("order.external_id"))?,
            location_id: self
                .location_id
                .ok_or(ProblemBuildError::MissingField("order.location_id"))?,
            time_window: self.time_window.unwrap_or(TimeWindow::UNBOUNDED),
            demand: self.demand.unwrap_or(1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let mut builder = OrderBuilder::default();
        builder
            .set_external_id(String::from("order_1"))
            .set_location_id(42)
            .set_time_window(TimeWindow::new(10, 20));

        let order = builder.build().unwrap();

        assert_eq!(order.external_id(), "order_1");
        assert_eq!(order.location_id(), 42);
        assert_eq!(order.time_window(), &TimeWindow::new(10, 20));
        assert_eq!(order.demand(), 1);
    }

    #[test]
    fn test_builder_requires_location() {
        let mut builder = OrderBuilder::default();
        builder.set_external_id(String::from("order_1"));

        assert_eq!(
            builder.build(),
            Err(ProblemBuildError::MissingField("order.location_id"))
        );
    }
}
