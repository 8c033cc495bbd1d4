use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{error::ProblemBuildError, time_window::Minutes};

/// Whether a route ends back at the shop or at its last delivery.
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LoopMode {
    #[default]
    RoundTrip,
    OneWay,
}

/// The candidate vehicle the routes are computed for.
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq, Eq)]
pub struct Vehicle {
    external_id: String,
    loop_mode: LoopMode,
    /// Minutes spent at each stop handing the order over.
    hand_in_time: Minutes,
    capacity: Option<u32>,
}

impl Vehicle {
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }

    pub fn should_return_to_shop(&self) -> bool {
        self.loop_mode == LoopMode::RoundTrip
    }

    pub fn hand_in_time(&self) -> Minutes {
        self.hand_in_time
    }

    pub fn capacity(&self) -> Option<u32> {
        self.capacity
    }

    pub fn fits(&self, load: u32) -> bool {
        self.capacity.is_none_or(|capacity| load <= capacity)
    }
}

#[derive(Default)]
pub struct VehicleBuilder {
    external_id: Option<String>,
    loop_mode: Option<LoopMode>,
    hand_in_time: Option<Minutes>,
    capacity: Option<u32>,
}

impl VehicleBuilder {
    pub fn set_vehicle_id(&mut self, external_id: String) -> &mut VehicleBuilder {
        self.external_id = Some(external_id);
        self
    }

    pub fn set_loop_mode(&mut self, loop_mode: LoopMode) -> &mut VehicleBuilder {
        self.loop_mode = Some(loop_mode);
        self
    }

    pub fn set_hand_in_time(&mut self, hand_in_time: Minutes) -> &mut VehicleBuilder {
        self.hand_in_time = Some(hand_in_time);
        self
    }

    pub fn set_capacity(&mut self, capacity: u32) -> &mut VehicleBuilder {
        self.capacity = Some(capacity);
        self
    }

    pub fn build(self) -> Result<Vehicle, ProblemBuildError> {
        Ok(Vehicle {
            external_id: self
                .external_id
                .ok_or(ProblemBuildError::MissingField("vehicle.external_id"))?,
            loop_mode: self.loop_mode.unwrap_or_default(),
            hand_in_time: self.hand_in_time.unwrap_or(0),
            capacity: self.capacity,
        })
    }
}
