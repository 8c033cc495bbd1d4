use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The origin every route departs from.
///
/// The shop does not carry its own geo index: it is always the last row and
/// column of the geo matrix.
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq, Eq)]
pub struct Shop {
    external_id: String,
    location_id: usize,
}

impl Shop {
    pub fn new(external_id: String, location_id: usize) -> Self {
        Shop {
            external_id,
            location_id,
        }
    }

    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn location_id(&self) -> usize {
        self.location_id
    }
}
