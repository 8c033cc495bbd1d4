//! Canonical identifiers for unordered sets of orders.
//!
//! Two encodings exist. [`BitmaskKey`] sets bit `i` for order `i` and only
//! works for pools of at most [`BITMASK_POOL_LIMIT`] orders. [`SortedTupleKey`]
//! stores the ascending indices padded with a sentinel and supports pools of
//! up to [`SORTED_TUPLE_POOL_LIMIT`] orders. Both are value types: equal index
//! sets encode to equal keys whatever the order they were discovered in.

use std::{fmt::Debug, hash::Hash};

use serde::Serialize;
use thiserror::Error;

use crate::{oracle::route_candidate::Stops, problem::order::OrderIdx};

mod bitmask_key;
mod sorted_tuple_key;

pub use bitmask_key::{BITMASK_POOL_LIMIT, BitmaskKey};
pub use sorted_tuple_key::{SENTINEL, SORTED_TUPLE_POOL_LIMIT, SortedTupleKey};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("Subset of {0} orders cannot be encoded")]
    InvalidLength(usize),
    #[error("Order index {index} does not fit an encoding limited to {limit} orders")]
    IndexOutOfRange { index: usize, limit: usize },
    #[error("Order index {0} appears twice in the subset")]
    DuplicateIndex(usize),
}

pub trait SubsetKeyEncoding:
    Copy + Eq + Ord + Hash + Debug + Send + Sync + 'static
{
    fn encode(stops: &[OrderIdx]) -> Result<Self, KeyError>;

    /// The subset's order indices, ascending.
    fn decode(&self) -> Stops;

    fn into_subset_key(self) -> SubsetKey;
}

/// A subset key in whichever encoding the search selected.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SubsetKey {
    Bitmask(BitmaskKey),
    SortedTuple(SortedTupleKey),
}

impl SubsetKey {
    pub fn orders(&self) -> Stops {
        match self {
            SubsetKey::Bitmask(key) => key.decode(),
            SubsetKey::SortedTuple(key) => key.decode(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SubsetKey::Bitmask(key) => key.len(),
            SubsetKey::SortedTuple(key) => key.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn check_length(stops: &[OrderIdx]) -> Result<(), KeyError> {
    if stops.is_empty() || stops.len() > crate::oracle::route_candidate::MAX_ROUTE_LENGTH {
        return Err(KeyError::InvalidLength(stops.len()));
    }
    Ok(())
}
