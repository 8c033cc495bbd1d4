use serde::Serialize;
use thiserror::Error;

use crate::keys::KeyError;

/// Coarse outcome reported to the caller of a slice.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    Ok,
    InvalidInput,
    InternalError,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),
    #[error("Internal failure: {0}")]
    Internal(#[from] InternalFailure),
}

impl SearchError {
    pub fn status(&self) -> SearchStatus {
        match self {
            SearchError::InvalidInput(_) => SearchStatus::InvalidInput,
            SearchError::Internal(_) => SearchStatus::InternalError,
        }
    }

    pub fn diagnostic_code(&self) -> u16 {
        match self {
            SearchError::InvalidInput(error) => error.diagnostic_code(),
            SearchError::Internal(error) => error.diagnostic_code(),
        }
    }
}

/// Malformed call parameters. Detected before any search work starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidInput {
    #[error("Order pool is empty")]
    EmptyOrderPool,
    #[error("Slice stride must be positive")]
    ZeroStride,
    #[error("Slice start index {start_index} is outside the pool of {pool_size} orders")]
    StartIndexOutOfRange {
        start_index: usize,
        pool_size: usize,
    },
    #[error("Route length limit {0} is outside 1..=8")]
    LevelOutOfRange(usize),
    #[error("Pool of {pool_size} orders exceeds the bitmask limit of {limit}")]
    PoolTooLargeForBitmask { pool_size: usize, limit: usize },
    #[error("Geo matrix has {actual} locations, expected {expected} (orders plus shop)")]
    MatrixDimensionMismatch { expected: usize, actual: usize },
    #[error("Pool of {pool_size} orders exceeds the sorted tuple limit of {limit}")]
    PoolTooLargeForSortedTuple { pool_size: usize, limit: usize },
}

impl InvalidInput {
    pub fn diagnostic_code(&self) -> u16 {
        match self {
            InvalidInput::EmptyOrderPool => 101,
            InvalidInput::ZeroStride => 102,
            InvalidInput::StartIndexOutOfRange { .. } => 103,
            InvalidInput::LevelOutOfRange(_) => 104,
            InvalidInput::PoolTooLargeForBitmask { .. } => 105,
            InvalidInput::MatrixDimensionMismatch { .. } => 106,
            InvalidInput::PoolTooLargeForSortedTuple { .. } => 107,
        }
    }
}

/// Unexpected faults during a search. A slice that hits one discards its
/// partial table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InternalFailure {
    #[error("Subset key error: {0}")]
    Key(#[from] KeyError),
    #[error("Subset key is outside the table's key domain")]
    KeyOutsideDomain,
    #[error("Elapsed time overflowed while extending a route")]
    ElapsedOverflow,
    #[error("Failed to build the worker thread pool: {0}")]
    ThreadPool(String),
    #[error("Worker panicked: {0}")]
    Panicked(String),
}

impl InternalFailure {
    pub fn diagnostic_code(&self) -> u16 {
        match self {
            InternalFailure::Key(KeyError::InvalidLength(_)) => 201,
            InternalFailure::Key(KeyError::IndexOutOfRange { .. }) => 202,
            InternalFailure::Key(KeyError::DuplicateIndex(_)) => 203,
            InternalFailure::KeyOutsideDomain => 204,
            InternalFailure::ElapsedOverflow => 205,
            InternalFailure::ThreadPool(_) => 206,
            InternalFailure::Panicked(_) => 207,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_and_codes() {
        let invalid = SearchError::from(InvalidInput::ZeroStride);
        assert_eq!(invalid.status(), SearchStatus::InvalidInput);
        assert_eq!(invalid.diagnostic_code(), 102);

        let internal = SearchError::from(InternalFailure::from(KeyError::DuplicateIndex(3)));
        assert_eq!(internal.status(), SearchStatus::InternalError);
        assert_eq!(internal.diagnostic_code(), 203);
    }
}
