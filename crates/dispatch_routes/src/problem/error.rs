use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProblemBuildError {
    #[error("Missing required field {0}")]
    MissingField(&'static str),
    #[error("Geo matrix error: {0}")]
    GeoMatrix(#[from] GeoMatrixError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeoMatrixError {
    #[error("Geo matrix is empty")]
    Empty,
    #[error("Geo matrix row {row} has {len} columns, expected {expected}")]
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[error("Geo matrix contains a negative travel time at ({from}, {to})")]
    NegativeTravelTime { from: usize, to: usize },
}
