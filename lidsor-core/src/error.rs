//! Error types for LIDSOR

use thiserror::Error;

/// Main error type for LIDSOR operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid shape: expected {expected_columns} columns per point, found {found}")]
    InvalidShape {
        expected_columns: usize,
        found: usize,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Insufficient neighbors: requested k = {requested} but only {available} points are indexed")]
    InsufficientNeighbors {
        requested: usize,
        available: usize,
    },

    #[error("Algorithm error: {0}")]
    Algorithm(String),
}

/// Result type alias for LIDSOR operations
pub type Result<T> = std::result::Result<T, Error>;
