//! Error types for FleetForge core data

use thiserror::Error;

/// Errors raised while validating instance or fleet data.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    /// A vehicle has a cost that is zero, negative or not a number.
    #[error("vehicle {index} ({name}) has non-positive cost {cost}")]
    NonPositiveCost {
        index: usize,
        name: String,
        cost: f64,
    },

    /// A node's energy profile does not cover every time instance.
    #[error("node {name} has {actual} energy values, expected {expected}")]
    ProfileLength {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// The time grid cannot support the throughput model.
    #[error("invalid time grid: {0}")]
    TimeGrid(String),

    /// Number of throughput values does not match the vehicle count.
    #[error("expected {expected} throughput values, got {actual}")]
    ThroughputCount { expected: usize, actual: usize },
}

/// Result type alias for FleetForge core operations
pub type Result<T> = std::result::Result<T, CoreError>;
