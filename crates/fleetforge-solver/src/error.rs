//! Error types for the fleet search

use thiserror::Error;

use crate::oracle::{OracleError, OracleStatus};

/// Conditions that end a fleet search without a result.
///
/// Every other non-feasible outcome is absorbed by the phases and only
/// shows up in statistics and logs.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The whole vehicle pool is not feasible, so no subset can be.
    #[error("full fleet is not feasible (oracle answered {status}); the instance is infeasible")]
    FullFleetInfeasible { status: OracleStatus },

    /// Greedy initialization added every vehicle without reaching feasibility.
    #[error("vehicle pool exhausted after {tried} vehicles without a feasible fleet")]
    PoolExhausted { tried: usize },

    /// There are no vehicles to search over.
    #[error("vehicle pool is empty")]
    EmptyFleet,

    /// The oracle failed instead of answering.
    #[error(transparent)]
    Oracle(#[from] OracleError),

    /// The configuration could not be used.
    #[error("invalid configuration: {0}")]
    Config(#[from] fleetforge_config::ConfigError),
}

impl SearchError {
    /// Returns true if the base instance was shown to have no feasible fleet.
    pub fn is_infeasible_instance(&self) -> bool {
        matches!(
            self,
            SearchError::FullFleetInfeasible { .. } | SearchError::PoolExhausted { .. }
        )
    }
}
