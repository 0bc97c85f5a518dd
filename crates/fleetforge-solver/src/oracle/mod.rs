//! Feasibility oracle contract.
//!
//! The oracle answers whether a vehicle subset makes the underlying energy
//! routing model feasible within a time limit. Building and solving that
//! model happens entirely behind [`FeasibilityOracle`]; the search only
//! sees the status, the runtime and an opaque warm-start hint.

mod evaluator;

use std::fmt;
use std::time::Duration;

use fleetforge_core::VehicleId;
use thiserror::Error;

pub use evaluator::{Evaluation, Evaluator};

/// Answer of a single oracle call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OracleStatus {
    Feasible,
    Infeasible,
    /// The time limit was hit before feasibility was decided.
    Timeout,
}

impl OracleStatus {
    pub fn is_feasible(self) -> bool {
        self == OracleStatus::Feasible
    }
}

impl fmt::Display for OracleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OracleStatus::Feasible => "FEASIBLE",
            OracleStatus::Infeasible => "INFEASIBLE",
            OracleStatus::Timeout => "TIMEOUT",
        })
    }
}

/// Result of a completed oracle call.
#[derive(Debug, Clone, PartialEq)]
pub struct OracleOutcome<H> {
    pub status: OracleStatus,
    /// Wall-clock time the oracle spent.
    pub runtime: Duration,
    /// Solution usable as warm start for the next call.
    pub solution: Option<H>,
}

impl<H> OracleOutcome<H> {
    pub fn new(status: OracleStatus, runtime: Duration) -> Self {
        Self {
            status,
            runtime,
            solution: None,
        }
    }

    pub fn with_solution(mut self, solution: H) -> Self {
        self.solution = Some(solution);
        self
    }
}

/// Failure of the oracle itself, as opposed to an infeasible answer.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("feasibility oracle failed: {0}")]
    Failed(String),

    #[error("feasibility oracle failed: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// External feasibility check for a vehicle subset.
///
/// Calls block until the oracle answers; the oracle enforces `time_limit`
/// itself. A warm start that does not fit the new subset must be ignored
/// by the oracle, not rejected.
pub trait FeasibilityOracle {
    /// Opaque warm-start data produced by feasible calls.
    type Hint;

    /// Decides feasibility of `vehicles`.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError`] if the oracle could not produce an answer.
    fn solve(
        &mut self,
        vehicles: &[VehicleId],
        time_limit: Duration,
        warm_start: Option<&Self::Hint>,
    ) -> Result<OracleOutcome<Self::Hint>, OracleError>;
}

impl<O: FeasibilityOracle + ?Sized> FeasibilityOracle for &mut O {
    type Hint = O::Hint;

    fn solve(
        &mut self,
        vehicles: &[VehicleId],
        time_limit: Duration,
        warm_start: Option<&Self::Hint>,
    ) -> Result<OracleOutcome<Self::Hint>, OracleError> {
        (**self).solve(vehicles, time_limit, warm_start)
    }
}
