//! Statistics-keeping oracle adapter.

use std::time::Duration;

use fleetforge_core::VehicleId;

use super::{FeasibilityOracle, OracleError, OracleStatus};
use crate::statistics::SearchStatistics;

/// Status and runtime of an evaluated vehicle set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub status: OracleStatus,
    pub runtime: Duration,
}

impl Evaluation {
    pub fn is_feasible(&self) -> bool {
        self.status.is_feasible()
    }
}

/// Wraps an oracle, forwarding the latest feasible warm start and
/// recording every call in [`SearchStatistics`].
///
/// The evaluator keeps no budget of its own: each call uses exactly the
/// time limit it is given.
pub struct Evaluator<O: FeasibilityOracle> {
    oracle: O,
    warm_start: Option<O::Hint>,
    statistics: SearchStatistics,
}

impl<O: FeasibilityOracle> Evaluator<O> {
    pub fn new(oracle: O) -> Self {
        Self {
            oracle,
            warm_start: None,
            statistics: SearchStatistics::default(),
        }
    }

    /// Calls the oracle for `vehicles`.
    ///
    /// A feasible answer replaces the stored warm start with the returned
    /// solution; other answers leave it untouched.
    ///
    /// # Errors
    ///
    /// Propagates the oracle's error after counting the call.
    pub fn evaluate(
        &mut self,
        vehicles: &[VehicleId],
        time_limit: Duration,
    ) -> Result<Evaluation, OracleError> {
        self.statistics.iterations += 1;
        let outcome = match self
            .oracle
            .solve(vehicles, time_limit, self.warm_start.as_ref())
        {
            Ok(outcome) => outcome,
            Err(err) => {
                self.statistics.oracle_errors += 1;
                return Err(err);
            }
        };

        self.statistics.record(outcome.status, outcome.runtime);
        if outcome.status.is_feasible() {
            self.warm_start = outcome.solution;
        }

        Ok(Evaluation {
            status: outcome.status,
            runtime: outcome.runtime,
        })
    }

    pub fn warm_start(&self) -> Option<&O::Hint> {
        self.warm_start.as_ref()
    }

    pub fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    pub fn statistics_mut(&mut self) -> &mut SearchStatistics {
        &mut self.statistics
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn into_oracle(self) -> O {
        self.oracle
    }
}

impl<O: FeasibilityOracle> std::fmt::Debug for Evaluator<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Evaluator")
            .field("has_warm_start", &self.warm_start.is_some())
            .field("statistics", &self.statistics)
            .finish()
    }
}
