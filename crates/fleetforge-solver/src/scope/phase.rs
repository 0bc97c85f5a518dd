//! Phase-level scope.

use std::time::{Duration, Instant};

use fleetforge_core::{Fleet, VehicleId};

use super::{SolverScope, Trial};
use crate::error::SearchError;
use crate::oracle::FeasibilityOracle;
use crate::state::SearchState;

/// Scope for a single phase of the search.
///
/// # Type Parameters
/// * `'a` - Lifetime of the solver scope reference
/// * `'f` - Lifetime of the fleet snapshot
/// * `O` - The feasibility oracle
pub struct PhaseScope<'a, 'f, O: FeasibilityOracle> {
    solver_scope: &'a mut SolverScope<'f, O>,
    phase_name: &'static str,
    start_time: Instant,
    oracle_calls: u64,
}

impl<'a, 'f, O: FeasibilityOracle> PhaseScope<'a, 'f, O> {
    pub fn new(solver_scope: &'a mut SolverScope<'f, O>, phase_name: &'static str) -> Self {
        Self {
            solver_scope,
            phase_name,
            start_time: Instant::now(),
            oracle_calls: 0,
        }
    }

    pub fn phase_name(&self) -> &'static str {
        self.phase_name
    }

    /// Time since the phase started.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Oracle calls made by this phase, blacklist hits excluded.
    pub fn oracle_calls(&self) -> u64 {
        self.oracle_calls
    }

    pub fn fleet(&self) -> &'f Fleet {
        self.solver_scope.fleet()
    }

    pub fn solver_scope(&self) -> &SolverScope<'f, O> {
        self.solver_scope
    }

    pub fn solver_scope_mut(&mut self) -> &mut SolverScope<'f, O> {
        self.solver_scope
    }

    /// See [`SolverScope::try_fleet`].
    pub fn try_fleet(
        &mut self,
        vehicles: &[VehicleId],
        time_limit: Duration,
    ) -> Result<Trial, SearchError> {
        let before = self.solver_scope.statistics().iterations;
        let trial = self.solver_scope.try_fleet(vehicles, time_limit);
        self.oracle_calls += self.solver_scope.statistics().iterations - before;
        trial
    }

    /// Publishes the current fleet to the streaming consumer.
    pub fn publish(&self, state: &SearchState) {
        self.solver_scope.publish(state.snapshot());
    }
}
