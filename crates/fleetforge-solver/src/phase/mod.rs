//! Search phases
//!
//! - [`BisectionInit`](bisection::BisectionInit): shortest feasible
//!   score-ordered prefix by binary search
//! - [`GreedyInit`](greedy::GreedyInit): energy-balance estimate, then grow
//!   or shrink one vehicle at a time
//! - [`RemovalPhase`](removal::RemovalPhase): drop single vehicles
//! - [`SwitchPhase`](switch::SwitchPhase): replace `k` vehicles by up to
//!   three cheaper unused ones

pub mod bisection;
pub mod greedy;
pub mod removal;
pub mod switch;

use std::fmt::Debug;

use crate::error::SearchError;
use crate::oracle::FeasibilityOracle;
use crate::scope::SolverScope;
use crate::state::SearchState;

/// What an improvement phase achieved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseOutcome {
    /// At least one change was accepted.
    pub set_changed: bool,
    /// The last pass found nothing left to submit to the oracle.
    pub no_options_left: bool,
    /// A termination condition stopped the phase.
    pub terminated_early: bool,
}

impl PhaseOutcome {
    /// True if running the phase again on the same state cannot help.
    pub fn is_exhausted(&self) -> bool {
        self.no_options_left && !self.set_changed
    }
}

/// An improvement phase working on the current fleet.
///
/// # Type Parameters
/// * `O` - The feasibility oracle
pub trait Phase<O: FeasibilityOracle>: Debug {
    /// Runs the phase, updating `state` in place with every accepted change.
    ///
    /// # Errors
    ///
    /// Only oracle failures end a phase with an error.
    fn solve(
        &mut self,
        state: &mut SearchState,
        solver_scope: &mut SolverScope<'_, O>,
    ) -> Result<PhaseOutcome, SearchError>;

    /// Returns the name of this phase type.
    fn phase_type_name(&self) -> &'static str;
}

/// A phase producing the first feasible fleet.
pub trait InitPhase<O: FeasibilityOracle>: Debug {
    /// Finds a feasible fleet.
    ///
    /// # Errors
    ///
    /// Fails if the pool cannot yield a feasible fleet or the oracle fails.
    fn initialize(&mut self, solver_scope: &mut SolverScope<'_, O>) -> Result<SearchState, SearchError>;

    /// Returns the name of this phase type.
    fn phase_type_name(&self) -> &'static str;
}
