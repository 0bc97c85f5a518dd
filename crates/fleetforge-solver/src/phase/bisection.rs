//! Bisection initialization.

use std::time::Duration;

use fleetforge_config::FleetConfig;
use tracing::{debug, info};

use super::InitPhase;
use crate::error::SearchError;
use crate::oracle::{FeasibilityOracle, OracleStatus};
use crate::scope::{PhaseScope, SolverScope, Trial};
use crate::state::SearchState;

const PHASE_NAME: &str = "Bisection Init";

/// Finds the shortest feasible prefix of the pool sorted by descending
/// score.
///
/// The full pool is checked first with `full_fleet_time_limit`; if it is
/// not feasible, no subset is and the run fails. The prefix length is
/// then bisected over `(lo, hi]` with `lo = 0` assumed infeasible and
/// `hi = n` known feasible, taking at most `⌈log2 n⌉` further calls.
#[derive(Debug, Clone)]
pub struct BisectionInit {
    full_fleet_time_limit: Duration,
    oracle_time_limit: Duration,
}

impl BisectionInit {
    pub fn new(full_fleet_time_limit: Duration, oracle_time_limit: Duration) -> Self {
        Self {
            full_fleet_time_limit,
            oracle_time_limit,
        }
    }

    pub fn from_config(config: &FleetConfig) -> Self {
        Self::new(config.time_limit(), config.init.oracle_time_limit())
    }
}

impl<O: FeasibilityOracle> InitPhase<O> for BisectionInit {
    fn initialize(
        &mut self,
        solver_scope: &mut SolverScope<'_, O>,
    ) -> Result<SearchState, SearchError> {
        let mut phase_scope = PhaseScope::new(solver_scope, PHASE_NAME);
        let fleet = phase_scope.fleet();
        if fleet.is_empty() {
            return Err(SearchError::EmptyFleet);
        }

        info!(
            event = "phase_start",
            phase = PHASE_NAME,
            vehicles = fleet.len(),
        );

        let order = fleet.by_descending_score();
        match phase_scope.try_fleet(&order, self.full_fleet_time_limit)? {
            Trial::Evaluated(evaluation) if evaluation.is_feasible() => {}
            Trial::Evaluated(evaluation) => {
                return Err(SearchError::FullFleetInfeasible {
                    status: evaluation.status,
                })
            }
            Trial::Blacklisted => {
                return Err(SearchError::FullFleetInfeasible {
                    status: OracleStatus::Infeasible,
                })
            }
        }

        let (mut lo, mut hi) = (0, order.len());
        while hi - lo > 1 {
            let mid = lo + (hi - lo) / 2;
            let feasible = phase_scope
                .try_fleet(&order[..mid], self.oracle_time_limit)?
                .is_feasible();
            debug!(
                event = "bisection_step",
                lo = lo,
                hi = hi,
                mid = mid,
                feasible = feasible,
            );
            if feasible {
                hi = mid;
            } else {
                lo = mid;
            }
        }

        let state = SearchState::new(fleet, order[..hi].iter().copied());
        info!(
            event = "phase_end",
            phase = PHASE_NAME,
            duration_ms = phase_scope.elapsed().as_millis() as u64,
            oracle_calls = phase_scope.oracle_calls(),
            vehicles = state.len(),
            cost = state.cost(),
        );
        Ok(state)
    }

    fn phase_type_name(&self) -> &'static str {
        "BisectionInit"
    }
}
