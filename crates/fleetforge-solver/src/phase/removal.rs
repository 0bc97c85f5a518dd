//! Removal phase.

use std::time::Duration;

use fleetforge_config::FleetConfig;
use fleetforge_core::VehicleId;
use tracing::{debug, info};

use super::{Phase, PhaseOutcome};
use crate::error::SearchError;
use crate::oracle::FeasibilityOracle;
use crate::scope::{PhaseScope, SolverScope, Trial};
use crate::state::SearchState;
use crate::termination::{phase_termination, PhaseTermination, Termination};

const PHASE_NAME: &str = "Removals";

/// Why a removal scan stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanEnd {
    Completed,
    PatienceExceeded,
    Terminated,
}

/// Drops single vehicles, cheapest first.
///
/// Each scan tries the current vehicles in ascending cost order. Once a
/// removal is feasible, only costlier removals are still tried and a
/// feasible one replaces the earlier find; the scan stops after
/// `after_feasible_patience` further failures. The best find is applied
/// and the next scan starts. The phase stops when a scan finds nothing,
/// when `patience` removals of one scan failed, or on termination.
#[derive(Debug, Clone)]
pub struct RemovalPhase<T> {
    termination: T,
    patience: u64,
    after_feasible_patience: u64,
    oracle_time_limit: Duration,
}

impl<T> RemovalPhase<T> {
    /// Creates the phase with patience 2 and after-feasible patience 1.
    pub fn new(termination: T, oracle_time_limit: Duration) -> Self {
        Self {
            termination,
            patience: 2,
            after_feasible_patience: 1,
            oracle_time_limit,
        }
    }

    pub fn with_patience(mut self, patience: u64) -> Self {
        self.patience = patience;
        self
    }

    pub fn with_after_feasible_patience(mut self, patience: u64) -> Self {
        self.after_feasible_patience = patience;
        self
    }
}

impl RemovalPhase<PhaseTermination> {
    pub fn from_config(config: &FleetConfig) -> Self {
        let removal = &config.removal;
        Self::new(
            phase_termination(removal.time_limit(), removal.oracle_call_limit),
            config.oracle_time_limit(),
        )
        .with_patience(removal.patience)
        .with_after_feasible_patience(removal.after_feasible_patience)
    }
}

impl<T> RemovalPhase<T> {
    /// One scan over the current set; returns the removal to apply.
    fn scan<O>(
        &self,
        state: &SearchState,
        phase_scope: &mut PhaseScope<'_, '_, O>,
    ) -> Result<(Option<VehicleId>, ScanEnd), SearchError>
    where
        O: FeasibilityOracle,
        T: Termination<O>,
    {
        let fleet = phase_scope.fleet();
        let mut order = state.vehicles().to_vec();
        order.sort_by(|&a, &b| fleet.cost(a).total_cmp(&fleet.cost(b)).then(a.cmp(&b)));

        let mut best: Option<VehicleId> = None;
        let mut failures = 0;
        let mut after_feasible_failures = 0;

        for v in order {
            if failures >= self.patience {
                return Ok((best, ScanEnd::PatienceExceeded));
            }
            if self.termination.is_terminated(phase_scope) {
                return Ok((best, ScanEnd::Terminated));
            }
            if best.is_some_and(|b| fleet.cost(v) <= fleet.cost(b)) {
                continue;
            }

            let trial_set = state.without(&[v]);
            let Trial::Evaluated(evaluation) =
                phase_scope.try_fleet(&trial_set, self.oracle_time_limit)?
            else {
                continue;
            };

            debug!(
                event = "removal_try",
                vehicle = v,
                name = fleet.name(v),
                cost = fleet.cost(v),
                status = %evaluation.status,
                runtime_ms = evaluation.runtime.as_millis() as u64,
            );

            if evaluation.is_feasible() {
                best = Some(v);
                after_feasible_failures = 0;
            } else {
                failures += 1;
                phase_scope.solver_scope_mut().statistics_mut().failed_removals += 1;
                if best.is_some() {
                    after_feasible_failures += 1;
                    if after_feasible_failures >= self.after_feasible_patience {
                        break;
                    }
                }
            }
        }

        Ok((best, ScanEnd::Completed))
    }
}

impl<O, T> Phase<O> for RemovalPhase<T>
where
    O: FeasibilityOracle,
    T: Termination<O>,
{
    fn solve(
        &mut self,
        state: &mut SearchState,
        solver_scope: &mut SolverScope<'_, O>,
    ) -> Result<PhaseOutcome, SearchError> {
        let mut phase_scope = PhaseScope::new(solver_scope, PHASE_NAME);
        let fleet = phase_scope.fleet();
        let mut outcome = PhaseOutcome::default();
        let mut removals = 0u64;

        info!(
            event = "phase_start",
            phase = PHASE_NAME,
            vehicles = state.len(),
            cost = state.cost(),
        );

        // an empty fleet is never tried
        while state.len() > 1 {
            let (removed, end) = self.scan(state, &mut phase_scope)?;

            if let Some(v) = removed {
                state.remove(fleet, &[v]);
                removals += 1;
                outcome.set_changed = true;
                info!(
                    event = "removal_accepted",
                    vehicle = v,
                    name = fleet.name(v),
                    vehicles = state.len(),
                    cost = state.cost(),
                );
                phase_scope.publish(state);
            }

            match end {
                ScanEnd::Terminated => {
                    outcome.terminated_early = true;
                    break;
                }
                ScanEnd::PatienceExceeded => {
                    debug!(event = "patience_exceeded", phase = PHASE_NAME);
                    break;
                }
                ScanEnd::Completed if removed.is_none() => {
                    outcome.no_options_left = true;
                    break;
                }
                ScanEnd::Completed => {}
            }
        }
        if state.len() <= 1 {
            outcome.no_options_left = !outcome.terminated_early;
        }

        info!(
            event = "phase_end",
            phase = PHASE_NAME,
            duration_ms = phase_scope.elapsed().as_millis() as u64,
            oracle_calls = phase_scope.oracle_calls(),
            removals = removals,
            vehicles = state.len(),
            cost = state.cost(),
        );
        Ok(outcome)
    }

    fn phase_type_name(&self) -> &'static str {
        "Removal"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::OracleStatus;
    use crate::termination::{OracleCallTermination, TimeTermination};
    use crate::test_utils::{cost_threshold_oracle, FailingOracle, ScriptedOracle};
    use fleetforge_test::fleet_with_costs;
    use tokio::sync::mpsc;

    fn removal() -> RemovalPhase<TimeTermination> {
        RemovalPhase::new(TimeTermination::seconds(3600), Duration::from_secs(5))
    }

    fn sorted(vehicles: &[VehicleId]) -> Vec<VehicleId> {
        let mut v = vehicles.to_vec();
        v.sort_unstable();
        v
    }

    /// Costs [10, 8, 6, 4, 2], feasible iff the total cost is at least 12.
    ///
    /// Scan 1 tries removing 4, 3, 2, 1, 0: all feasible, each costlier find
    /// supersedes the last, so vehicle 0 (cost 10) goes. Scan 2 likewise
    /// removes vehicle 1 (cost 8), leaving {2, 3, 4} at cost 12. In scan 3
    /// removing 4 and 3 fails and patience 2 ends the phase.
    #[test]
    fn test_threshold_scenario() {
        let fleet = fleet_with_costs(&[10.0, 8.0, 6.0, 4.0, 2.0]);
        let mut scope = SolverScope::new(&fleet, cost_threshold_oracle(&fleet, 12.0));
        let mut state = SearchState::new(&fleet, 0..5);

        let outcome = removal().solve(&mut state, &mut scope).unwrap();

        assert_eq!(sorted(state.vehicles()), vec![2, 3, 4]);
        assert_eq!(state.cost(), 12.0);
        assert!(outcome.set_changed);
        assert!(!outcome.terminated_early);
        assert_eq!(scope.evaluator().oracle().call_count(), 11);
        assert_eq!(scope.statistics().failed_removals, 2);
    }

    #[test]
    fn test_after_feasible_patience_ends_scan() {
        // feasible iff vehicle 1 stays
        let fleet = fleet_with_costs(&[1.0, 2.0, 3.0, 4.0]);
        let oracle = ScriptedOracle::new(|set: &[VehicleId]| {
            if set.contains(&1) {
                OracleStatus::Feasible
            } else {
                OracleStatus::Infeasible
            }
        });
        let mut scope = SolverScope::new(&fleet, oracle);
        let mut state = SearchState::new(&fleet, 0..4);

        // removing 0 is feasible, removing 1 fails, so 2 and 3 are never tried
        RemovalPhase::new(OracleCallTermination::new(2), Duration::from_secs(5))
            .solve(&mut state, &mut scope)
            .unwrap();
        assert_eq!(state.vehicles(), &[1, 2, 3]);
        assert_eq!(
            scope.evaluator().oracle().calls(),
            &[vec![1, 2, 3], vec![0, 2, 3]]
        );
    }

    #[test]
    fn test_more_after_feasible_patience_keeps_scanning() {
        let fleet = fleet_with_costs(&[1.0, 2.0, 3.0, 4.0]);
        let oracle = ScriptedOracle::new(|set: &[VehicleId]| {
            if set.contains(&1) {
                OracleStatus::Feasible
            } else {
                OracleStatus::Infeasible
            }
        });
        let mut scope = SolverScope::new(&fleet, oracle);
        let mut state = SearchState::new(&fleet, 0..4);

        RemovalPhase::new(OracleCallTermination::new(4), Duration::from_secs(5))
            .with_after_feasible_patience(2)
            .solve(&mut state, &mut scope)
            .unwrap();
        // 0 feasible, 1 fails, 2 and 3 feasible: the costliest goes
        assert_eq!(state.vehicles(), &[0, 1, 2]);
    }

    #[test]
    fn test_blacklisted_removal_not_resubmitted() {
        let fleet = fleet_with_costs(&[10.0, 8.0, 6.0, 4.0, 2.0]);
        let mut scope = SolverScope::new(&fleet, cost_threshold_oracle(&fleet, 12.0));
        let mut state = SearchState::new(&fleet, [2, 3, 4]);

        // every removal fails and ends up blacklisted
        let outcome = removal().with_patience(3).solve(&mut state, &mut scope).unwrap();
        assert!(outcome.is_exhausted());
        let calls = scope.evaluator().oracle().call_count();
        assert_eq!(calls, 3);

        removal().with_patience(3).solve(&mut state, &mut scope).unwrap();

        assert_eq!(scope.evaluator().oracle().call_count(), calls);
        assert_eq!(scope.statistics().blacklist_hits, 3);
    }

    #[test]
    fn test_cost_never_increases() {
        let fleet = fleet_with_costs(&[7.0, 5.0, 5.0, 3.0, 2.0, 1.0]);
        let (sender, mut receiver) = mpsc::unbounded_channel();
        let mut scope =
            SolverScope::new(&fleet, cost_threshold_oracle(&fleet, 9.0)).with_sender(sender);
        let mut state = SearchState::new(&fleet, 0..6);

        removal().solve(&mut state, &mut scope).unwrap();

        let mut last = fleet.total_cost(&(0..6).collect::<Vec<_>>());
        let mut accepted = 0;
        while let Ok(snapshot) = receiver.try_recv() {
            assert!(snapshot.total_cost < last);
            assert!(snapshot.total_cost >= 9.0);
            last = snapshot.total_cost;
            accepted += 1;
        }
        assert!(accepted > 0);
        assert_eq!(last, state.cost());
    }

    // every call takes 25ms against a 40ms budget, so the first scan is
    // cut short after one or two of its five tries
    #[test]
    fn test_time_budget_ends_phase_early() {
        let fleet = fleet_with_costs(&[10.0, 8.0, 6.0, 4.0, 2.0]);
        let oracle = cost_threshold_oracle(&fleet, 12.0).with_delay(Duration::from_millis(25));
        let mut scope = SolverScope::new(&fleet, oracle);
        let mut state = SearchState::new(&fleet, 0..5);
        let mut config = FleetConfig::default();
        config.removal.time_limit_seconds = 0.04;

        let outcome = RemovalPhase::from_config(&config)
            .solve(&mut state, &mut scope)
            .unwrap();

        assert!(outcome.terminated_early);
        assert!(!outcome.is_exhausted());
        let calls = scope.evaluator().oracle().call_count();
        assert!((1..=2).contains(&calls), "{calls} calls");
        // the find of the cut-short scan is still applied
        assert_eq!(state.len(), 4);
        assert!(state.cost() < 30.0);
    }

    #[test]
    fn test_single_vehicle_not_tried() {
        let fleet = fleet_with_costs(&[3.0, 2.0]);
        let mut scope = SolverScope::new(&fleet, cost_threshold_oracle(&fleet, 0.0));
        let mut state = SearchState::new(&fleet, [0]);

        let outcome = removal().solve(&mut state, &mut scope).unwrap();
        assert!(outcome.is_exhausted());
        assert_eq!(scope.evaluator().oracle().call_count(), 0);
    }

    #[test]
    fn test_oracle_failure_propagates() {
        let fleet = fleet_with_costs(&[3.0, 2.0]);
        let mut scope = SolverScope::new(&fleet, FailingOracle::default());
        let mut state = SearchState::new(&fleet, [0, 1]);

        let err = removal().solve(&mut state, &mut scope).unwrap_err();
        assert!(matches!(err, SearchError::Oracle(_)));
        assert_eq!(state.vehicles(), &[0, 1]);
    }
}
