//! Greedy initialization from an energy-balance estimate.

use std::time::Duration;

use fleetforge_core::{Fleet, VehicleId};
use fleetforge_scoring::EnergyBalance;
use tracing::{debug, info, warn};

use super::InitPhase;
use crate::error::SearchError;
use crate::oracle::FeasibilityOracle;
use crate::scope::{PhaseScope, SolverScope};
use crate::state::SearchState;

const PHASE_NAME: &str = "Greedy Init";

/// Starts from the highest-score vehicles covering a throughput target,
/// then grows or shrinks the set one vehicle at a time.
///
/// The start is a prefix of the pool sorted by descending score. An
/// infeasible start grows by the next vehicle until feasible; running out
/// of vehicles is fatal. A feasible start shrinks by its lowest-score
/// vehicle, the earliest added one on ties, until the next removal fails,
/// keeping the last feasible set.
#[derive(Debug, Clone)]
pub struct GreedyInit {
    target_throughput: f64,
    oracle_time_limit: Duration,
}

impl GreedyInit {
    pub fn new(target_throughput: f64, oracle_time_limit: Duration) -> Self {
        Self {
            target_throughput,
            oracle_time_limit,
        }
    }

    /// Uses the throughput target of `balance`.
    pub fn from_balance(balance: &EnergyBalance, oracle_time_limit: Duration) -> Self {
        if balance.is_deficient() {
            warn!(
                event = "energy_deficit",
                required = balance.required(),
                available = balance.available(),
            );
        }
        Self::new(balance.target_throughput(), oracle_time_limit)
    }

    pub fn target_throughput(&self) -> f64 {
        self.target_throughput
    }

    /// Length of the shortest score-ordered prefix reaching the target,
    /// at least one vehicle and at most the whole pool.
    fn initial_len(&self, fleet: &Fleet, order: &[VehicleId]) -> usize {
        let mut throughput = 0.0;
        for (i, &v) in order.iter().enumerate() {
            throughput += fleet.theta_eff(v);
            if throughput >= self.target_throughput {
                return i + 1;
            }
        }
        order.len()
    }
}

impl<O: FeasibilityOracle> InitPhase<O> for GreedyInit {
    fn initialize(
        &mut self,
        solver_scope: &mut SolverScope<'_, O>,
    ) -> Result<SearchState, SearchError> {
        let mut phase_scope = PhaseScope::new(solver_scope, PHASE_NAME);
        let fleet = phase_scope.fleet();
        if fleet.is_empty() {
            return Err(SearchError::EmptyFleet);
        }

        let order = fleet.by_descending_score();
        let mut len = self.initial_len(fleet, &order);
        info!(
            event = "phase_start",
            phase = PHASE_NAME,
            vehicles = fleet.len(),
            target_throughput = self.target_throughput,
            initial = len,
        );

        let limit = self.oracle_time_limit;
        let mut set = order[..len].to_vec();
        if try_set(&mut phase_scope, &set, limit)? {
            while set.len() > 1 {
                let mut smaller = set.clone();
                smaller.remove(lowest_score_position(fleet, &smaller));
                if !try_set(&mut phase_scope, &smaller, limit)? {
                    break;
                }
                set = smaller;
            }
        } else {
            loop {
                if len == order.len() {
                    return Err(SearchError::PoolExhausted { tried: len });
                }
                set.push(order[len]);
                len += 1;
                if try_set(&mut phase_scope, &set, limit)? {
                    break;
                }
            }
        }

        let state = SearchState::new(fleet, set);
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
        "GreedyInit"
    }
}

fn try_set<O: FeasibilityOracle>(
    phase_scope: &mut PhaseScope<'_, '_, O>,
    set: &[VehicleId],
    time_limit: Duration,
) -> Result<bool, SearchError> {
    let feasible = phase_scope.try_fleet(set, time_limit)?.is_feasible();
    debug!(event = "greedy_step", vehicles = set.len(), feasible = feasible);
    Ok(feasible)
}

/// Position of the first vehicle in `set` with the lowest score.
fn lowest_score_position(fleet: &Fleet, set: &[VehicleId]) -> usize {
    let mut lowest = 0;
    for (i, &v) in set.iter().enumerate().skip(1) {
        if fleet.score(v) < fleet.score(set[lowest]) {
            lowest = i;
        }
    }
    lowest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::OracleStatus;
    use crate::test_utils::{constant_oracle, throughput_oracle, ScriptedOracle};
    use fleetforge_test::{typed_fleet, uniform_fleet};

    fn greedy(target: f64) -> GreedyInit {
        GreedyInit::new(target, Duration::from_secs(5))
    }

    #[test]
    fn test_always_timeout_exhausts_pool() {
        let fleet = uniform_fleet(6);
        let mut scope = SolverScope::new(&fleet, constant_oracle(OracleStatus::Timeout));

        let err = greedy(0.0).initialize(&mut scope).unwrap_err();
        assert!(matches!(err, SearchError::PoolExhausted { tried: 6 }));
        assert!(err.is_infeasible_instance());
        // one call per prefix length 1..=6
        assert_eq!(scope.evaluator().oracle().call_count(), 6);
    }

    #[test]
    fn test_grows_until_feasible() {
        // throughputs 5, 4, 3, 2, 1
        let fleet = uniform_fleet(5);
        let oracle = throughput_oracle(&fleet, 12.0);
        let mut scope = SolverScope::new(&fleet, oracle);

        let state = greedy(5.0).initialize(&mut scope).unwrap();
        assert_eq!(state.vehicles(), &[0, 1, 2]);
        assert_eq!(
            scope.evaluator().oracle().calls(),
            &[vec![0], vec![0, 1], vec![0, 1, 2]]
        );
    }

    #[test]
    fn test_shrinks_while_feasible() {
        let fleet = uniform_fleet(5);
        let oracle = throughput_oracle(&fleet, 12.0);
        let mut scope = SolverScope::new(&fleet, oracle);

        let state = greedy(15.0).initialize(&mut scope).unwrap();
        assert_eq!(state.vehicles(), &[0, 1, 2]);
        // 5 and 4 and 3 vehicles feasible, 2 vehicles not
        assert_eq!(scope.evaluator().oracle().call_count(), 4);
        assert_eq!(scope.statistics().infeasible.count, 1);
    }

    #[test]
    fn test_never_tests_empty_set() {
        let fleet = uniform_fleet(3);
        let mut scope = SolverScope::new(&fleet, constant_oracle(OracleStatus::Feasible));

        let state = greedy(100.0).initialize(&mut scope).unwrap();
        assert_eq!(state.vehicles(), &[0]);
        assert!(scope.evaluator().oracle().calls().iter().all(|c| !c.is_empty()));
    }

    #[test]
    fn test_shrink_drops_first_of_tied_lowest() {
        // scores 3, 2, 2, 2
        let fleet = typed_fleet(&[
            ("a", 1.0, 3.0),
            ("b", 1.0, 2.0),
            ("c", 1.0, 2.0),
            ("d", 1.0, 2.0),
        ]);
        let oracle = ScriptedOracle::new(|set: &[VehicleId]| {
            if set.len() >= 3 {
                OracleStatus::Feasible
            } else {
                OracleStatus::Infeasible
            }
        });
        let mut scope = SolverScope::new(&fleet, oracle);

        let state = greedy(100.0).initialize(&mut scope).unwrap();
        assert_eq!(state.vehicles(), &[0, 2, 3]);
        assert_eq!(
            scope.evaluator().oracle().calls(),
            &[vec![0, 1, 2, 3], vec![0, 2, 3], vec![0, 3]]
        );
    }

    #[test]
    fn test_lowest_score_position() {
        let fleet = typed_fleet(&[("a", 1.0, 2.0), ("b", 1.0, 1.0), ("c", 1.0, 1.0)]);
        assert_eq!(lowest_score_position(&fleet, &[0, 1, 2]), 1);
        assert_eq!(lowest_score_position(&fleet, &[0, 2, 1]), 1);
        assert_eq!(lowest_score_position(&fleet, &[0]), 0);
    }

    #[test]
    fn test_target_from_energy_balance() {
        let balance = EnergyBalance {
            consumed: 30.0,
            consumer_initial: 6.0,
            steps: 8,
            ..EnergyBalance::default()
        };
        let init = GreedyInit::from_balance(&balance, Duration::from_secs(5));
        assert_eq!(init.target_throughput(), 6.0);
    }

    #[test]
    fn test_initial_len() {
        let fleet = uniform_fleet(4);
        let order = fleet.by_descending_score();
        // throughputs 4, 3, 2, 1
        assert_eq!(greedy(0.0).initial_len(&fleet, &order), 1);
        assert_eq!(greedy(7.0).initial_len(&fleet, &order), 2);
        assert_eq!(greedy(7.5).initial_len(&fleet, &order), 3);
        assert_eq!(greedy(50.0).initial_len(&fleet, &order), 4);
    }
}
