//! k-for-X switch phase.

use std::time::Duration;

use fleetforge_config::FleetConfig;
use tracing::{debug, info};

use super::{Phase, PhaseOutcome};
use crate::candidate::{swap_out_subsets, Candidate, CandidateGenerator, Selection};
use crate::error::SearchError;
use crate::oracle::FeasibilityOracle;
use crate::scope::{PhaseScope, SolverScope, Trial};
use crate::state::SearchState;
use crate::termination::{phase_termination, PhaseTermination, Termination};

/// Replaces `k` used vehicles by one to three cheaper unused ones.
///
/// A pass walks the `k`-subsets of the current set. For each subset the
/// cheaper replacement candidates are scanned highest throughput first;
/// after a feasible one only strictly cheaper candidates are tried, and
/// the scan ends after `patience` consecutive failures or
/// `after_feasible_patience` failures past a feasible find. The cheapest
/// feasible replacement found is applied and a new pass starts.
///
/// A pass that submits nothing to the oracle ends the phase with no
/// options left; a pass that submitted candidates without a change is
/// repeated, since its failures are blacklisted by then.
#[derive(Debug, Clone)]
pub struct SwitchPhase<T> {
    k: usize,
    termination: T,
    patience: u64,
    after_feasible_patience: u64,
    oracle_time_limit: Duration,
}

impl<T> SwitchPhase<T> {
    /// Creates the phase with patience 1 and after-feasible patience 1.
    pub fn new(k: usize, termination: T, oracle_time_limit: Duration) -> Self {
        Self {
            k,
            termination,
            patience: 1,
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

    /// Number of vehicles swapped out.
    pub fn k(&self) -> usize {
        self.k
    }

    fn phase_name(&self) -> &'static str {
        match self.k {
            1 => "Switch 1vX",
            2 => "Switch 2vX",
            3 => "Switch 3vX",
            _ => "Switch kvX",
        }
    }
}

impl SwitchPhase<PhaseTermination> {
    /// SWITCH_k with the switch settings of `config` and a budget of `time_limit`.
    pub fn from_config(k: usize, config: &FleetConfig, time_limit: Duration) -> Self {
        let switch = &config.switch;
        Self::new(
            k,
            phase_termination(time_limit, switch.oracle_call_limit),
            config.oracle_time_limit(),
        )
        .with_patience(switch.patience)
        .with_after_feasible_patience(switch.after_feasible_patience)
    }
}

/// Result of scanning the candidates of one swapped-out subset.
struct SubsetScan<'c> {
    best: Option<&'c Candidate>,
    submitted: bool,
    terminated: bool,
}

impl<T> SwitchPhase<T> {
    fn scan_candidates<'c, O>(
        &self,
        state: &SearchState,
        outgoing: &Selection,
        candidates: &'c [Candidate],
        phase_scope: &mut PhaseScope<'_, '_, O>,
    ) -> Result<SubsetScan<'c>, SearchError>
    where
        O: FeasibilityOracle,
        T: Termination<O>,
    {
        let mut scan = SubsetScan {
            best: None,
            submitted: false,
            terminated: false,
        };
        let mut failures = 0;
        let mut after_feasible_failures = 0;

        for candidate in candidates {
            if scan.best.is_some_and(|b| candidate.cost >= b.cost) {
                continue;
            }
            if failures >= self.patience {
                break;
            }
            if self.termination.is_terminated(phase_scope) {
                scan.terminated = true;
                break;
            }

            let trial_set = state.with_switch(outgoing, &candidate.vehicles);
            let Trial::Evaluated(evaluation) =
                phase_scope.try_fleet(&trial_set, self.oracle_time_limit)?
            else {
                continue;
            };
            scan.submitted = true;

            debug!(
                event = "switch_try",
                outgoing = ?outgoing.as_slice(),
                incoming = ?candidate.vehicles.as_slice(),
                cost = candidate.cost,
                throughput = candidate.throughput,
                status = %evaluation.status,
                runtime_ms = evaluation.runtime.as_millis() as u64,
            );

            if evaluation.is_feasible() {
                scan.best = Some(candidate);
                failures = 0;
                after_feasible_failures = 0;
            } else {
                failures += 1;
                if scan.best.is_some() {
                    after_feasible_failures += 1;
                    if after_feasible_failures >= self.after_feasible_patience {
                        break;
                    }
                }
            }
        }

        Ok(scan)
    }
}

impl<O, T> Phase<O> for SwitchPhase<T>
where
    O: FeasibilityOracle,
    T: Termination<O>,
{
    fn solve(
        &mut self,
        state: &mut SearchState,
        solver_scope: &mut SolverScope<'_, O>,
    ) -> Result<PhaseOutcome, SearchError> {
        let phase_name = self.phase_name();
        let mut phase_scope = PhaseScope::new(solver_scope, phase_name);
        let fleet = phase_scope.fleet();
        let generator = CandidateGenerator::new(fleet);
        let mut outcome = PhaseOutcome::default();
        let mut switches = 0u64;

        info!(
            event = "phase_start",
            phase = phase_name,
            vehicles = state.len(),
            cost = state.cost(),
        );

        loop {
            if self.termination.is_terminated(&phase_scope) {
                outcome.terminated_early = true;
                break;
            }

            let mut submitted = false;
            for outgoing in swap_out_subsets(fleet, state.vehicles(), self.k) {
                let candidates = generator.generate(fleet.total_cost(&outgoing), state.unused());
                let scan = self.scan_candidates(state, &outgoing, &candidates, &mut phase_scope)?;
                submitted |= scan.submitted;

                if let Some(best) = scan.best {
                    let before = state.cost();
                    state.switch(fleet, &outgoing, &best.vehicles);
                    switches += 1;
                    outcome.set_changed = true;
                    info!(
                        event = "switch_accepted",
                        phase = phase_name,
                        outgoing = ?outgoing.as_slice(),
                        incoming = ?best.vehicles.as_slice(),
                        saving = before - state.cost(),
                        vehicles = state.len(),
                        cost = state.cost(),
                    );
                    phase_scope.publish(state);
                }
                if scan.terminated {
                    outcome.terminated_early = true;
                }
                if scan.best.is_some() || scan.terminated {
                    break;
                }
            }

            if outcome.terminated_early {
                break;
            }
            if !submitted {
                outcome.no_options_left = true;
                break;
            }
        }

        info!(
            event = "phase_end",
            phase = phase_name,
            duration_ms = phase_scope.elapsed().as_millis() as u64,
            oracle_calls = phase_scope.oracle_calls(),
            switches = switches,
            no_options_left = outcome.no_options_left,
            vehicles = state.len(),
            cost = state.cost(),
        );
        Ok(outcome)
    }

    fn phase_type_name(&self) -> &'static str {
        "Switch"
    }
}

#[cfg(test)]
#[path = "switch_tests.rs"]
mod tests;
