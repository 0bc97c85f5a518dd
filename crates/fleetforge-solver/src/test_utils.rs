//! Synthetic oracles for solver tests.

use std::time::Duration;

use fleetforge_core::{Fleet, VehicleId};

use crate::oracle::{FeasibilityOracle, OracleError, OracleOutcome, OracleStatus};

/// Oracle answering from a closure and recording every call.
///
/// Feasible answers carry the 1-based call number as warm-start hint.
pub struct ScriptedOracle<F> {
    answer: F,
    runtime: Duration,
    delay: Duration,
    calls: Vec<Vec<VehicleId>>,
    hints_seen: Vec<Option<u64>>,
    time_limits: Vec<Duration>,
}

impl<F> ScriptedOracle<F>
where
    F: FnMut(&[VehicleId]) -> OracleStatus,
{
    pub fn new(answer: F) -> Self {
        Self {
            answer,
            runtime: Duration::from_millis(1),
            delay: Duration::ZERO,
            calls: Vec::new(),
            hints_seen: Vec::new(),
            time_limits: Vec::new(),
        }
    }

    pub fn with_runtime(mut self, runtime: Duration) -> Self {
        self.runtime = runtime;
        self
    }

    /// Blocks every call for `delay` of wall-clock time.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.len()
    }

    pub fn calls(&self) -> &[Vec<VehicleId>] {
        &self.calls
    }

    pub fn hints_seen(&self) -> &[Option<u64>] {
        &self.hints_seen
    }

    pub fn time_limits(&self) -> &[Duration] {
        &self.time_limits
    }
}

impl<F> FeasibilityOracle for ScriptedOracle<F>
where
    F: FnMut(&[VehicleId]) -> OracleStatus,
{
    type Hint = u64;

    fn solve(
        &mut self,
        vehicles: &[VehicleId],
        time_limit: Duration,
        warm_start: Option<&u64>,
    ) -> Result<OracleOutcome<u64>, OracleError> {
        let mut sorted = vehicles.to_vec();
        sorted.sort_unstable();
        self.calls.push(sorted);
        self.hints_seen.push(warm_start.copied());
        self.time_limits.push(time_limit);

        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        let status = (self.answer)(vehicles);
        let outcome = OracleOutcome::new(status, self.runtime);
        if status.is_feasible() {
            Ok(outcome.with_solution(self.calls.len() as u64))
        } else {
            Ok(outcome)
        }
    }
}

/// Feasible iff the total cost of the set is at least `min_cost`.
pub fn cost_threshold_oracle(
    fleet: &Fleet,
    min_cost: f64,
) -> ScriptedOracle<impl FnMut(&[VehicleId]) -> OracleStatus> {
    let costs: Vec<f64> = fleet.ids().map(|v| fleet.cost(v)).collect();
    ScriptedOracle::new(move |set: &[VehicleId]| {
        let total: f64 = set.iter().map(|&v| costs[v]).sum();
        if total >= min_cost {
            OracleStatus::Feasible
        } else {
            OracleStatus::Infeasible
        }
    })
}

/// Feasible iff the combined throughput of the set is at least `min_throughput`.
pub fn throughput_oracle(
    fleet: &Fleet,
    min_throughput: f64,
) -> ScriptedOracle<impl FnMut(&[VehicleId]) -> OracleStatus> {
    let theta: Vec<f64> = fleet.ids().map(|v| fleet.theta_eff(v)).collect();
    ScriptedOracle::new(move |set: &[VehicleId]| {
        let total: f64 = set.iter().map(|&v| theta[v]).sum();
        if total >= min_throughput {
            OracleStatus::Feasible
        } else {
            OracleStatus::Infeasible
        }
    })
}

/// Answers every call with `status`.
pub fn constant_oracle(status: OracleStatus) -> ScriptedOracle<impl FnMut(&[VehicleId]) -> OracleStatus> {
    ScriptedOracle::new(move |_: &[VehicleId]| status)
}

/// Oracle that fails on every call.
#[derive(Debug, Default)]
pub struct FailingOracle {
    pub calls: usize,
}

impl FeasibilityOracle for FailingOracle {
    type Hint = ();

    fn solve(
        &mut self,
        _vehicles: &[VehicleId],
        _time_limit: Duration,
        _warm_start: Option<&()>,
    ) -> Result<OracleOutcome<()>, OracleError> {
        self.calls += 1;
        Err(OracleError::Failed("solver process crashed".to_string()))
    }
}
