//! Fleet search controller.

use std::time::Duration;

use fleetforge_config::{FleetConfig, InitStrategy};
use fleetforge_core::{Fleet, VehicleId};
use fleetforge_scoring::EnergyBalance;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, info};

use crate::error::SearchError;
use crate::oracle::FeasibilityOracle;
use crate::phase::bisection::BisectionInit;
use crate::phase::greedy::GreedyInit;
use crate::phase::removal::RemovalPhase;
use crate::phase::switch::SwitchPhase;
use crate::phase::{InitPhase, Phase};
use crate::scope::SolverScope;
use crate::state::SearchState;
use crate::statistics::SearchStatistics;

/// A feasible fleet, streamed after initialization and after every
/// accepted change.
#[derive(Debug, Clone, PartialEq)]
pub struct FleetSnapshot {
    pub vehicles: Vec<VehicleId>,
    pub total_cost: f64,
    pub total_throughput: f64,
}

/// Result of a completed fleet search.
#[derive(Debug, Clone, PartialEq)]
pub struct FleetSolution {
    /// Final vehicle set.
    pub vehicles: Vec<VehicleId>,
    pub total_cost: f64,
    /// Combined effective throughput of `vehicles`.
    pub total_throughput: f64,
    /// Statistics at the end of initialization.
    pub init_statistics: SearchStatistics,
    pub statistics: SearchStatistics,
    /// Time left for a subsequent routing solve, never below the
    /// configured minimum.
    pub routing_time_limit: Duration,
}

/// Runs INIT, REMOVALS and rounds of SWITCH_1..SWITCH_k under one budget.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use fleetforge_config::FleetConfig;
/// use fleetforge_core::{Fleet, Vehicle, VehicleId};
/// use fleetforge_solver::{
///     FeasibilityOracle, FleetSolver, OracleError, OracleOutcome, OracleStatus,
/// };
///
/// // feasible with any two vehicles
/// struct PairOracle;
///
/// impl FeasibilityOracle for PairOracle {
///     type Hint = ();
///
///     fn solve(
///         &mut self,
///         vehicles: &[VehicleId],
///         _time_limit: Duration,
///         _warm_start: Option<&()>,
///     ) -> Result<OracleOutcome<()>, OracleError> {
///         let status = if vehicles.len() >= 2 {
///             OracleStatus::Feasible
///         } else {
///             OracleStatus::Infeasible
///         };
///         Ok(OracleOutcome::new(status, Duration::ZERO))
///     }
/// }
///
/// let fleet = Fleet::from_throughputs(
///     vec![
///         Vehicle::new("van", 10.0, 5.0, 4.0),
///         Vehicle::new("truck", 40.0, 20.0, 10.0),
///         Vehicle::new("van", 10.0, 5.0, 4.0),
///     ],
///     vec![4.0, 20.0, 4.0],
/// )
/// .unwrap();
///
/// let solution = FleetSolver::new(&fleet, FleetConfig::default(), PairOracle)
///     .solve()
///     .unwrap();
///
/// // the truck got switched for the second van
/// assert_eq!(solution.total_cost, 8.0);
/// ```
pub struct FleetSolver<'f, O: FeasibilityOracle> {
    fleet: &'f Fleet,
    config: FleetConfig,
    oracle: O,
    balance: Option<EnergyBalance>,
    sender: Option<UnboundedSender<FleetSnapshot>>,
}

impl<'f, O: FeasibilityOracle> FleetSolver<'f, O> {
    pub fn new(fleet: &'f Fleet, config: FleetConfig, oracle: O) -> Self {
        Self {
            fleet,
            config,
            oracle,
            balance: None,
            sender: None,
        }
    }

    /// Energy balance used by greedy initialization for its first estimate.
    ///
    /// Without one, greedy initialization starts from a single vehicle.
    pub fn with_energy_balance(mut self, balance: EnergyBalance) -> Self {
        self.balance = Some(balance);
        self
    }

    /// Streams every feasible fleet found to `sender`.
    pub fn with_sender(mut self, sender: UnboundedSender<FleetSnapshot>) -> Self {
        self.sender = Some(sender);
        self
    }

    pub fn config(&self) -> &FleetConfig {
        &self.config
    }

    /// Runs the search.
    ///
    /// # Errors
    ///
    /// - [`SearchError::FullFleetInfeasible`] or [`SearchError::PoolExhausted`]
    ///   if the instance admits no feasible fleet
    /// - [`SearchError::EmptyFleet`] for an empty pool
    /// - [`SearchError::Oracle`] if the oracle fails
    /// - [`SearchError::Config`] for an invalid configuration
    pub fn solve(self) -> Result<FleetSolution, SearchError> {
        let result = self.run();
        if let Err(err) = &result {
            error!(
                event = "solve_failed",
                error = %err,
                infeasible_instance = err.is_infeasible_instance(),
            );
        }
        result
    }

    fn run(self) -> Result<FleetSolution, SearchError> {
        let Self {
            fleet,
            config,
            oracle,
            balance,
            sender,
        } = self;

        config.validate()?;
        if fleet.is_empty() {
            return Err(SearchError::EmptyFleet);
        }

        let mut solver_scope = SolverScope::new(fleet, oracle);
        if let Some(sender) = sender {
            solver_scope = solver_scope.with_sender(sender);
        }
        solver_scope.start_solving();

        info!(
            event = "solve_start",
            vehicles = fleet.len(),
            vehicle_types = fleet.type_count(),
            init_strategy = ?config.init.strategy,
            time_limit_secs = config.time_limit_seconds,
        );

        let mut state = initialize(&config, balance.as_ref(), &mut solver_scope)?;
        solver_scope.publish(state.snapshot());
        let init_statistics = solver_scope.statistics().clone();
        init_statistics.log_summary("init", solver_scope.elapsed());

        RemovalPhase::from_config(&config).solve(&mut state, &mut solver_scope)?;
        switch_rounds(&config, &mut state, &mut solver_scope)?;

        let elapsed = solver_scope.elapsed();
        let routing_time_limit = config
            .time_limit()
            .saturating_sub(elapsed)
            .max(config.routing_min_time_limit());

        info!(
            event = "solve_end",
            duration_ms = elapsed.as_millis() as u64,
            vehicles = state.len(),
            cost = state.cost(),
            throughput = state.throughput(),
            routing_time_limit_secs = routing_time_limit.as_secs_f64(),
        );
        let statistics = solver_scope.into_statistics();
        statistics.log_summary("final", elapsed);

        Ok(FleetSolution {
            vehicles: state.vehicles().to_vec(),
            total_cost: state.cost(),
            total_throughput: state.throughput(),
            init_statistics,
            statistics,
            routing_time_limit,
        })
    }
}

impl<O: FeasibilityOracle> std::fmt::Debug for FleetSolver<'_, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FleetSolver")
            .field("fleet_size", &self.fleet.len())
            .field("config", &self.config)
            .field("balance", &self.balance)
            .finish()
    }
}

fn initialize<O: FeasibilityOracle>(
    config: &FleetConfig,
    balance: Option<&EnergyBalance>,
    solver_scope: &mut SolverScope<'_, O>,
) -> Result<SearchState, SearchError> {
    match config.init.strategy {
        InitStrategy::Bisection => BisectionInit::from_config(config).initialize(solver_scope),
        InitStrategy::Greedy => {
            let limit = config.init.oracle_time_limit();
            let mut init = match balance {
                Some(balance) => GreedyInit::from_balance(balance, limit),
                None => GreedyInit::new(0.0, limit),
            };
            init.initialize(solver_scope)
        }
    }
}

/// Rounds of SWITCH_1..SWITCH_k until every phase of a round is exhausted
/// or the improvement deadline passes.
///
/// Each phase gets `1/k` of the time remaining when it starts.
fn switch_rounds<O: FeasibilityOracle>(
    config: &FleetConfig,
    state: &mut SearchState,
    solver_scope: &mut SolverScope<'_, O>,
) -> Result<(), SearchError> {
    let deadline = config.improvement_time_limit();
    let phase_count = config.switch.max_swap_out;
    let mut round = 0u64;

    loop {
        round += 1;
        let mut exhausted = 0;
        for k in 1..=phase_count {
            let Some(budget) = switch_budget(deadline, solver_scope.elapsed(), phase_count) else {
                debug!(event = "deadline_reached", round = round);
                return Ok(());
            };
            let outcome = SwitchPhase::from_config(k, config, budget).solve(state, solver_scope)?;
            if outcome.is_exhausted() {
                exhausted += 1;
            }
        }

        debug!(
            event = "switch_round",
            round = round,
            exhausted = exhausted,
            cost = state.cost(),
        );
        if exhausted == phase_count {
            return Ok(());
        }
    }
}

/// An equal share of the time left before `deadline` for each of
/// `phase_count` phases, or `None` once the deadline has passed.
fn switch_budget(deadline: Duration, elapsed: Duration, phase_count: usize) -> Option<Duration> {
    let remaining = deadline.saturating_sub(elapsed);
    if remaining.is_zero() {
        None
    } else {
        Some(remaining / phase_count.max(1) as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::OracleStatus;
    use crate::test_utils::{constant_oracle, cost_threshold_oracle, FailingOracle};
    use fleetforge_test::{fleet_with_costs, uniform_fleet};
    use tokio::sync::mpsc;

    #[test]
    fn test_solution_reports_final_set() {
        let fleet = fleet_with_costs(&[10.0, 8.0, 6.0, 4.0, 2.0]);
        let solution = FleetSolver::new(
            &fleet,
            FleetConfig::default(),
            cost_threshold_oracle(&fleet, 12.0),
        )
        .solve()
        .unwrap();

        assert!(solution.total_cost >= 12.0);
        assert_eq!(solution.total_cost, fleet.total_cost(&solution.vehicles));
        assert_eq!(solution.total_throughput, fleet.total_throughput(&solution.vehicles));
        assert!(solution.statistics.iterations >= solution.init_statistics.iterations);
        assert!(solution.routing_time_limit >= FleetConfig::default().routing_min_time_limit());

        let mut unique = solution.vehicles.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), solution.vehicles.len());
    }

    #[test]
    fn test_routing_limit_floor() {
        let fleet = uniform_fleet(3);
        let mut config = FleetConfig::default().with_time_limit_seconds(1.0);
        config.routing_min_time_limit_seconds = 30.0;
        let solution = FleetSolver::new(&fleet, config, constant_oracle(OracleStatus::Feasible))
            .solve()
            .unwrap();
        assert_eq!(solution.routing_time_limit, Duration::from_secs(30));
    }

    #[test]
    fn test_snapshots_streamed_with_falling_cost() {
        let fleet = fleet_with_costs(&[9.0, 7.0, 5.0, 3.0, 2.0, 1.0]);
        let (sender, mut receiver) = mpsc::unbounded_channel();
        let solution = FleetSolver::new(
            &fleet,
            FleetConfig::default(),
            cost_threshold_oracle(&fleet, 6.0),
        )
        .with_sender(sender)
        .solve()
        .unwrap();

        let mut snapshots = Vec::new();
        while let Ok(snapshot) = receiver.try_recv() {
            snapshots.push(snapshot);
        }
        assert!(!snapshots.is_empty());
        for pair in snapshots.windows(2) {
            assert!(pair[1].total_cost < pair[0].total_cost);
        }
        let last = snapshots.last().unwrap();
        assert_eq!(last.vehicles, solution.vehicles);
    }

    #[test]
    fn test_greedy_exhaustion_is_fatal() {
        let fleet = uniform_fleet(4);
        let config = FleetConfig::default().with_init_strategy(InitStrategy::Greedy);
        let err = FleetSolver::new(&fleet, config, constant_oracle(OracleStatus::Timeout))
            .solve()
            .unwrap_err();
        assert!(matches!(err, SearchError::PoolExhausted { tried: 4 }));
    }

    #[test]
    fn test_greedy_uses_energy_balance() {
        // throughputs 4, 3, 2, 1
        let fleet = uniform_fleet(4);
        let config = FleetConfig::default().with_init_strategy(InitStrategy::Greedy);
        let balance = EnergyBalance {
            consumed: 14.0,
            steps: 4,
            ..EnergyBalance::default()
        };
        let oracle = constant_oracle(OracleStatus::Infeasible);
        // target 7 covers two vehicles; growing then exhausts the pool
        let err = FleetSolver::new(&fleet, config, oracle)
            .with_energy_balance(balance)
            .solve()
            .unwrap_err();
        assert!(matches!(err, SearchError::PoolExhausted { tried: 4 }));
    }

    #[test]
    fn test_oracle_failure_surfaces() {
        let fleet = uniform_fleet(2);
        let err = FleetSolver::new(&fleet, FleetConfig::default(), FailingOracle::default())
            .solve()
            .unwrap_err();
        assert!(matches!(err, SearchError::Oracle(_)));
        assert!(!err.is_infeasible_instance());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let fleet = uniform_fleet(2);
        let config = FleetConfig::default().with_time_limit_seconds(0.0);
        let err = FleetSolver::new(&fleet, config, constant_oracle(OracleStatus::Feasible))
            .solve()
            .unwrap_err();
        assert!(matches!(err, SearchError::Config(_)));
    }

    #[test]
    fn test_switch_budget_shares_remaining_time() {
        let deadline = Duration::from_secs(90);
        assert_eq!(
            switch_budget(deadline, Duration::from_secs(30), 3),
            Some(Duration::from_secs(20))
        );
        assert_eq!(
            switch_budget(deadline, Duration::ZERO, 1),
            Some(Duration::from_secs(90))
        );
        assert_eq!(switch_budget(deadline, Duration::from_secs(90), 3), None);
        assert_eq!(switch_budget(deadline, Duration::from_secs(120), 2), None);
    }

    // INIT takes 3 calls of 30ms each, so the 50ms improvement deadline
    // has passed before the first switch round.
    #[test]
    fn test_no_switch_round_after_deadline() {
        let fleet = fleet_with_costs(&[10.0, 8.0, 6.0, 4.0, 2.0]);
        let mut config = FleetConfig::default().with_time_limit_seconds(0.05);
        config.improvement_fraction = 1.0;
        let oracle = cost_threshold_oracle(&fleet, 12.0).with_delay(Duration::from_millis(30));

        let solution = FleetSolver::new(&fleet, config, oracle).solve().unwrap();

        assert_eq!(solution.init_statistics.iterations, 3);
        // one removal try reaches the oracle, the other is blacklisted
        assert_eq!(solution.statistics.iterations, 4);
        assert_eq!(solution.total_cost, 18.0);
        assert_eq!(solution.routing_time_limit, Duration::from_secs(100));

        let unbounded = FleetSolver::new(
            &fleet,
            FleetConfig::default(),
            cost_threshold_oracle(&fleet, 12.0),
        )
        .solve()
        .unwrap();
        assert!(unbounded.statistics.iterations > 4);
        assert!(unbounded.total_cost < 18.0);
    }

    #[test]
    fn test_empty_fleet() {
        let fleet = fleet_with_costs(&[]);
        let err = FleetSolver::new(&fleet, FleetConfig::default(), constant_oracle(OracleStatus::Feasible))
            .solve()
            .unwrap_err();
        assert!(matches!(err, SearchError::EmptyFleet));
    }
}
