//! Entry points that hide the scoring and solver wiring.

use std::time::Duration;

use fleetforge_config::{ConfigError, FleetConfig};
use fleetforge_core::{CoreError, Instance, VehicleId};
use fleetforge_scoring::{score_fleet, EnergyBalance};
use fleetforge_solver::{FeasibilityOracle, FleetSnapshot, FleetSolution, FleetSolver, SearchError};
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;

/// Errors of the top-level entry points.
#[derive(Debug, Error)]
pub enum FleetError {
    #[error("invalid instance: {0}")]
    Instance(#[from] CoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("routing failed: {0}")]
    Routing(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl FleetError {
    /// Returns true if the search proved the instance has no feasible fleet.
    pub fn is_infeasible_instance(&self) -> bool {
        matches!(self, FleetError::Search(err) if err.is_infeasible_instance())
    }
}

/// Routing model run once on the final fleet.
pub trait RoutingSolver {
    type Output;

    fn route(
        &mut self,
        vehicles: &[VehicleId],
        time_limit: Duration,
    ) -> Result<Self::Output, Box<dyn std::error::Error + Send + Sync>>;
}

/// A fleet together with the routing computed for it.
#[derive(Debug)]
pub struct RoutedSolution<R> {
    pub fleet: FleetSolution,
    pub routing: R,
}

/// Scores `instance` and searches for its cheapest feasible fleet.
///
/// # Errors
///
/// Returns [`FleetError::Config`] for an invalid configuration,
/// [`FleetError::Instance`] for malformed instance data and
/// [`FleetError::Search`] when the search fails.
pub fn solve<O: FeasibilityOracle>(
    instance: &Instance,
    config: FleetConfig,
    oracle: O,
) -> Result<FleetSolution, FleetError> {
    run(instance, config, oracle, None)
}

/// Like [`solve`], streaming every feasible fleet found to `sender`.
pub fn solve_with_sender<O: FeasibilityOracle>(
    instance: &Instance,
    config: FleetConfig,
    oracle: O,
    sender: UnboundedSender<FleetSnapshot>,
) -> Result<FleetSolution, FleetError> {
    run(instance, config, oracle, Some(sender))
}

/// Runs the fleet search, then hands the final fleet to `router` with the
/// remaining routing time limit.
///
/// # Errors
///
/// Any [`solve`] error; [`FleetError::Routing`] if the router fails.
pub fn solve_and_route<O: FeasibilityOracle, R>(
    instance: &Instance,
    config: FleetConfig,
    oracle: O,
    router: &mut dyn RoutingSolver<Output = R>,
) -> Result<RoutedSolution<R>, FleetError> {
    let fleet = solve(instance, config, oracle)?;
    let routing = router
        .route(&fleet.vehicles, fleet.routing_time_limit)
        .map_err(FleetError::Routing)?;
    Ok(RoutedSolution { fleet, routing })
}

fn run<O: FeasibilityOracle>(
    instance: &Instance,
    config: FleetConfig,
    oracle: O,
    sender: Option<UnboundedSender<FleetSnapshot>>,
) -> Result<FleetSolution, FleetError> {
    #[cfg(feature = "console")]
    fleetforge_console::init();

    config.validate()?;
    let fleet = score_fleet(instance)?;
    let balance = EnergyBalance::of(instance);

    let mut solver = FleetSolver::new(&fleet, config, oracle).with_energy_balance(balance);
    if let Some(sender) = sender {
        solver = solver.with_sender(sender);
    }
    Ok(solver.solve()?)
}
