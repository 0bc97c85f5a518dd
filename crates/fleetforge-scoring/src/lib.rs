//! Throughput scoring for FleetForge.
//!
//! Rates every vehicle of an instance by its effective energy throughput
//! (`theta_eff`) and throughput per cost (`score`). The rating is a search
//! priority only; it is computed once per run and never updated.
//!
//! - [`throughput`] - per node and per vehicle throughput model
//! - [`energy`] - cumulative energy balance used to size an initial fleet

pub mod energy;
pub mod throughput;

use fleetforge_core::{Fleet, Instance, Result};

pub use energy::EnergyBalance;
pub use throughput::{effective_throughput, node_throughput, pair_throughput, vehicle_throughput};

/// Scores all vehicles of `instance` and returns the read-only fleet.
///
/// # Errors
///
/// Returns the instance validation error if the instance is malformed.
pub fn score_fleet(instance: &Instance) -> Result<Fleet> {
    instance.validate()?;

    let node_through: Vec<f64> = instance
        .profiled_nodes()
        .map(|node| node_throughput(node, &instance.time))
        .collect();

    let theta_eff = instance
        .vehicles
        .iter()
        .map(|vehicle| effective_throughput(vehicle, &node_through, &instance.time))
        .collect();

    Fleet::from_throughputs(instance.vehicles.clone(), theta_eff)
}
