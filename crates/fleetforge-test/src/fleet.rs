//! Fleet fixtures.
//!
//! Throughput values are set directly, bypassing the scoring model, so tests
//! control the candidate order and vehicle ranking exactly.

use fleetforge_core::{Fleet, Vehicle};

/// A fleet of distinct vehicle types `v0, v1, ...` with the given costs.
///
/// Each vehicle's throughput equals its cost, so all scores are 1.
pub fn fleet_with_costs(costs: &[f64]) -> Fleet {
    let specs: Vec<(String, f64, f64)> = costs
        .iter()
        .enumerate()
        .map(|(i, &c)| (format!("v{i}"), c, c))
        .collect();
    build(specs)
}

/// A fleet from `(name, cost, theta_eff)` triples.
///
/// Repeated names produce interchangeable vehicles.
pub fn typed_fleet(specs: &[(&str, f64, f64)]) -> Fleet {
    build(
        specs
            .iter()
            .map(|&(name, cost, theta)| (name.to_string(), cost, theta))
            .collect(),
    )
}

/// `count` distinct vehicles with cost 1 and throughput decreasing with
/// the index, so vehicle 0 has the best score.
pub fn uniform_fleet(count: usize) -> Fleet {
    build(
        (0..count)
            .map(|i| (format!("v{i}"), 1.0, (count - i) as f64))
            .collect(),
    )
}

fn build(specs: Vec<(String, f64, f64)>) -> Fleet {
    let (vehicles, theta): (Vec<Vehicle>, Vec<f64>) = specs
        .into_iter()
        .map(|(name, cost, theta)| (Vehicle::new(name, theta, theta, cost), theta))
        .unzip();
    Fleet::from_throughputs(vehicles, theta).expect("fixture costs must be positive")
}
