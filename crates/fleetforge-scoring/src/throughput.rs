//! Throughput model.
//!
//! A vehicle visiting a node can move at most `min(vehicle_through,
//! node_through)` energy per interval. Small vehicles relative to that
//! amount spend more of the horizon driving back and forth, which the
//! occupancy factor `N / (N + 3)` discounts; the factor is capped by the
//! share of the horizon not spent at the depot.

use fleetforge_core::{Node, TimeGrid, Vehicle};

/// Energy a node can exchange per interval.
///
/// Capped by its power and by its storage plus the average energy it
/// produces or consumes per time instance.
pub fn node_throughput(node: &Node, time: &TimeGrid) -> f64 {
    let summed: f64 = time.active_steps().map(|t| node.energy_at(t)).sum();
    let average = summed / time.steps as f64;
    (node.power * time.step_hours).min(node.capacity + average)
}

/// Energy a vehicle can exchange per interval.
pub fn vehicle_throughput(vehicle: &Vehicle, time: &TimeGrid) -> f64 {
    (vehicle.power * time.step_hours).min(vehicle.capacity)
}

/// Discounted throughput of `vehicle` serving a node with throughput
/// `node_through`.
pub fn pair_throughput(vehicle: &Vehicle, node_through: f64, time: &TimeGrid) -> f64 {
    let theta = vehicle_throughput(vehicle, time).min(node_through);
    if !(theta > 0.0) {
        return 0.0;
    }
    let n = (vehicle.capacity / theta).max(1.0);
    let steps = time.steps as f64;
    let occupancy = (n / (n + 3.0)).min((steps - 5.0) / (steps - 3.0));
    occupancy * theta
}

/// Mean of [`pair_throughput`] over all consumer and producer nodes.
pub fn effective_throughput(vehicle: &Vehicle, node_through: &[f64], time: &TimeGrid) -> f64 {
    if node_through.is_empty() {
        return 0.0;
    }
    let total: f64 = node_through
        .iter()
        .map(|&n| pair_throughput(vehicle, n, time))
        .sum();
    total / node_through.len() as f64
}
