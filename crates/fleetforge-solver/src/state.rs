//! The current vehicle set, threaded explicitly through all phases.

use fleetforge_core::{Fleet, VehicleId};

use crate::solver::FleetSnapshot;

/// Vehicles currently in use and the unused rest of the pool.
///
/// Invariants: `vehicles` holds unique valid ids, `unused` is its
/// complement in the fleet sorted by id, and `cost` / `throughput` are the
/// sums over `vehicles`.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    vehicles: Vec<VehicleId>,
    unused: Vec<VehicleId>,
    cost: f64,
    throughput: f64,
}

impl SearchState {
    /// Builds a state using `vehicles`.
    ///
    /// Duplicate and out-of-range ids are dropped; the remaining order is
    /// kept.
    pub fn new(fleet: &Fleet, vehicles: impl IntoIterator<Item = VehicleId>) -> Self {
        let mut used = vec![false; fleet.len()];
        let vehicles: Vec<VehicleId> = vehicles
            .into_iter()
            .filter(|&v| fleet.contains(v) && !std::mem::replace(&mut used[v], true))
            .collect();
        let unused = fleet.ids().filter(|&v| !used[v]).collect();

        let mut state = Self {
            vehicles,
            unused,
            cost: 0.0,
            throughput: 0.0,
        };
        state.recompute(fleet);
        state
    }

    pub fn vehicles(&self) -> &[VehicleId] {
        &self.vehicles
    }

    pub fn unused(&self) -> &[VehicleId] {
        &self.unused
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn throughput(&self) -> f64 {
        self.throughput
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    pub fn contains(&self, id: VehicleId) -> bool {
        self.vehicles.contains(&id)
    }

    /// The current set without `removed`.
    pub fn without(&self, removed: &[VehicleId]) -> Vec<VehicleId> {
        self.vehicles
            .iter()
            .copied()
            .filter(|v| !removed.contains(v))
            .collect()
    }

    /// The current set with `outgoing` replaced by `incoming`.
    pub fn with_switch(&self, outgoing: &[VehicleId], incoming: &[VehicleId]) -> Vec<VehicleId> {
        let mut vehicles = self.without(outgoing);
        vehicles.extend_from_slice(incoming);
        vehicles
    }

    /// Moves `removed` into the unused pool.
    pub fn remove(&mut self, fleet: &Fleet, removed: &[VehicleId]) {
        self.switch(fleet, removed, &[]);
    }

    /// Replaces `outgoing` by `incoming`.
    ///
    /// Ids of `outgoing` not in use and ids of `incoming` not unused are
    /// ignored, so the uniqueness invariant holds for any input.
    pub fn switch(&mut self, fleet: &Fleet, outgoing: &[VehicleId], incoming: &[VehicleId]) {
        let outgoing: Vec<VehicleId> = outgoing
            .iter()
            .copied()
            .filter(|v| self.vehicles.contains(v))
            .collect();
        let incoming: Vec<VehicleId> = incoming
            .iter()
            .copied()
            .filter(|v| self.unused.binary_search(v).is_ok())
            .collect();

        self.vehicles.retain(|v| !outgoing.contains(v));
        self.unused.retain(|v| !incoming.contains(v));
        for v in incoming {
            if !self.vehicles.contains(&v) {
                self.vehicles.push(v);
            }
        }
        for v in outgoing {
            if let Err(pos) = self.unused.binary_search(&v) {
                self.unused.insert(pos, v);
            }
        }
        self.recompute(fleet);
    }

    pub fn snapshot(&self) -> FleetSnapshot {
        FleetSnapshot {
            vehicles: self.vehicles.clone(),
            total_cost: self.cost,
            total_throughput: self.throughput,
        }
    }

    fn recompute(&mut self, fleet: &Fleet) {
        self.cost = fleet.total_cost(&self.vehicles);
        self.throughput = fleet.total_throughput(&self.vehicles);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetforge_test::fleet_with_costs;

    #[test]
    fn test_new_drops_duplicates_and_invalid_ids() {
        let fleet = fleet_with_costs(&[1.0, 2.0, 4.0]);
        let state = SearchState::new(&fleet, [2, 0, 2, 7]);
        assert_eq!(state.vehicles(), &[2, 0]);
        assert_eq!(state.unused(), &[1]);
        assert_eq!(state.cost(), 5.0);
        assert_eq!(state.throughput(), 5.0);
    }

    #[test]
    fn test_switch_keeps_complement() {
        let fleet = fleet_with_costs(&[1.0, 2.0, 4.0, 8.0]);
        let mut state = SearchState::new(&fleet, [3, 1]);
        state.switch(&fleet, &[3], &[0, 2]);

        assert_eq!(state.vehicles(), &[1, 0, 2]);
        assert_eq!(state.unused(), &[3]);
        assert_eq!(state.cost(), 7.0);
    }

    #[test]
    fn test_switch_ignores_foreign_ids() {
        let fleet = fleet_with_costs(&[1.0, 2.0, 4.0]);
        let mut state = SearchState::new(&fleet, [0, 1]);
        // 1 is already in use, 2 is not
        state.switch(&fleet, &[2], &[1]);
        assert_eq!(state.vehicles(), &[0, 1]);
        assert_eq!(state.unused(), &[2]);
    }

    #[test]
    fn test_remove() {
        let fleet = fleet_with_costs(&[1.0, 2.0, 4.0]);
        let mut state = SearchState::new(&fleet, [0, 1, 2]);
        state.remove(&fleet, &[1]);
        assert_eq!(state.vehicles(), &[0, 2]);
        assert_eq!(state.unused(), &[1]);
        assert_eq!(state.cost(), 5.0);
    }

    #[test]
    fn test_trial_sets_leave_state_untouched() {
        let fleet = fleet_with_costs(&[1.0, 2.0, 4.0]);
        let state = SearchState::new(&fleet, [0, 1]);
        assert_eq!(state.without(&[0]), vec![1]);
        assert_eq!(state.with_switch(&[0], &[2]), vec![1, 2]);
        assert_eq!(state.vehicles(), &[0, 1]);
    }

    #[test]
    fn test_snapshot() {
        let fleet = fleet_with_costs(&[1.0, 2.0]);
        let snapshot = SearchState::new(&fleet, [1]).snapshot();
        assert_eq!(snapshot.vehicles, vec![1]);
        assert_eq!(snapshot.total_cost, 2.0);
    }
}
