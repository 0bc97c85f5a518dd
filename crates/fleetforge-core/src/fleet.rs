//! Scored vehicle pool.
//!
//! [`Fleet`] is built once per run from the instance vehicles and their
//! effective throughput, and is never mutated afterwards. Every search
//! structure refers to vehicles by [`VehicleId`] into this snapshot.

use std::collections::HashMap;
use std::ops::Range;

use crate::composition::{Composition, VehicleType};
use crate::error::{CoreError, Result};
use crate::vehicle::{Vehicle, VehicleId};

/// A vehicle with its heuristic rating attached.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ScoredVehicle {
    pub vehicle: Vehicle,
    /// Effective energy throughput per interval.
    pub theta_eff: f64,
    /// Throughput per unit of rental cost.
    pub score: f64,
}

impl ScoredVehicle {
    pub fn new(vehicle: Vehicle, theta_eff: f64) -> Self {
        let score = theta_eff / vehicle.cost;
        Self {
            vehicle,
            theta_eff,
            score,
        }
    }
}

/// Immutable, scored vehicle pool with interned vehicle types.
#[derive(Debug, Clone)]
pub struct Fleet {
    vehicles: Vec<ScoredVehicle>,
    type_names: Vec<String>,
    types: Vec<VehicleType>,
}

impl Fleet {
    /// Builds the pool, interning vehicle names in order of appearance.
    pub fn new(vehicles: Vec<ScoredVehicle>) -> Result<Self> {
        let mut interned: HashMap<String, VehicleType> = HashMap::new();
        let mut type_names = Vec::new();
        let mut types = Vec::with_capacity(vehicles.len());

        for (index, scored) in vehicles.iter().enumerate() {
            if !(scored.vehicle.cost > 0.0) {
                return Err(CoreError::NonPositiveCost {
                    index,
                    name: scored.vehicle.name.clone(),
                    cost: scored.vehicle.cost,
                });
            }
            let t = *interned
                .entry(scored.vehicle.name.clone())
                .or_insert_with(|| {
                    type_names.push(scored.vehicle.name.clone());
                    VehicleType(type_names.len() as u32 - 1)
                });
            types.push(t);
        }

        Ok(Self {
            vehicles,
            type_names,
            types,
        })
    }

    /// Pairs vehicles with their throughput values.
    pub fn from_throughputs(vehicles: Vec<Vehicle>, theta_eff: Vec<f64>) -> Result<Self> {
        if vehicles.len() != theta_eff.len() {
            return Err(CoreError::ThroughputCount {
                expected: vehicles.len(),
                actual: theta_eff.len(),
            });
        }
        Self::new(
            vehicles
                .into_iter()
                .zip(theta_eff)
                .map(|(v, t)| ScoredVehicle::new(v, t))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    pub fn ids(&self) -> Range<VehicleId> {
        0..self.vehicles.len()
    }

    pub fn contains(&self, id: VehicleId) -> bool {
        id < self.vehicles.len()
    }

    pub fn get(&self, id: VehicleId) -> Option<&ScoredVehicle> {
        self.vehicles.get(id)
    }

    /// # Panics
    ///
    /// Panics if `id` is not part of the pool.
    #[inline]
    pub fn vehicle(&self, id: VehicleId) -> &ScoredVehicle {
        &self.vehicles[id]
    }

    pub fn vehicles(&self) -> &[ScoredVehicle] {
        &self.vehicles
    }

    #[inline]
    pub fn cost(&self, id: VehicleId) -> f64 {
        self.vehicles[id].vehicle.cost
    }

    #[inline]
    pub fn theta_eff(&self, id: VehicleId) -> f64 {
        self.vehicles[id].theta_eff
    }

    #[inline]
    pub fn score(&self, id: VehicleId) -> f64 {
        self.vehicles[id].score
    }

    #[inline]
    pub fn name(&self, id: VehicleId) -> &str {
        &self.vehicles[id].vehicle.name
    }

    #[inline]
    pub fn vehicle_type(&self, id: VehicleId) -> VehicleType {
        self.types[id]
    }

    pub fn type_name(&self, t: VehicleType) -> &str {
        &self.type_names[t.0 as usize]
    }

    pub fn type_count(&self) -> usize {
        self.type_names.len()
    }

    pub fn composition(&self, ids: &[VehicleId]) -> Composition {
        Composition::of(self, ids)
    }

    pub fn total_cost(&self, ids: &[VehicleId]) -> f64 {
        ids.iter().map(|&v| self.cost(v)).sum()
    }

    pub fn total_throughput(&self, ids: &[VehicleId]) -> f64 {
        ids.iter().map(|&v| self.theta_eff(v)).sum()
    }

    /// All vehicle ids ordered by descending score, ties by index.
    pub fn by_descending_score(&self) -> Vec<VehicleId> {
        let mut ids: Vec<VehicleId> = self.ids().collect();
        ids.sort_by(|&a, &b| self.score(b).total_cmp(&self.score(a)).then(a.cmp(&b)));
        ids
    }
}
