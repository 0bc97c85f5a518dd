//! Cumulative energy balance of an instance.

use fleetforge_core::{Instance, NodeKind};

/// Energy demand and supply summed over the active part of the horizon.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnergyBalance {
    /// Energy drawn by consumers.
    pub consumed: f64,
    /// Energy generated by producers.
    pub produced: f64,
    /// Energy stored at consumers at the start.
    pub consumer_initial: f64,
    /// Energy stored at producers at the start.
    pub producer_initial: f64,
    /// Number of intervals summed.
    pub steps: usize,
}

impl EnergyBalance {
    pub fn of(instance: &Instance) -> Self {
        let mut balance = Self {
            steps: instance.time.active_steps().len(),
            ..Self::default()
        };
        for node in &instance.nodes {
            let summed: f64 = instance
                .time
                .active_steps()
                .map(|t| node.energy_at(t))
                .sum();
            match node.kind {
                NodeKind::Consumer => {
                    balance.consumed += summed;
                    balance.consumer_initial += node.initial_charge;
                }
                NodeKind::Producer => {
                    balance.produced += summed;
                    balance.producer_initial += node.initial_charge;
                }
                NodeKind::Depot | NodeKind::Other => {}
            }
        }
        balance
    }

    /// Energy vehicles have to deliver to consumers.
    pub fn required(&self) -> f64 {
        self.consumed - self.consumer_initial
    }

    /// Energy vehicles can collect from producers.
    pub fn available(&self) -> f64 {
        self.produced + self.producer_initial
    }

    pub fn is_deficient(&self) -> bool {
        self.available() < self.required()
    }

    /// Combined vehicle throughput per interval needed to serve demand.
    ///
    /// Every delivered unit has to be picked up first, hence the factor two.
    pub fn target_throughput(&self) -> f64 {
        if self.steps == 0 {
            return 0.0;
        }
        2.0 * self.required() / self.steps as f64
    }
}
