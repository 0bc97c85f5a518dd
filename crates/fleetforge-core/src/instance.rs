//! Problem instance snapshot.

use std::ops::Range;

use crate::error::{CoreError, Result};
use crate::node::Node;
use crate::vehicle::Vehicle;

/// Smallest number of time instances the throughput model supports.
pub const MIN_TIME_STEPS: usize = 6;

/// Discretisation of the planning horizon.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct TimeGrid {
    /// Length of one interval in hours.
    pub step_hours: f64,
    /// Number of time instances, including the initial and final one.
    pub steps: usize,
}

impl TimeGrid {
    pub fn new(step_hours: f64, steps: usize) -> Self {
        Self { step_hours, steps }
    }

    /// Builds a grid covering `horizon_hours` in steps of `step_hours`.
    pub fn from_horizon(horizon_hours: f64, step_hours: f64) -> Self {
        let intervals = (horizon_hours / step_hours).floor() as usize;
        Self::new(step_hours, intervals + 1)
    }

    /// Intervals in which vehicles can actually transfer energy.
    ///
    /// The first instance is spent leaving the depot and the last two
    /// returning to it.
    pub fn active_steps(&self) -> Range<usize> {
        1..self.steps.saturating_sub(2)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.step_hours > 0.0) {
            return Err(CoreError::TimeGrid(format!(
                "step length must be positive, got {}",
                self.step_hours
            )));
        }
        if self.steps < MIN_TIME_STEPS {
            return Err(CoreError::TimeGrid(format!(
                "need at least {MIN_TIME_STEPS} time instances, got {}",
                self.steps
            )));
        }
        Ok(())
    }
}

/// Read-only input of one fleet search run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Instance {
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    pub time: TimeGrid,
    pub vehicles: Vec<Vehicle>,
    pub nodes: Vec<Node>,
}

impl Instance {
    pub fn new(time: TimeGrid, vehicles: Vec<Vehicle>, nodes: Vec<Node>) -> Self {
        Self {
            name: String::new(),
            time,
            vehicles,
            nodes,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Consumer and producer nodes.
    pub fn profiled_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.has_profile())
    }

    /// Checks the invariants the scoring and search code relies on.
    pub fn validate(&self) -> Result<()> {
        self.time.validate()?;
        for (index, vehicle) in self.vehicles.iter().enumerate() {
            if !(vehicle.cost > 0.0) {
                return Err(CoreError::NonPositiveCost {
                    index,
                    name: vehicle.name.clone(),
                    cost: vehicle.cost,
                });
            }
        }
        for node in self.profiled_nodes() {
            if !node.energy.is_empty() && node.energy.len() != self.time.steps {
                return Err(CoreError::ProfileLength {
                    name: node.name.clone(),
                    expected: self.time.steps,
                    actual: node.energy.len(),
                });
            }
        }
        Ok(())
    }
}
