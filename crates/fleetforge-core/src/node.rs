//! Energy network nodes.

/// Role of a node in the energy network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NodeKind {
    /// Vehicle home base.
    Depot,
    /// Node drawing energy that vehicles must deliver.
    Consumer,
    /// Node producing energy that vehicles must collect.
    Producer,
    /// Any other location.
    Other,
}

/// A node of the energy network.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
    /// Local storage capacity in kWh.
    #[cfg_attr(feature = "serde", serde(default))]
    pub capacity: f64,
    /// Stored energy at the start of the horizon in kWh.
    #[cfg_attr(feature = "serde", serde(default))]
    pub initial_charge: f64,
    /// Charge/discharge power available to vehicles in kW.
    #[cfg_attr(feature = "serde", serde(default))]
    pub power: f64,
    /// Energy consumed or produced during each time interval, in kWh.
    ///
    /// Empty for nodes without a profile.
    #[cfg_attr(feature = "serde", serde(default))]
    pub energy: Vec<f64>,
}

impl Node {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            capacity: 0.0,
            initial_charge: 0.0,
            power: 0.0,
            energy: Vec::new(),
        }
    }

    pub fn with_storage(mut self, capacity: f64, initial_charge: f64, power: f64) -> Self {
        self.capacity = capacity;
        self.initial_charge = initial_charge;
        self.power = power;
        self
    }

    pub fn with_energy(mut self, energy: Vec<f64>) -> Self {
        self.energy = energy;
        self
    }

    /// Returns true for consumers and producers.
    pub fn has_profile(&self) -> bool {
        matches!(self.kind, NodeKind::Consumer | NodeKind::Producer)
    }

    /// Energy of interval `t`, zero outside the profile.
    pub fn energy_at(&self, t: usize) -> f64 {
        self.energy.get(t).copied().unwrap_or(0.0)
    }
}
