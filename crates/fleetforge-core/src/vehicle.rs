//! Vehicle records.

/// Index of a vehicle in the full pool.
pub type VehicleId = usize;

/// A rentable storage vehicle as read from the instance data.
///
/// Vehicles sharing a `name` are interchangeable copies of one type.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Vehicle {
    /// Type name; identical names mean identical vehicles.
    pub name: String,
    /// Storage capacity in kWh.
    pub capacity: f64,
    /// Charge at the start of the horizon in kWh.
    #[cfg_attr(feature = "serde", serde(default))]
    pub initial_charge: f64,
    /// Charge/discharge power in kW.
    pub power: f64,
    /// Consumption while driving in kWh/km.
    #[cfg_attr(feature = "serde", serde(default))]
    pub consumption: f64,
    /// Travel speed in km/h.
    #[cfg_attr(feature = "serde", serde(default))]
    pub speed: f64,
    /// Rental cost for the horizon.
    pub cost: f64,
}

impl Vehicle {
    /// Creates a vehicle with the fields the fleet search depends on.
    ///
    /// Driving parameters default to zero.
    pub fn new(name: impl Into<String>, capacity: f64, power: f64, cost: f64) -> Self {
        Self {
            name: name.into(),
            capacity,
            initial_charge: 0.0,
            power,
            consumption: 0.0,
            speed: 0.0,
            cost,
        }
    }

    pub fn with_initial_charge(mut self, charge: f64) -> Self {
        self.initial_charge = charge;
        self
    }

    pub fn with_driving(mut self, consumption: f64, speed: f64) -> Self {
        self.consumption = consumption;
        self.speed = speed;
        self
    }
}
