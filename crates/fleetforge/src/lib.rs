//! FleetForge - minimum-cost fleet search in Rust
//!
//! Picks the cheapest set of vehicles that still lets an external routing
//! model serve an energy transport instance. The routing model is only
//! consulted through a [`FeasibilityOracle`]; everything else is wired by
//! [`solve`].
//!
//! # Example
//!
//! ```rust
//! use fleetforge::prelude::*;
//!
//! let config = FleetConfig::from_toml_str(
//!     r#"
//!     time_limit_seconds = 600
//!
//!     [switch]
//!     max_swap_out = 2
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.switch.max_swap_out, 2);
//! assert_eq!(config.init.strategy, InitStrategy::Bisection);
//! ```

mod solve;

pub use solve::{solve, solve_and_route, solve_with_sender, FleetError, RoutedSolution, RoutingSolver};

// Problem data
pub use fleetforge_core::{
    Composition, CoreError, Fleet, Instance, Node, NodeKind, TimeGrid, Vehicle, VehicleId,
};

// Scoring
pub use fleetforge_scoring::{score_fleet, EnergyBalance};

// Configuration
pub use fleetforge_config::{
    instance_from_toml_file, instance_from_toml_str, instance_from_yaml_file,
    instance_from_yaml_str, ConfigError, FleetConfig, InitStrategy,
};

// Search
pub use fleetforge_solver::{
    FeasibilityOracle, FleetSnapshot, FleetSolution, FleetSolver, OracleError, OracleOutcome,
    OracleStatus, SearchError, SearchStatistics,
};

#[cfg(feature = "console")]
pub use fleetforge_console as console;

pub mod prelude {
    pub use super::{solve, solve_and_route, FleetError, RoutingSolver};
    pub use super::{FeasibilityOracle, OracleError, OracleOutcome, OracleStatus};
    pub use super::{FleetConfig, FleetSolution, InitStrategy, Instance, VehicleId};
}
