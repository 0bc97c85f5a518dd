//! Shared test fixtures for FleetForge crates.
//!
//! This crate provides data types and pure functions for testing.
//! It depends on `fleetforge-core` only, so every crate can use it as a
//! dev-dependency without cycles.
//!
//! - [`fleet`] - fleets built directly from costs and throughputs
//! - [`instance`] - small, valid problem instances
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! fleetforge-test = { workspace = true }
//! ```
//!
//! ```ignore
//! use fleetforge_test::fleet::{fleet_with_costs, typed_fleet};
//! ```

pub mod fleet;
pub mod instance;

pub use fleet::{fleet_with_costs, typed_fleet, uniform_fleet};
pub use instance::{depot_and_consumers, two_type_instance};
