//! FleetForge Core - fleet data types shared by every FleetForge crate
//!
//! This crate provides the read-only data a fleet search works on:
//! - [`Vehicle`] and [`Node`] records of a problem instance
//! - [`Instance`] snapshot with its [`TimeGrid`]
//! - [`Fleet`], the scored vehicle pool with interned vehicle types
//! - [`Composition`], the canonical multiset-of-types key of a vehicle set

pub mod composition;
pub mod error;
pub mod fleet;
pub mod instance;
pub mod node;
pub mod vehicle;

pub use composition::{Composition, CompositionDisplay, VehicleType};
pub use error::{CoreError, Result};
pub use fleet::{Fleet, ScoredVehicle};
pub use instance::{Instance, TimeGrid};
pub use node::{Node, NodeKind};
pub use vehicle::{Vehicle, VehicleId};
