//! Blacklist of infeasible compositions.
//!
//! Entries are canonical [`Composition`]s, so a set that differs from a
//! known infeasible one only by interchangeable vehicles of the same type
//! is recognised without asking the oracle again. The store is
//! append-only for the whole run.

use std::collections::HashSet;

use fleetforge_core::Composition;

/// Append-only set of compositions known to be infeasible.
///
/// # Example
///
/// ```
/// use fleetforge_core::{Composition, VehicleType};
/// use fleetforge_solver::Blacklist;
///
/// let mut blacklist = Blacklist::new();
/// let key = Composition::from_types([VehicleType(1), VehicleType(0)]);
/// blacklist.add(key.clone());
/// blacklist.add(key.clone());
///
/// assert!(blacklist.contains(&Composition::from_types([VehicleType(0), VehicleType(1)])));
/// assert_eq!(blacklist.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Blacklist {
    entries: HashSet<Composition>,
}

impl Blacklist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, composition: &Composition) -> bool {
        self.entries.contains(composition)
    }

    /// Records `composition` as infeasible.
    ///
    /// Returns false if it was already present.
    pub fn add(&mut self, composition: Composition) -> bool {
        self.entries.insert(composition)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
