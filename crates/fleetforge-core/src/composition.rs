//! Canonical composition keys.
//!
//! A composition is the sorted multiset of vehicle types of a vehicle set.
//! Two sets whose vehicles differ only by interchangeable copies of the same
//! type share a composition, so both candidate deduplication and the
//! infeasibility blacklist key on it instead of on vehicle indices.

use std::fmt;

use crate::fleet::Fleet;
use crate::vehicle::VehicleId;

/// Interned vehicle type (one per distinct vehicle name).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VehicleType(pub u32);

/// Sorted multiset of vehicle types.
///
/// # Example
///
/// ```
/// use fleetforge_core::{Composition, VehicleType};
///
/// let a = Composition::from_types([VehicleType(2), VehicleType(0), VehicleType(2)]);
/// let b = Composition::from_types([VehicleType(2), VehicleType(2), VehicleType(0)]);
/// assert_eq!(a, b);
/// assert_eq!(a.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Composition(Box<[VehicleType]>);

impl Composition {
    pub fn from_types(types: impl IntoIterator<Item = VehicleType>) -> Self {
        let mut types: Vec<VehicleType> = types.into_iter().collect();
        types.sort_unstable();
        Self(types.into_boxed_slice())
    }

    /// Composition of the given vehicles of `fleet`.
    pub fn of(fleet: &Fleet, vehicles: &[VehicleId]) -> Self {
        Self::from_types(vehicles.iter().map(|&v| fleet.vehicle_type(v)))
    }

    pub fn types(&self) -> &[VehicleType] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Renders the composition with the type names of `fleet`.
    pub fn display<'a>(&'a self, fleet: &'a Fleet) -> CompositionDisplay<'a> {
        CompositionDisplay {
            composition: self,
            fleet,
        }
    }
}

/// [`fmt::Display`] adapter listing type names, e.g. `[van, van, truck]`.
pub struct CompositionDisplay<'a> {
    composition: &'a Composition,
    fleet: &'a Fleet,
}

impl fmt::Display for CompositionDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, &t) in self.composition.types().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(self.fleet.type_name(t))?;
        }
        f.write_str("]")
    }
}
