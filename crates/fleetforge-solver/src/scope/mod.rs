//! Scope hierarchy for a fleet search.
//!
//! - [`SolverScope`]: the whole run; owns the oracle adapter, the blacklist
//!   and the run clock
//! - [`PhaseScope`]: one phase; counts the phase's oracle calls and time

mod phase;
mod solver;

pub use phase::PhaseScope;
pub use solver::{SolverScope, Trial};
