//! Termination conditions for search phases.
//!
//! Conditions are checked between oracle calls; a running call is never
//! interrupted, so every budget is a soft ceiling.

mod composite;
mod oracle_calls;
mod time;

use std::fmt::Debug;
use std::time::Duration;

use crate::oracle::FeasibilityOracle;
use crate::scope::PhaseScope;

pub use composite::OrTermination;
pub use oracle_calls::OracleCallTermination;
pub use time::TimeTermination;

/// Trait for determining when a phase should stop.
///
/// # Type Parameters
/// * `O` - The feasibility oracle
pub trait Termination<O: FeasibilityOracle>: Debug {
    /// Returns true if the phase should stop before its next oracle call.
    fn is_terminated(&self, phase_scope: &PhaseScope<'_, '_, O>) -> bool;
}

/// Default phase termination: a time budget or an oracle call cap.
pub type PhaseTermination = OrTermination<(TimeTermination, OracleCallTermination)>;

/// Builds a [`PhaseTermination`]; no call cap if `oracle_call_limit` is `None`.
pub fn phase_termination(time_limit: Duration, oracle_call_limit: Option<u64>) -> PhaseTermination {
    OrTermination((
        TimeTermination::new(time_limit),
        oracle_call_limit.map_or_else(OracleCallTermination::unlimited, OracleCallTermination::new),
    ))
}

#[cfg(test)]
mod tests;
