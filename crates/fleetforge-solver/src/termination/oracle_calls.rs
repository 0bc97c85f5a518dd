//! Oracle call count termination.

use super::Termination;
use crate::oracle::FeasibilityOracle;
use crate::scope::PhaseScope;

/// Terminates once the phase has made `limit` oracle calls.
///
/// Blacklist hits do not count as calls.
#[derive(Debug, Clone)]
pub struct OracleCallTermination {
    limit: u64,
}

impl OracleCallTermination {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }

    /// Never terminates.
    pub fn unlimited() -> Self {
        Self::new(u64::MAX)
    }
}

impl<O: FeasibilityOracle> Termination<O> for OracleCallTermination {
    fn is_terminated(&self, phase_scope: &PhaseScope<'_, '_, O>) -> bool {
        phase_scope.oracle_calls() >= self.limit
    }
}
