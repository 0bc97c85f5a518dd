//! Time-based termination.

use std::time::Duration;

use super::Termination;
use crate::oracle::FeasibilityOracle;
use crate::scope::PhaseScope;

/// Terminates once the phase has run for its time limit.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use fleetforge_solver::TimeTermination;
///
/// let term = TimeTermination::new(Duration::from_secs(120));
/// let term = TimeTermination::seconds(120);
/// let term = TimeTermination::millis(500);
/// ```
#[derive(Debug, Clone)]
pub struct TimeTermination {
    limit: Duration,
}

impl TimeTermination {
    pub fn new(limit: Duration) -> Self {
        Self { limit }
    }

    pub fn millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn seconds(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }
}

impl<O: FeasibilityOracle> Termination<O> for TimeTermination {
    fn is_terminated(&self, phase_scope: &PhaseScope<'_, '_, O>) -> bool {
        phase_scope.elapsed() >= self.limit
    }
}
