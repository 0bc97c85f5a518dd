//! Search statistics.
//!
//! Counts oracle calls by outcome together with their cumulative runtime,
//! plus the bookkeeping counters of the search phases.

use std::time::Duration;

use tracing::info;

use crate::oracle::OracleStatus;

/// Call count and cumulative oracle runtime of one outcome kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeStats {
    pub count: u64,
    pub runtime: Duration,
}

impl OutcomeStats {
    fn record(&mut self, runtime: Duration) {
        self.count += 1;
        self.runtime += runtime;
    }
}

/// Run-wide statistics of a fleet search.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use fleetforge_solver::{OracleStatus, SearchStatistics};
///
/// let mut stats = SearchStatistics::default();
/// stats.iterations += 2;
/// stats.record(OracleStatus::Feasible, Duration::from_secs(2));
/// stats.record(OracleStatus::Timeout, Duration::from_secs(5));
///
/// assert_eq!(stats.feasible.count, 1);
/// assert_eq!(stats.timeout.runtime, Duration::from_secs(5));
/// assert_eq!(stats.total_oracle_time(), Duration::from_secs(7));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchStatistics {
    /// Oracle calls made, including failed ones.
    pub iterations: u64,
    pub feasible: OutcomeStats,
    pub infeasible: OutcomeStats,
    pub timeout: OutcomeStats,
    /// Runtime of every feasible call, in call order.
    pub feasible_runtimes: Vec<Duration>,
    /// Calls where the oracle failed to answer.
    pub oracle_errors: u64,
    /// Candidates skipped because their composition was blacklisted.
    pub blacklist_hits: u64,
    /// Removal attempts that were not feasible.
    pub failed_removals: u64,
}

impl SearchStatistics {
    /// Records the outcome of an answered oracle call.
    pub fn record(&mut self, status: OracleStatus, runtime: Duration) {
        match status {
            OracleStatus::Feasible => {
                self.feasible.record(runtime);
                self.feasible_runtimes.push(runtime);
            }
            OracleStatus::Infeasible => self.infeasible.record(runtime),
            OracleStatus::Timeout => self.timeout.record(runtime),
        }
    }

    /// Total oracle runtime over all answered calls.
    pub fn total_oracle_time(&self) -> Duration {
        self.feasible.runtime + self.infeasible.runtime + self.timeout.runtime
    }

    /// Emits the statistics as one INFO event.
    pub fn log_summary(&self, label: &'static str, elapsed: Duration) {
        info!(
            event = "statistics",
            label = label,
            duration_ms = elapsed.as_millis() as u64,
            iterations = self.iterations,
            feasible = self.feasible.count,
            feasible_secs = self.feasible.runtime.as_secs_f64(),
            infeasible = self.infeasible.count,
            infeasible_secs = self.infeasible.runtime.as_secs_f64(),
            timeouts = self.timeout.count,
            timeout_secs = self.timeout.runtime.as_secs_f64(),
            oracle_errors = self.oracle_errors,
            blacklist_hits = self.blacklist_hits,
            failed_removals = self.failed_removals,
        );
    }
}
