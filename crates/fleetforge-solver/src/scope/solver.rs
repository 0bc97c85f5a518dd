//! Run-level scope.

use std::time::{Duration, Instant};

use fleetforge_core::{Fleet, VehicleId};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, trace};

use crate::blacklist::Blacklist;
use crate::error::SearchError;
use crate::oracle::{Evaluation, Evaluator, FeasibilityOracle};
use crate::solver::FleetSnapshot;
use crate::statistics::SearchStatistics;

/// Outcome of trying a vehicle set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trial {
    /// The composition is known to be infeasible; the oracle was not asked.
    Blacklisted,
    Evaluated(Evaluation),
}

impl Trial {
    pub fn is_feasible(&self) -> bool {
        matches!(self, Trial::Evaluated(e) if e.is_feasible())
    }

    pub fn was_evaluated(&self) -> bool {
        matches!(self, Trial::Evaluated(_))
    }
}

/// Top-level scope of one fleet search.
///
/// All search data is owned here and handed to phases by `&mut`; nothing
/// is shared between phases implicitly.
pub struct SolverScope<'f, O: FeasibilityOracle> {
    fleet: &'f Fleet,
    evaluator: Evaluator<O>,
    blacklist: Blacklist,
    start_time: Option<Instant>,
    sender: Option<UnboundedSender<FleetSnapshot>>,
}

impl<'f, O: FeasibilityOracle> SolverScope<'f, O> {
    pub fn new(fleet: &'f Fleet, oracle: O) -> Self {
        Self {
            fleet,
            evaluator: Evaluator::new(oracle),
            blacklist: Blacklist::new(),
            start_time: None,
            sender: None,
        }
    }

    /// Streams every published fleet to `sender`.
    pub fn with_sender(mut self, sender: UnboundedSender<FleetSnapshot>) -> Self {
        self.sender = Some(sender);
        self
    }

    pub fn start_solving(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Time since [`start_solving`](Self::start_solving), zero before it.
    pub fn elapsed(&self) -> Duration {
        self.start_time.map(|t| t.elapsed()).unwrap_or_default()
    }

    pub fn fleet(&self) -> &'f Fleet {
        self.fleet
    }

    pub fn blacklist(&self) -> &Blacklist {
        &self.blacklist
    }

    pub fn blacklist_mut(&mut self) -> &mut Blacklist {
        &mut self.blacklist
    }

    pub fn statistics(&self) -> &SearchStatistics {
        self.evaluator.statistics()
    }

    pub fn statistics_mut(&mut self) -> &mut SearchStatistics {
        self.evaluator.statistics_mut()
    }

    pub fn evaluator(&self) -> &Evaluator<O> {
        &self.evaluator
    }

    /// Tries `vehicles` unless their composition is blacklisted.
    ///
    /// Non-feasible answers are blacklisted. A blacklist hit is counted
    /// and nothing else is recorded.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Oracle`] if the oracle fails; the composition
    /// is blacklisted first.
    pub fn try_fleet(
        &mut self,
        vehicles: &[VehicleId],
        time_limit: Duration,
    ) -> Result<Trial, SearchError> {
        let composition = self.fleet.composition(vehicles);
        if self.blacklist.contains(&composition) {
            self.evaluator.statistics_mut().blacklist_hits += 1;
            trace!(
                event = "blacklist_hit",
                composition = %composition.display(self.fleet),
            );
            return Ok(Trial::Blacklisted);
        }

        match self.evaluator.evaluate(vehicles, time_limit) {
            Ok(evaluation) => {
                debug!(
                    event = "oracle_call",
                    vehicles = ?vehicles,
                    cost = self.fleet.total_cost(vehicles),
                    status = %evaluation.status,
                    runtime_ms = evaluation.runtime.as_millis() as u64,
                );
                if !evaluation.is_feasible() {
                    self.blacklist.add(composition);
                }
                Ok(Trial::Evaluated(evaluation))
            }
            Err(err) => {
                self.blacklist.add(composition);
                Err(err.into())
            }
        }
    }

    /// Sends `snapshot` to the consumer, if one is attached.
    pub fn publish(&self, snapshot: FleetSnapshot) {
        if let Some(sender) = &self.sender {
            // a dropped receiver only means nobody is listening anymore
            let _ = sender.send(snapshot);
        }
    }

    /// Consumes the scope, returning the final statistics.
    pub fn into_statistics(self) -> SearchStatistics {
        self.evaluator.statistics().clone()
    }
}

impl<O: FeasibilityOracle> std::fmt::Debug for SolverScope<'_, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolverScope")
            .field("fleet_size", &self.fleet.len())
            .field("blacklist", &self.blacklist.len())
            .field("elapsed", &self.elapsed())
            .finish()
    }
}
