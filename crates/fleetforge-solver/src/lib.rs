//! FleetForge Solver Engine
//!
//! Searches for a cheap vehicle subset that an external feasibility
//! oracle accepts. This crate provides:
//! - The oracle contract and its statistics-keeping adapter
//! - The composition blacklist
//! - Replacement candidate generation
//! - Initialization phases (bisection, greedy) and improvement phases
//!   (removals, k-for-X switches)
//! - Phase terminations
//! - [`FleetSolver`], the controller running all phases under one budget

pub mod blacklist;
pub mod candidate;
pub mod error;
pub mod oracle;
pub mod phase;
pub mod scope;
pub mod solver;
pub mod state;
pub mod statistics;
pub mod termination;

#[cfg(test)]
mod test_utils;

pub use blacklist::Blacklist;
pub use candidate::{swap_out_subsets, Candidate, CandidateGenerator, Selection};
pub use error::SearchError;
pub use oracle::{Evaluation, Evaluator, FeasibilityOracle, OracleError, OracleOutcome, OracleStatus};
pub use phase::{
    bisection::BisectionInit, greedy::GreedyInit, removal::RemovalPhase, switch::SwitchPhase,
    InitPhase, Phase, PhaseOutcome,
};
pub use scope::{PhaseScope, SolverScope, Trial};
pub use solver::{FleetSnapshot, FleetSolution, FleetSolver};
pub use state::SearchState;
pub use statistics::{OutcomeStats, SearchStatistics};
pub use termination::{
    phase_termination, OracleCallTermination, OrTermination, PhaseTermination, Termination,
    TimeTermination,
};
