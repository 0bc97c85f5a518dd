//! Tests for termination conditions.

use std::time::Duration;

use fleetforge_test::fleet_with_costs;

use super::*;
use crate::oracle::OracleStatus;
use crate::scope::SolverScope;
use crate::test_utils::constant_oracle;

#[test]
fn test_oracle_call_termination() {
    let fleet = fleet_with_costs(&[1.0, 2.0, 3.0]);
    let mut solver_scope = SolverScope::new(&fleet, constant_oracle(OracleStatus::Feasible));
    let mut phase_scope = PhaseScope::new(&mut solver_scope, "Test");
    let term = OracleCallTermination::new(2);

    assert!(!term.is_terminated(&phase_scope));
    phase_scope.try_fleet(&[0], Duration::from_secs(1)).unwrap();
    assert!(!term.is_terminated(&phase_scope));
    phase_scope.try_fleet(&[1], Duration::from_secs(1)).unwrap();
    assert!(term.is_terminated(&phase_scope));
}

#[test]
fn test_time_termination() {
    let fleet = fleet_with_costs(&[1.0]);
    let mut solver_scope = SolverScope::new(&fleet, constant_oracle(OracleStatus::Feasible));
    let phase_scope = PhaseScope::new(&mut solver_scope, "Test");

    assert!(TimeTermination::new(Duration::ZERO).is_terminated(&phase_scope));
    assert!(!TimeTermination::seconds(3600).is_terminated(&phase_scope));
}

#[test]
fn test_or_termination() {
    let fleet = fleet_with_costs(&[1.0]);
    let mut solver_scope = SolverScope::new(&fleet, constant_oracle(OracleStatus::Feasible));
    let phase_scope = PhaseScope::new(&mut solver_scope, "Test");

    let neither = OrTermination((TimeTermination::seconds(3600), OracleCallTermination::new(5)));
    assert!(!neither.is_terminated(&phase_scope));

    let either = OrTermination((TimeTermination::seconds(3600), OracleCallTermination::new(0)));
    assert!(either.is_terminated(&phase_scope));
}

#[test]
fn test_phase_termination_without_call_limit() {
    let fleet = fleet_with_costs(&[1.0]);
    let mut solver_scope = SolverScope::new(&fleet, constant_oracle(OracleStatus::Feasible));
    let mut phase_scope = PhaseScope::new(&mut solver_scope, "Test");
    let term = phase_termination(Duration::from_secs(3600), None);

    for _ in 0..10 {
        phase_scope.try_fleet(&[0], Duration::from_secs(1)).unwrap();
    }
    assert!(!term.is_terminated(&phase_scope));
    assert!(phase_termination(Duration::from_secs(3600), Some(10)).is_terminated(&phase_scope));
}
