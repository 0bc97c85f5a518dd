//! OR-composition of terminations.
//!
//! Uses macro-generated tuple implementations, so no boxing is needed.

use super::Termination;
use crate::oracle::FeasibilityOracle;
use crate::scope::PhaseScope;

/// Terminates when ANY wrapped termination does.
///
/// # Examples
///
/// ```
/// use fleetforge_solver::{OracleCallTermination, OrTermination, TimeTermination};
///
/// // Stop after 60 seconds or 100 oracle calls
/// let termination = OrTermination((
///     TimeTermination::seconds(60),
///     OracleCallTermination::new(100),
/// ));
/// ```
#[derive(Debug, Clone)]
pub struct OrTermination<T>(pub T);

impl<T> OrTermination<T> {
    pub fn new(terminations: T) -> Self {
        Self(terminations)
    }
}

macro_rules! impl_or_termination {
    ($($idx:tt: $T:ident),+) => {
        impl<O, $($T),+> Termination<O> for OrTermination<($($T,)+)>
        where
            O: FeasibilityOracle,
            $($T: Termination<O>,)+
        {
            fn is_terminated(&self, phase_scope: &PhaseScope<'_, '_, O>) -> bool {
                $((self.0).$idx.is_terminated(phase_scope))||+
            }
        }
    };
}

impl_or_termination!(0: T0);
impl_or_termination!(0: T0, 1: T1);
impl_or_termination!(0: T0, 1: T1, 2: T2);
impl_or_termination!(0: T0, 1: T1, 2: T2, 3: T3);
