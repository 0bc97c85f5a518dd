//! Replacement candidates for switch moves.
//!
//! A candidate is a group of one to three unused vehicles whose combined
//! cost stays strictly below a ceiling (the cost of the vehicles it would
//! replace). Groups are deduplicated by [`Composition`]: of all index
//! tuples with the same multiset of vehicle types, only the
//! lexicographically smallest one is kept.

use std::cmp::Ordering;
use std::collections::HashSet;

use fleetforge_core::{Composition, Fleet, VehicleId};
use smallvec::SmallVec;

/// Up to three vehicle ids, sorted ascending.
pub type Selection = SmallVec<[VehicleId; 3]>;

/// Largest replacement group considered.
pub const MAX_CANDIDATE_SIZE: usize = 3;

/// A replacement group with its combined cost and throughput.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub vehicles: Selection,
    pub cost: f64,
    pub throughput: f64,
}

impl Candidate {
    fn new(fleet: &Fleet, vehicles: Selection) -> Self {
        Self {
            cost: fleet.total_cost(&vehicles),
            throughput: fleet.total_throughput(&vehicles),
            vehicles,
        }
    }

    /// Scan order: higher throughput first, then lower cost, then the
    /// index tuple.
    fn scan_order(&self, other: &Self) -> Ordering {
        other
            .throughput
            .total_cmp(&self.throughput)
            .then(self.cost.total_cmp(&other.cost))
            .then_with(|| self.vehicles.cmp(&other.vehicles))
    }
}

/// Generates replacement candidates from the unused part of a fleet.
#[derive(Debug, Clone, Copy)]
pub struct CandidateGenerator<'f> {
    fleet: &'f Fleet,
}

impl<'f> CandidateGenerator<'f> {
    pub fn new(fleet: &'f Fleet) -> Self {
        Self { fleet }
    }

    /// All deduplicated groups of one to three `unused` vehicles cheaper
    /// than `ceiling`, in scan order.
    ///
    /// Returns an empty list if nothing fits under the ceiling.
    pub fn generate(&self, ceiling: f64, unused: &[VehicleId]) -> Vec<Candidate> {
        let fleet = self.fleet;

        // costs are positive, so no member of a valid group reaches the ceiling alone
        let mut pool: Vec<VehicleId> = unused
            .iter()
            .copied()
            .filter(|&v| fleet.contains(v) && fleet.cost(v) < ceiling)
            .collect();
        pool.sort_unstable();
        pool.dedup();

        let mut seen: HashSet<Composition> = HashSet::new();
        let mut candidates = Vec::new();
        let mut offer = |vehicles: Selection| {
            if seen.insert(fleet.composition(&vehicles)) {
                candidates.push(Candidate::new(fleet, vehicles));
            }
        };

        for (i, &a) in pool.iter().enumerate() {
            let cost_a = fleet.cost(a);
            offer(SmallVec::from_slice(&[a]));

            for (j, &b) in pool.iter().enumerate().skip(i + 1) {
                let cost_ab = cost_a + fleet.cost(b);
                if cost_ab >= ceiling {
                    continue;
                }
                offer(SmallVec::from_slice(&[a, b]));

                for &c in &pool[j + 1..] {
                    if cost_ab + fleet.cost(c) < ceiling {
                        offer(SmallVec::from_slice(&[a, b, c]));
                    }
                }
            }
        }

        candidates.sort_by(Candidate::scan_order);
        candidates
    }
}

/// The `k`-subsets of `vehicles` to try swapping out, one per composition.
///
/// Subsets are the `k`-combinations of `vehicles` in their given order;
/// the first combination of each composition is kept.
pub fn swap_out_subsets(fleet: &Fleet, vehicles: &[VehicleId], k: usize) -> Vec<Selection> {
    let n = vehicles.len();
    if k == 0 || k > n {
        return Vec::new();
    }

    let mut seen: HashSet<Composition> = HashSet::new();
    let mut subsets = Vec::new();
    let mut positions: Vec<usize> = (0..k).collect();

    loop {
        let subset: Selection = positions.iter().map(|&p| vehicles[p]).collect();
        if seen.insert(fleet.composition(&subset)) {
            subsets.push(subset);
        }

        // advance to the next combination in lexicographic position order
        let Some(i) = (0..k).rev().find(|&i| positions[i] < n - k + i) else {
            break;
        };
        positions[i] += 1;
        for j in i + 1..k {
            positions[j] = positions[j - 1] + 1;
        }
    }

    subsets
}
