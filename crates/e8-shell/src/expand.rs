//! Vector Expander
//!
//! Turns one partition into every lattice vector with those magnitudes:
//! all distinct orderings, all sign choices on the non-zero entries, kept
//! only when the sublattice congruence holds.
//!
//! Distinct orderings come from stepping the sorted magnitudes through
//! lexicographic next-permutation, which visits each arrangement of a
//! multiset exactly once. A partition such as (1, 1, 0, 0, 0, 0, 0, 0) has
//! 28 arrangements rather than 8! = 40320.

use crate::partition::Partition;
use e8_core::{
    LatticeVector, Sublattice, COORDINATE_SCALE, DIMENSION, HALF_INTEGER_SUM_MODULUS,
    INTEGER_SUM_MODULUS,
};
use tracing::trace;

// =============================================================================
// DISTINCT PERMUTATIONS
// =============================================================================

/// Iterator over the distinct arrangements of eight values, in ascending
/// lexicographic order
pub struct DistinctPermutations {
    current: [u32; DIMENSION],
    done: bool,
}

impl DistinctPermutations {
    pub fn new(mut values: [u32; DIMENSION]) -> Self {
        values.sort_unstable();
        Self {
            current: values,
            done: false,
        }
    }
}

impl Iterator for DistinctPermutations {
    type Item = [u32; DIMENSION];

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.current;
        self.done = !next_permutation(&mut self.current);
        Some(item)
    }
}

/// Advance `values` to the next lexicographic arrangement
///
/// Returns `false` (leaving `values` untouched) when it is already the last.
fn next_permutation(values: &mut [u32]) -> bool {
    let Some(pivot) = values.windows(2).rposition(|w| w[0] < w[1]) else {
        return false;
    };
    // values[pivot + 1..] is non-increasing; find its rightmost entry above the pivot
    let successor = values
        .iter()
        .rposition(|&v| v > values[pivot])
        .unwrap_or(pivot + 1);
    values.swap(pivot, successor);
    values[pivot + 1..].reverse();
    true
}

// =============================================================================
// MEMBERSHIP FILTER
// =============================================================================

/// Congruence on the working integers of a sublattice
///
/// Integer vectors are checked on their coordinates, half-integer vectors on
/// their doubled coordinates.
#[inline]
fn passes_congruence(sublattice: Sublattice, working_sum: i64) -> bool {
    let modulus = match sublattice {
        Sublattice::Integer => INTEGER_SUM_MODULUS,
        Sublattice::HalfInteger => HALF_INTEGER_SUM_MODULUS,
    };
    working_sum.rem_euclid(modulus) == 0
}

/// Multiplier from working integers to stored (doubled) coordinates
#[inline]
fn storage_scale(sublattice: Sublattice) -> i32 {
    match sublattice {
        Sublattice::Integer => COORDINATE_SCALE,
        Sublattice::HalfInteger => 1,
    }
}

// =============================================================================
// EXPANSION
// =============================================================================

/// Append every lattice vector generated by `partition` to `out`
///
/// Returns how many vectors were appended. Vectors from one partition are
/// distinct by construction; `out` is not deduplicated here.
pub fn expand_into(
    partition: &Partition,
    sublattice: Sublattice,
    out: &mut Vec<LatticeVector>,
) -> usize {
    let before = out.len();
    let scale = storage_scale(sublattice);

    for arrangement in DistinctPermutations::new(*partition.values()) {
        let nonzero: Vec<usize> = (0..DIMENSION).filter(|&i| arrangement[i] != 0).collect();
        let unsigned: [i32; DIMENSION] = arrangement.map(|v| v as i32);

        for signs in 0u32..(1u32 << nonzero.len()) {
            let mut working = unsigned;
            for (bit, &index) in nonzero.iter().enumerate() {
                if signs & (1 << bit) != 0 {
                    working[index] = -working[index];
                }
            }

            let sum: i64 = working.iter().map(|&c| c as i64).sum();
            if passes_congruence(sublattice, sum) {
                out.push(LatticeVector::from_doubled_unchecked(working.map(|c| c * scale)));
            }
        }
    }

    let added = out.len() - before;
    trace!(%partition, %sublattice, vectors = added, "expanded partition");
    added
}

/// Every lattice vector generated by `partition`, sorted, without duplicates
pub fn expand(partition: &Partition, sublattice: Sublattice) -> Vec<LatticeVector> {
    let mut vectors = Vec::new();
    expand_into(partition, sublattice, &mut vectors);
    sort_dedup(&mut vectors);
    vectors
}

/// Put vectors into canonical (lexicographic) order and drop repeats
pub fn sort_dedup(vectors: &mut Vec<LatticeVector>) {
    vectors.sort_unstable();
    vectors.dedup();
}

// =============================================================================
// TESTS
// =============================================================================
