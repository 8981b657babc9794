//! Shell Aggregator
//!
//! Runs the partition search for each sublattice a regime covers, expands
//! every partition, and merges the vectors into one sorted, duplicate-free
//! sequence.

use crate::expand::{expand_into, sort_dedup};
use crate::partition::{par_partitions, partitions, Partition};
use e8_core::{LatticeError, LatticeResult, LatticeVector, NormSq, Regime, Sublattice};
use num_rational::Ratio;
use rayon::prelude::*;
use std::ops::Index;
use std::sync::Arc;
use tracing::debug;

// =============================================================================
// EXECUTION
// =============================================================================

/// How a shell computation uses threads
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Execution {
    /// Everything on the calling thread
    Sequential,
    /// Top-level search branches, expansion and the two sublattices on rayon
    #[default]
    Parallel,
}

// =============================================================================
// GENERATION
// =============================================================================

/// Vectors of one sublattice at `norm_sq`, unsorted
fn generate_sublattice(
    norm_sq: NormSq,
    sublattice: Sublattice,
    execution: Execution,
) -> Vec<LatticeVector> {
    let found: Vec<Partition> = match execution {
        Execution::Sequential => partitions(sublattice, norm_sq),
        Execution::Parallel => par_partitions(sublattice, norm_sq),
    };

    let vectors = match execution {
        Execution::Sequential => {
            let mut out = Vec::new();
            for partition in &found {
                expand_into(partition, sublattice, &mut out);
            }
            out
        }
        Execution::Parallel => found
            .par_iter()
            .flat_map_iter(|partition| {
                let mut out = Vec::new();
                expand_into(partition, sublattice, &mut out);
                out
            })
            .collect(),
    };

    debug!(
        norm_sq = norm_sq.get(),
        %sublattice,
        partitions = found.len(),
        vectors = vectors.len(),
        "generated sublattice"
    );
    vectors
}

/// Sorted, duplicate-free vectors of `regime` at `norm_sq`
pub fn generate(norm_sq: NormSq, regime: Regime, execution: Execution) -> Vec<LatticeVector> {
    let mut vectors = match (regime, execution) {
        (Regime::Both, Execution::Parallel) => {
            let (mut integer, half) = rayon::join(
                || generate_sublattice(norm_sq, Sublattice::Integer, execution),
                || generate_sublattice(norm_sq, Sublattice::HalfInteger, execution),
            );
            integer.extend(half);
            integer
        }
        _ => regime
            .sublattices()
            .iter()
            .flat_map(|&s| generate_sublattice(norm_sq, s, execution))
            .collect(),
    };
    sort_dedup(&mut vectors);
    vectors
}

// =============================================================================
// SHELL
// =============================================================================

/// The E8 vectors of one squared norm in one regime, sorted lexicographically
///
/// Cloning shares the underlying vectors.
#[derive(Debug, Clone)]
pub struct Shell {
    norm_sq: NormSq,
    regime: Regime,
    vectors: Arc<[LatticeVector]>,
}

impl Shell {
    /// Compute a shell directly, without caching
    pub fn compute(norm_sq: NormSq, regime: Regime, execution: Execution) -> Self {
        Self {
            norm_sq,
            regime,
            vectors: generate(norm_sq, regime, execution).into(),
        }
    }

    /// Validate `norm_sq` and compute the shell, without caching
    pub fn compute_checked(
        norm_sq: i64,
        regime: Regime,
        execution: Execution,
    ) -> LatticeResult<Self> {
        Ok(Self::compute(NormSq::try_from(norm_sq)?, regime, execution))
    }

    pub fn norm_sq(&self) -> NormSq {
        self.norm_sq
    }

    pub fn regime(&self) -> Regime {
        self.regime
    }

    /// Number of vectors
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Vector at `index` in sorted order
    pub fn get(&self, index: usize) -> Option<&LatticeVector> {
        self.vectors.get(index)
    }

    /// Vector at `index`, or `IndexOutOfRange`
    pub fn try_get(&self, index: usize) -> LatticeResult<&LatticeVector> {
        self.vectors.get(index).ok_or(LatticeError::IndexOutOfRange {
            index,
            len: self.vectors.len(),
        })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LatticeVector> {
        self.vectors.iter()
    }

    pub fn as_slice(&self) -> &[LatticeVector] {
        &self.vectors
    }

    /// Membership by binary search over the sorted vectors
    pub fn contains(&self, vector: &LatticeVector) -> bool {
        self.vectors.binary_search(vector).is_ok()
    }

    /// Number of vectors belonging to `sublattice`
    pub fn count_in(&self, sublattice: Sublattice) -> usize {
        self.vectors
            .iter()
            .filter(|v| v.sublattice() == sublattice)
            .count()
    }

    /// Exact sum over the shell of the product of each vector's coordinates
    pub fn product_sum(&self) -> LatticeResult<Ratio<i128>> {
        let doubled = self.vectors.iter().try_fold(0i128, |acc, v| {
            acc.checked_add(v.doubled_product()?)
                .ok_or(LatticeError::Overflow { context: "product sum" })
        })?;
        Ok(Ratio::new(doubled, e8_core::PRODUCT_DENOMINATOR))
    }
}

impl PartialEq for Shell {
    fn eq(&self, other: &Self) -> bool {
        self.norm_sq == other.norm_sq
            && self.regime == other.regime
            && self.vectors[..] == other.vectors[..]
    }
}

impl Eq for Shell {}

impl Index<usize> for Shell {
    type Output = LatticeVector;

    fn index(&self, index: usize) -> &Self::Output {
        &self.vectors[index]
    }
}

impl<'a> IntoIterator for &'a Shell {
    type Item = &'a LatticeVector;
    type IntoIter = std::slice::Iter<'a, LatticeVector>;

    fn into_iter(self) -> Self::IntoIter {
        self.vectors.iter()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use e8_core::{half_integer_shell_size, integer_shell_size, theta_coefficient, BigUint};

    fn shell(n: u32, regime: Regime) -> Shell {
        Shell::compute(NormSq::from(n), regime, Execution::Sequential)
    }

    #[test]
    fn test_norm_zero() {
        let both = shell(0, Regime::Both);
        assert_eq!(both.as_slice(), &[LatticeVector::ZERO]);
        assert_eq!(shell(0, Regime::Integer).len(), 1);
        assert!(shell(0, Regime::HalfInteger).is_empty());
    }

    #[test]
    fn test_roots() {
        assert_eq!(shell(2, Regime::Integer).len(), 112);
        assert_eq!(shell(2, Regime::HalfInteger).len(), 128);
        let roots = shell(2, Regime::Both);
        assert_eq!(roots.len(), 240);
        assert_eq!(roots.count_in(Sublattice::Integer), 112);
        assert_eq!(roots.count_in(Sublattice::HalfInteger), 128);
    }

    #[test]
    fn test_odd_norms_empty() {
        for n in [1, 3, 5, 7] {
            assert!(shell(n, Regime::Both).is_empty(), "n={}", n);
        }
    }

    #[test]
    fn test_sizes_match_formulas() {
        for n in 0..=10u32 {
            let i = n as i64;
            let size = |regime| BigUint::from(shell(n, regime).len());
            assert_eq!(size(Regime::Integer), integer_shell_size(i).unwrap());
            assert_eq!(size(Regime::HalfInteger), half_integer_shell_size(i).unwrap());
            assert_eq!(size(Regime::Both), theta_coefficient(i).unwrap());
        }
    }

    #[test]
    fn test_strictly_increasing() {
        let s = shell(6, Regime::Both);
        assert!(s.iter().zip(s.iter().skip(1)).all(|(a, b)| a < b));
    }

    #[test]
    fn test_members_valid() {
        let s = shell(8, Regime::Both);
        for v in &s {
            assert_eq!(v.norm_sq(), 8);
            assert!(v.is_lattice_member());
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        for regime in Regime::ALL {
            let seq = Shell::compute(NormSq::from(6u32), regime, Execution::Sequential);
            let par = Shell::compute(NormSq::from(6u32), regime, Execution::Parallel);
            assert_eq!(seq, par);
        }
    }

    #[test]
    fn test_indexed_access() {
        let s = shell(2, Regime::Both);
        assert_eq!(s.get(0), Some(&s[0]));
        assert!(s.get(240).is_none());
        assert_eq!(
            s.try_get(240),
            Err(LatticeError::IndexOutOfRange { index: 240, len: 240 })
        );
        // Smallest root: (-1, -1, 0, ...) sorts before any vector starting at -1/2
        assert_eq!(s[0], LatticeVector::from_integers([-1, -1, 0, 0, 0, 0, 0, 0]).unwrap());
        assert!(s.contains(&s[100]));
    }

    #[test]
    fn test_product_sum_roots() {
        // Integer roots contain zeros; every half-integer root has an even
        // number of minus signs, so each contributes +1/256
        assert_eq!(shell(2, Regime::Integer).product_sum(), Ok(Ratio::from_integer(0)));
        assert_eq!(shell(2, Regime::HalfInteger).product_sum(), Ok(Ratio::new(128, 256)));
    }

    #[test]
    fn test_compute_checked_rejects_negative() {
        assert!(matches!(
            Shell::compute_checked(-2, Regime::Both, Execution::Sequential),
            Err(LatticeError::InvalidArgument(_))
        ));
    }
}
