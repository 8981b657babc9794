//! Partition Search
//!
//! Enumerates the multisets of coordinate magnitudes that can make up a
//! vector of a given squared norm.
//!
//! ## How It Works
//!
//! A partition is a non-increasing sequence of eight non-negative integers
//! whose squares sum to the target. The search picks the next magnitude from
//! `[1, min(max_value, isqrt(remaining))]`, largest first, and recurses with
//! that magnitude as the new `max_value`. Forcing the sequence to be
//! non-increasing means every multiset is produced exactly once.
//!
//! - Integer sublattice: target n, any magnitude, unused slots padded with 0
//! - Half-integer sublattice: target 4n over doubled coordinates, odd
//!   magnitudes only, all eight slots filled (0 is even, so no padding)

use e8_core::{NormSq, Sublattice, DIMENSION};
use num_integer::Roots;
use rayon::prelude::*;
use std::fmt;

// =============================================================================
// PARTITION
// =============================================================================

/// Eight non-increasing magnitudes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Partition([u32; DIMENSION]);

impl Partition {
    /// The magnitudes, largest first
    #[inline]
    pub fn values(&self) -> &[u32; DIMENSION] {
        &self.0
    }

    /// Sum of squares of the magnitudes
    pub fn sum_of_squares(&self) -> u64 {
        self.0.iter().map(|&v| (v as u64) * (v as u64)).sum()
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

// =============================================================================
// PREFIX
// =============================================================================

/// Magnitudes chosen so far
///
/// `Copy`, so each recursive call extends its own value and branches share
/// nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Prefix {
    values: [u32; DIMENSION],
    len: usize,
}

impl Prefix {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of this prefix with `value` appended
    ///
    /// # Panics
    /// If the prefix already holds eight values.
    #[inline]
    pub fn push(mut self, value: u32) -> Self {
        self.values[self.len] = value;
        self.len += 1;
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.values[..self.len]
    }

    /// The prefix with every unused slot set to 0
    #[inline]
    pub fn into_partition(self) -> Partition {
        // Unused slots are still zero from `Default`
        Partition(self.values)
    }
}

// =============================================================================
// SEARCH POLICY
// =============================================================================

/// Per-sublattice rules for the search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchPolicy {
    /// Only odd magnitudes may be chosen
    pub odd_only: bool,
    /// A partition may finish before all slots are filled
    pub zero_padding: bool,
}

impl SearchPolicy {
    /// Integer coordinates: any magnitude, zero padding allowed
    pub const INTEGER: SearchPolicy = SearchPolicy {
        odd_only: false,
        zero_padding: true,
    };

    /// Doubled half-integer coordinates: odd magnitudes, every slot filled
    pub const HALF_INTEGER: SearchPolicy = SearchPolicy {
        odd_only: true,
        zero_padding: false,
    };

    pub fn for_sublattice(sublattice: Sublattice) -> Self {
        match sublattice {
            Sublattice::Integer => Self::INTEGER,
            Sublattice::HalfInteger => Self::HALF_INTEGER,
        }
    }

    /// Candidate magnitudes for the next slot, largest first
    pub fn candidates(self, remaining: u64, max_value: u32) -> impl Iterator<Item = u32> {
        let limit = u32::try_from(remaining.sqrt()).unwrap_or(u32::MAX);
        let mut top = max_value.min(limit);
        if self.odd_only && top % 2 == 0 {
            top = top.saturating_sub(1);
        }
        let step = if self.odd_only { 2 } else { 1 };
        (1..=top).rev().step_by(step)
    }
}

/// Sum of squares the search must hit for a sublattice
///
/// n for integer vectors, 4n for half-integer vectors (doubled coordinates).
pub fn search_target(sublattice: Sublattice, norm_sq: NormSq) -> u64 {
    match sublattice {
        Sublattice::Integer => norm_sq.get(),
        Sublattice::HalfInteger => norm_sq.doubled_target(),
    }
}

// =============================================================================
// SEARCH
// =============================================================================

/// Depth-first search for partitions of `target` into `slots` more squares
///
/// Every complete partition is handed to `emit`. A branch whose slots run
/// out before `target` reaches zero simply ends; candidates never exceed
/// `isqrt(target)`, so `target` cannot go negative.
///
/// # Arguments
/// * `policy` - Sublattice rules (oddness, padding)
/// * `target` - Remaining sum of squares
/// * `slots` - Slots left to fill, at most `DIMENSION - prefix.len()`
/// * `max_value` - Largest magnitude allowed in this slot
/// * `prefix` - Magnitudes chosen so far
/// * `emit` - Receives each complete partition
pub fn search<F>(
    policy: SearchPolicy,
    target: u64,
    slots: usize,
    max_value: u32,
    prefix: Prefix,
    emit: &mut F,
) where
    F: FnMut(Partition),
{
    debug_assert!(prefix.len() + slots <= DIMENSION);

    if target == 0 {
        if slots == 0 || policy.zero_padding {
            emit(prefix.into_partition());
        }
        return;
    }
    if slots == 0 {
        return;
    }

    for value in policy.candidates(target, max_value) {
        let square = (value as u64) * (value as u64);
        search(policy, target - square, slots - 1, value, prefix.push(value), emit);
    }
}

fn initial_max(target: u64) -> u32 {
    u32::try_from(target.sqrt()).unwrap_or(u32::MAX)
}

/// All partitions for one sublattice at `norm_sq`, in search order
///
/// The half-integer search is skipped entirely for norm 0.
pub fn partitions(sublattice: Sublattice, norm_sq: NormSq) -> Vec<Partition> {
    if sublattice == Sublattice::HalfInteger && norm_sq.get() == 0 {
        return Vec::new();
    }
    let policy = SearchPolicy::for_sublattice(sublattice);
    let target = search_target(sublattice, norm_sq);

    let mut found = Vec::new();
    search(
        policy,
        target,
        DIMENSION,
        initial_max(target),
        Prefix::new(),
        &mut |p| found.push(p),
    );
    found
}

/// Same result as `partitions`, with each first magnitude explored on the
/// rayon pool
pub fn par_partitions(sublattice: Sublattice, norm_sq: NormSq) -> Vec<Partition> {
    let target = search_target(sublattice, norm_sq);
    if target == 0 {
        return partitions(sublattice, norm_sq);
    }
    let policy = SearchPolicy::for_sublattice(sublattice);
    let firsts: Vec<u32> = policy.candidates(target, initial_max(target)).collect();

    firsts
        .into_par_iter()
        .flat_map_iter(|first| {
            let square = (first as u64) * (first as u64);
            let mut branch = Vec::new();
            search(
                policy,
                target - square,
                DIMENSION - 1,
                first,
                Prefix::new().push(first),
                &mut |p| branch.push(p),
            );
            branch
        })
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================
