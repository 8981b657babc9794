//! Lattice Vectors
//!
//! Exact representation of E8 vectors and of the values that select a shell.
//!
//! Every coordinate is stored doubled, so (1, -1, 0, ...) is kept as
//! (2, -2, 0, ...) and (1/2, ..., -1/2) as (1, ..., -1). Lexicographic order on
//! the stored tuple is lexicographic order on the true coordinates.

use crate::constants::*;
use crate::errors::{LatticeError, LatticeResult};
use num_rational::Ratio;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// SUBLATTICE / REGIME
// =============================================================================

/// One of the two cosets making up E8
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Sublattice {
    /// All coordinates integral, coordinate sum even
    Integer,
    /// All coordinates in Z + 1/2, doubled coordinate sum divisible by 4
    HalfInteger,
}

impl Sublattice {
    /// Both sublattices, integer first
    pub const ALL: [Sublattice; 2] = [Sublattice::Integer, Sublattice::HalfInteger];

    /// Modulus the doubled coordinate sum must be divisible by
    ///
    /// Integer vectors are stored doubled, so "sum even" becomes "doubled sum
    /// divisible by 4" as well.
    pub fn doubled_sum_modulus(self) -> i64 {
        match self {
            Sublattice::Integer => INTEGER_SUM_MODULUS * COORDINATE_SCALE as i64,
            Sublattice::HalfInteger => HALF_INTEGER_SUM_MODULUS,
        }
    }
}

impl fmt::Display for Sublattice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sublattice::Integer => write!(f, "integer"),
            Sublattice::HalfInteger => write!(f, "half-integer"),
        }
    }
}

/// Which part of E8 a shell covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Regime {
    /// Integer vectors only
    Integer,
    /// Half-integer vectors only
    HalfInteger,
    /// The whole lattice
    Both,
}

impl Regime {
    /// Every regime, in report order
    pub const ALL: [Regime; 3] = [Regime::Integer, Regime::HalfInteger, Regime::Both];

    /// Sublattices whose vectors this regime collects
    pub fn sublattices(self) -> &'static [Sublattice] {
        match self {
            Regime::Integer => &[Sublattice::Integer],
            Regime::HalfInteger => &[Sublattice::HalfInteger],
            Regime::Both => &Sublattice::ALL,
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Regime::Integer => write!(f, "integer"),
            Regime::HalfInteger => write!(f, "half-integer"),
            Regime::Both => write!(f, "both"),
        }
    }
}

impl FromStr for Regime {
    type Err = LatticeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "integer" | "int" => Ok(Regime::Integer),
            "half-integer" | "half" => Ok(Regime::HalfInteger),
            "both" | "all" => Ok(Regime::Both),
            other => Err(LatticeError::invalid(format!("unknown regime '{}'", other))),
        }
    }
}

// =============================================================================
// NORM
// =============================================================================

/// A validated squared norm: a non-negative integer no larger than `MAX_NORM_SQ`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormSq(u64);

impl NormSq {
    /// Validate a squared norm
    pub fn new(n: u64) -> LatticeResult<Self> {
        if n > MAX_NORM_SQ {
            return Err(LatticeError::invalid(format!(
                "norm_sq {} exceeds the supported maximum {}",
                n, MAX_NORM_SQ
            )));
        }
        Ok(Self(n))
    }

    /// The raw value
    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }

    /// Target sum of squares for the doubled coordinates: 4n
    #[inline]
    pub fn doubled_target(self) -> u64 {
        // Cannot overflow: n < 2^60
        self.0 * NORM_SCALE
    }
}

impl TryFrom<i64> for NormSq {
    type Error = LatticeError;

    fn try_from(n: i64) -> Result<Self, Self::Error> {
        let n = u64::try_from(n).map_err(|_| {
            LatticeError::invalid(format!("norm_sq must be a non-negative integer, got {}", n))
        })?;
        NormSq::new(n)
    }
}

impl From<u32> for NormSq {
    fn from(n: u32) -> Self {
        Self(n as u64)
    }
}

impl FromStr for NormSq {
    type Err = LatticeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n: i64 = s.trim().parse().map_err(|_| {
            LatticeError::invalid(format!("norm_sq must be a non-negative integer, got '{}'", s))
        })?;
        NormSq::try_from(n)
    }
}

impl fmt::Display for NormSq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// LATTICE VECTOR
// =============================================================================

/// An immutable E8 vector, stored as twice its coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LatticeVector {
    doubled: [i32; DIMENSION],
}

impl LatticeVector {
    /// The zero vector
    pub const ZERO: LatticeVector = LatticeVector { doubled: [0; DIMENSION] };

    /// Build from doubled coordinates, checking E8 membership
    ///
    /// # Errors
    /// `InvalidArgument` if the coordinates fail the membership congruences or
    /// the squared norm exceeds `MAX_NORM_SQ`
    pub fn from_doubled(doubled: [i32; DIMENSION]) -> LatticeResult<Self> {
        let vector = Self { doubled };
        if !vector.is_lattice_member() {
            return Err(LatticeError::invalid(format!(
                "{:?} is not an E8 vector (doubled)",
                doubled
            )));
        }
        Ok(vector)
    }

    /// Build from integer coordinates, checking E8 membership
    pub fn from_integers(coords: [i32; DIMENSION]) -> LatticeResult<Self> {
        let mut doubled = [0; DIMENSION];
        for (slot, c) in doubled.iter_mut().zip(coords) {
            *slot = c
                .checked_mul(COORDINATE_SCALE)
                .ok_or(LatticeError::Overflow { context: "integer coordinate" })?;
        }
        Self::from_doubled(doubled)
    }

    /// Build from doubled coordinates already known to satisfy membership
    ///
    /// Used by the vector expander, whose congruence filter has run.
    #[inline]
    pub fn from_doubled_unchecked(doubled: [i32; DIMENSION]) -> Self {
        debug_assert!(Self { doubled }.is_lattice_member());
        Self { doubled }
    }

    /// Twice the coordinates
    #[inline]
    pub fn doubled(&self) -> &[i32; DIMENSION] {
        &self.doubled
    }

    /// Exact i-th coordinate
    pub fn coordinate(&self, i: usize) -> Option<Ratio<i64>> {
        self.doubled
            .get(i)
            .map(|&d| Ratio::new(d as i64, COORDINATE_SCALE as i64))
    }

    /// Which coset the vector lies in (from the parity of its first coordinate)
    pub fn sublattice(&self) -> Sublattice {
        if self.doubled[0] % 2 == 0 {
            Sublattice::Integer
        } else {
            Sublattice::HalfInteger
        }
    }

    /// Sum of the doubled coordinates
    pub fn coordinate_sum_doubled(&self) -> i64 {
        self.doubled.iter().map(|&d| d as i64).sum()
    }

    /// Sum of squares of the doubled coordinates (4 * norm²)
    ///
    /// Members are bounded by `MAX_NORM_SQ`, so this is at most 4 * `MAX_NORM_SQ`.
    pub fn doubled_norm_sq(&self) -> u64 {
        bounded_doubled_norm_sq(&self.doubled).unwrap_or(u64::MAX)
    }

    /// Exact squared norm
    pub fn norm_sq(&self) -> u64 {
        self.doubled_norm_sq() / NORM_SCALE
    }

    /// E8 membership: one parity for all coordinates plus the sum congruence,
    /// with a squared norm no larger than `MAX_NORM_SQ`
    pub fn is_lattice_member(&self) -> bool {
        if bounded_doubled_norm_sq(&self.doubled).is_none() {
            return false;
        }
        let first_parity = self.doubled[0].rem_euclid(2);
        if self.doubled.iter().any(|d| d.rem_euclid(2) != first_parity) {
            return false;
        }
        let modulus = self.sublattice().doubled_sum_modulus();
        self.coordinate_sum_doubled().rem_euclid(modulus) == 0
    }

    /// Product of the doubled coordinates
    pub fn doubled_product(&self) -> LatticeResult<i128> {
        self.doubled.iter().try_fold(1i128, |acc, &d| {
            acc.checked_mul(d as i128)
                .ok_or(LatticeError::Overflow { context: "coordinate product" })
        })
    }

    /// Exact product of the eight true coordinates
    pub fn product(&self) -> LatticeResult<Ratio<i128>> {
        Ok(Ratio::new(self.doubled_product()?, PRODUCT_DENOMINATOR))
    }
}

/// Sum of squares of doubled coordinates, or `None` past 4 * `MAX_NORM_SQ`
fn bounded_doubled_norm_sq(doubled: &[i32; DIMENSION]) -> Option<u64> {
    let limit = MAX_NORM_SQ * NORM_SCALE;
    doubled.iter().try_fold(0u64, |acc, &d| {
        let square = (d as i64).unsigned_abs().checked_pow(2)?;
        acc.checked_add(square).filter(|&total| total <= limit)
    })
}

impl fmt::Display for LatticeVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, &d) in self.doubled.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            if d % 2 == 0 {
                write!(f, "{}", d / 2)?;
            } else {
                write!(f, "{}/2", d)?;
            }
        }
        write!(f, ")")
    }
}
