//! E8 Lattice Constants
//!
//! Fixed numbers of the E8 lattice in its standard coordinates, where a
//! vector is either all-integer with even coordinate sum or all-half-integer
//! with doubled coordinate sum divisible by 4.
//!
//! Coordinates are handled doubled throughout the workspace so both
//! sublattices stay in exact integer arithmetic.

// =============================================================================
// GEOMETRY
// =============================================================================

/// Number of coordinates of every lattice vector
pub const DIMENSION: usize = 8;

/// Squared norm of the minimal (root) vectors
pub const ROOT_NORM_SQ: u64 = 2;

/// Number of roots: the E8 kissing number
pub const ROOT_COUNT: usize = 240;

/// Roots of the form (±1, ±1, 0, 0, 0, 0, 0, 0) and permutations
pub const INTEGER_ROOT_COUNT: usize = 112;

/// Roots of the form (±1/2, ..., ±1/2) with an even number of minus signs
pub const HALF_INTEGER_ROOT_COUNT: usize = 128;

// =============================================================================
// MEMBERSHIP CONGRUENCES
// =============================================================================

/// Integer vectors: coordinate sum must be divisible by this
pub const INTEGER_SUM_MODULUS: i64 = 2;

/// Half-integer vectors: doubled coordinate sum must be divisible by this
pub const HALF_INTEGER_SUM_MODULUS: i64 = 4;

/// Scale between true and stored (doubled) coordinates
pub const COORDINATE_SCALE: i32 = 2;

/// Scale between a norm and the sum of squares of doubled coordinates
pub const NORM_SCALE: u64 = 4;

/// Denominator of an eight-fold product of doubled coordinates (2^8)
pub const PRODUCT_DENOMINATOR: i128 = 256;

// =============================================================================
// THETA SERIES
// =============================================================================

/// Theta series of E8: |shell(2m)| = 240 * sigma_3(m) for m > 0
pub const THETA_MULTIPLIER: u64 = 240;

/// Half-integer count: 16 * (sigma_3(n) - sigma_3(n / 2)) for even n
pub const HALF_INTEGER_MULTIPLIER: u64 = 16;

// =============================================================================
// LIMITS
// =============================================================================

/// Largest accepted squared norm
///
/// Doubled coordinates are bounded by 2 * sqrt(n), which stays inside `i32`
/// for every norm below 2^60.
pub const MAX_NORM_SQ: u64 = (1 << 60) - 1;
