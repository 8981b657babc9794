//! # E8 Core
//!
//! Data model for enumerating E8 lattice shells.
//!
//! ## The Lattice
//!
//! E8 is the union of two cosets in R⁸:
//! - integer vectors whose coordinate sum is even
//! - half-integer vectors (every coordinate in Z + 1/2) whose doubled
//!   coordinate sum is divisible by 4
//!
//! ## Exactness
//!
//! Nothing here uses floating point. Vectors are stored as doubled integer
//! coordinates and products are exact rationals.
//!
//! ```text
//! |shell(0)| = 1
//! |shell(2m)| = 240 σ₃(m)
//! |half-integer shell(2m)| = 16 (σ₃(2m) - σ₃(m))
//! ```

pub mod constants;
pub mod divisors;
pub mod vector;
mod errors;

pub use constants::*;
pub use divisors::*;
pub use vector::*;
pub use errors::*;
pub use num_bigint::BigUint;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::constants::*;
    pub use crate::divisors::*;
    pub use crate::vector::*;
    pub use crate::errors::*;
}
