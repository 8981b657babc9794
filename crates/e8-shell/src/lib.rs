//! # E8 Shell
//!
//! Exact enumeration of the vectors of E8 with a given squared norm.
//!
//! ## Pipeline
//!
//! ```text
//!  norm² n ──► Partition Search ──► Vector Expander ──► Shell Aggregator
//!              (n, or 4n doubled)   (permutations ×     (union, sort,
//!               non-increasing       signs, mod 2 /      memoize per
//!               magnitudes)          mod 4 filter)       (n, regime))
//! ```
//!
//! - **Partition Search**: magnitude multisets whose squares sum to the target
//! - **Vector Expander**: signed arrangements passing the E8 congruence
//! - **Shell Aggregator**: sorted, duplicate-free shells, cached by `ShellCache`
//!
//! ## Example
//!
//! ```
//! use e8_shell::prelude::*;
//!
//! let cache = ShellCache::new();
//! let roots = cache.shell(2, Regime::Both).unwrap();
//! assert_eq!(roots.len(), 240);
//! ```

pub mod partition;
pub mod expand;
pub mod shell;
pub mod cache;

pub use partition::*;
pub use expand::*;
pub use shell::*;
pub use cache::*;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::partition::*;
    pub use crate::expand::*;
    pub use crate::shell::*;
    pub use crate::cache::*;
    pub use e8_core::{LatticeError, LatticeResult, LatticeVector, NormSq, Regime, Sublattice};
}
