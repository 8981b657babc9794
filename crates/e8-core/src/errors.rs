//! Lattice Errors
//!
//! Error types shared by every E8 crate.

use thiserror::Error;

/// Result type for lattice operations
pub type LatticeResult<T> = Result<T, LatticeError>;

/// Lattice errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LatticeError {
    /// Norm or divisor-sum argument is negative, non-integral or too large
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Exact arithmetic left the range of its integer type
    #[error("Arithmetic overflow while computing {context}")]
    Overflow { context: &'static str },

    /// Indexed access past the end of a shell
    #[error("Index {index} out of range for shell of {len} vectors")]
    IndexOutOfRange { index: usize, len: usize },
}

impl LatticeError {
    /// Shorthand for an `InvalidArgument` with a formatted message
    pub fn invalid(msg: impl Into<String>) -> Self {
        LatticeError::InvalidArgument(msg.into())
    }
}
