//! Survey Errors
//!
//! Error types for the shell survey driver.

use crate::config::ConfigError;
use e8_core::{BigUint, LatticeError, Regime};
use thiserror::Error;

/// Result type for survey operations
pub type SurveyResult<T> = Result<T, SurveyError>;

/// Survey errors
#[derive(Error, Debug)]
pub enum SurveyError {
    /// Invalid norm or divisor-sum argument, or overflow in coordinate arithmetic
    #[error(transparent)]
    Lattice(#[from] LatticeError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Generated shell size disagrees with the theta series
    #[error(
        "Cross-check failed at norm² {norm_sq} ({regime}): formula gives {expected}, generated {actual}"
    )]
    CrossCheckFailed {
        norm_sq: u64,
        regime: Regime,
        expected: BigUint,
        actual: usize,
    },

    /// One or more norms of a run failed
    #[error("{failed} of {total} norms failed")]
    RunFailed { failed: usize, total: usize },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
