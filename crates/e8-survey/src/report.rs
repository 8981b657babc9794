//! Shell Reports
//!
//! Per-norm statistics for the integer, half-integer and combined shells:
//! vector count, exact sum of coordinate products, and the shell size the
//! divisor-sum formulas predict.

use crate::errors::{SurveyError, SurveyResult};
use e8_core::{
    half_integer_shell_size, integer_shell_size, theta_coefficient, BigUint, NormSq, Regime,
};
use e8_shell::Shell;
use num_rational::Ratio;
use std::fmt;

/// Size the theta series predicts for a regime at `norm_sq`
pub fn expected_size(norm_sq: NormSq, regime: Regime) -> SurveyResult<BigUint> {
    let n = i64::try_from(norm_sq.get())
        .map_err(|_| e8_core::LatticeError::invalid(format!("norm_sq {} out of range", norm_sq)))?;
    let size = match regime {
        Regime::Integer => integer_shell_size(n)?,
        Regime::HalfInteger => half_integer_shell_size(n)?,
        Regime::Both => theta_coefficient(n)?,
    };
    Ok(size)
}

/// Statistics for one shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellStats {
    pub regime: Regime,
    pub count: usize,
    pub product_sum: Ratio<i128>,
    /// Formula size, when cross-checking is enabled
    pub expected: Option<BigUint>,
}

impl ShellStats {
    /// Collect statistics from a computed shell
    pub fn collect(shell: &Shell, verify: bool) -> SurveyResult<Self> {
        let expected = if verify {
            Some(expected_size(shell.norm_sq(), shell.regime())?)
        } else {
            None
        };
        Ok(Self {
            regime: shell.regime(),
            count: shell.len(),
            product_sum: shell.product_sum()?,
            expected,
        })
    }

    /// Whether the count agrees with the formula (true when unchecked)
    pub fn is_consistent(&self) -> bool {
        self.expected
            .as_ref()
            .map_or(true, |e| *e == BigUint::from(self.count))
    }
}

/// Statistics for every regime at one norm
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormReport {
    pub norm_sq: NormSq,
    pub shells: Vec<ShellStats>,
}

impl NormReport {
    /// Build a report from shells of one norm, failing on the first
    /// cross-check mismatch
    pub fn from_shells(norm_sq: NormSq, shells: &[Shell], verify: bool) -> SurveyResult<Self> {
        let stats = shells
            .iter()
            .map(|shell| ShellStats::collect(shell, verify))
            .collect::<SurveyResult<Vec<_>>>()?;

        if let Some(bad) = stats.iter().find(|s| !s.is_consistent()) {
            return Err(SurveyError::CrossCheckFailed {
                norm_sq: norm_sq.get(),
                regime: bad.regime,
                expected: bad.expected.clone().unwrap_or_default(),
                actual: bad.count,
            });
        }

        Ok(Self {
            norm_sq,
            shells: stats,
        })
    }

    /// Statistics for one regime
    pub fn get(&self, regime: Regime) -> Option<&ShellStats> {
        self.shells.iter().find(|s| s.regime == regime)
    }
}

impl fmt::Display for NormReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "norm² = {}", self.norm_sq)?;
        for s in &self.shells {
            write!(
                f,
                "  {:<13} count {:>8}  product sum {:>10}",
                s.regime.to_string(),
                s.count,
                s.product_sum.to_string()
            )?;
            if let Some(expected) = &s.expected {
                write!(f, "  (formula {})", expected)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
