//! Divisor Sums
//!
//! The sum-of-cubes-of-divisors function sigma_3 and the closed forms it
//! gives for E8 shell sizes:
//! - |shell(n)| = 240 * sigma_3(n / 2) for even n > 0
//! - |half-integer shell(n)| = 16 * (sigma_3(n) - sigma_3(n / 2)) for even n
//!
//! Results are `BigUint`: sigma_3(n) grows like n³ and leaves every machine
//! integer well inside the supported norm range.
//!
//! Shell generation never calls into this module; it exists so the
//! enumerated shells can be checked against an independent formula.

use crate::constants::{HALF_INTEGER_MULTIPLIER, THETA_MULTIPLIER};
use crate::errors::{LatticeError, LatticeResult};
use num_bigint::BigUint;
use num_integer::Roots;

// =============================================================================
// SIGMA_3
// =============================================================================

/// Sum of d³ over every positive divisor d of n, pairing d with n / d
///
/// # Arguments
/// * `n` - Non-negative integer
///
/// # Returns
/// The exact sum. sigma_3(0) = 0: zero has no positive divisors in this
/// convention.
///
/// # Errors
/// `InvalidArgument` for negative n
pub fn sigma_3(n: i64) -> LatticeResult<BigUint> {
    let n = u64::try_from(n).map_err(|_| {
        LatticeError::invalid(format!("sigma_3 needs a non-negative integer, got {}", n))
    })?;
    Ok(divisors(n).map(|d| BigUint::from(d).pow(3)).sum())
}

// =============================================================================
// SHELL SIZE FORMULAS
// =============================================================================

/// Number of half-integer E8 vectors of squared norm n
///
/// 16 * (sigma_3(n) - sigma_3(n / 2)) for even n. E8 is an even lattice, so
/// odd norms (and n = 0) have no half-integer vectors.
pub fn half_integer_shell_size(n: i64) -> LatticeResult<BigUint> {
    let upper = sigma_3(n)?;
    if n == 0 || n % 2 != 0 {
        return Ok(BigUint::default());
    }
    // Every divisor of n / 2 divides n, so upper >= lower
    let lower = sigma_3(n / 2)?;
    Ok((upper - lower) * HALF_INTEGER_MULTIPLIER)
}

/// Number of E8 vectors of squared norm n (theta series coefficient)
///
/// 1 for n = 0, 240 * sigma_3(n / 2) for even n > 0, 0 for odd n.
pub fn theta_coefficient(n: i64) -> LatticeResult<BigUint> {
    if n < 0 {
        return Err(LatticeError::invalid(format!(
            "theta coefficient needs a non-negative norm, got {}",
            n
        )));
    }
    match n {
        0 => Ok(BigUint::from(1u32)),
        _ if n % 2 != 0 => Ok(BigUint::default()),
        _ => Ok(sigma_3(n / 2)? * THETA_MULTIPLIER),
    }
}

/// Number of integer E8 vectors of squared norm n
pub fn integer_shell_size(n: i64) -> LatticeResult<BigUint> {
    let total = theta_coefficient(n)?;
    let half = half_integer_shell_size(n)?;
    if half > total {
        return Err(LatticeError::invalid(format!(
            "half-integer count {} exceeds theta coefficient {} at n = {}",
            half, total, n
        )));
    }
    Ok(total - half)
}

// =============================================================================
// ITERATOR
// =============================================================================

/// Ascending iterator over the positive divisors of n
///
/// Walks d up to sqrt(n) and replays the paired cofactors n / d in reverse.
pub struct DivisorIterator {
    n: u64,
    next: u64,
    root: u64,
    cofactors: Vec<u64>,
}

impl DivisorIterator {
    pub fn new(n: u64) -> Self {
        Self {
            n,
            next: 1,
            root: n.sqrt(),
            cofactors: Vec::new(),
        }
    }
}

impl Iterator for DivisorIterator {
    type Item = u64;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next <= self.root {
            let d = self.next;
            self.next += 1;
            if self.n % d == 0 {
                let cofactor = self.n / d;
                if cofactor != d {
                    self.cofactors.push(cofactor);
                }
                return Some(d);
            }
        }
        self.cofactors.pop()
    }
}

/// Create an iterator over the divisors of n (empty for n = 0)
pub fn divisors(n: u64) -> DivisorIterator {
    DivisorIterator::new(n)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn big(n: u64) -> BigUint {
        BigUint::from(n)
    }

    fn sigma_3_by_trial_division(n: u64) -> BigUint {
        (1..=n).filter(|d| n % d == 0).map(|d| big(d).pow(3)).sum()
    }

    #[test]
    fn test_sigma_3_first_values() {
        let table = [
            0, 1, 9, 28, 73, 126, 252, 344, 585, 757, 1134, 1332, 2044, 2198, 3096, 3528, 4681,
            4914, 6813, 6860, 9198, 9632, 11988, 12168, 16380, 15751, 19782, 20440, 25112, 24390,
            31752, 29792, 37449,
        ];
        for (n, &expected) in table.iter().enumerate() {
            assert_eq!(sigma_3(n as i64), Ok(big(expected)), "n={}", n);
        }
    }

    #[test]
    fn test_sigma_3_rejects_negative() {
        assert!(matches!(sigma_3(-1), Err(LatticeError::InvalidArgument(_))));
        assert!(matches!(
            half_integer_shell_size(-4),
            Err(LatticeError::InvalidArgument(_))
        ));
        assert!(matches!(theta_coefficient(-2), Err(LatticeError::InvalidArgument(_))));
    }

    #[test]
    fn test_sigma_3_past_machine_integers() {
        // sigma_3(2^k) = (8^(k+1) - 1) / 7, which passes u64 at k = 22
        let expected = (BigUint::from(8u32).pow(23) - 1u32) / 7u32;
        assert_eq!(sigma_3(1 << 22), Ok(expected));

        let n: i64 = 1 << 40;
        let expected = (BigUint::from(8u32).pow(41) - 1u32) / 7u32;
        assert_eq!(sigma_3(n), Ok(expected));
        assert!(theta_coefficient(2 * n).is_ok());
    }

    #[test]
    fn test_pairing_matches_trial_division() {
        for n in 0..200u64 {
            assert_eq!(sigma_3(n as i64), Ok(sigma_3_by_trial_division(n)), "n={}", n);
        }
    }

    #[test]
    fn test_divisors_ascending() {
        assert_eq!(divisors(12).collect::<Vec<_>>(), vec![1, 2, 3, 4, 6, 12]);
        assert_eq!(divisors(36).collect::<Vec<_>>(), vec![1, 2, 3, 4, 6, 9, 12, 18, 36]);
        assert_eq!(divisors(1).collect::<Vec<_>>(), vec![1]);
        assert_eq!(divisors(13).collect::<Vec<_>>(), vec![1, 13]);
        assert_eq!(divisors(0).count(), 0);
    }

    #[test]
    fn test_multiplicative() {
        for a in 1..30i64 {
            for b in 1..30i64 {
                if num_integer::gcd(a, b) == 1 {
                    let product = sigma_3(a).unwrap() * sigma_3(b).unwrap();
                    assert_eq!(sigma_3(a * b), Ok(product), "a={}, b={}", a, b);
                }
            }
        }
    }

    #[test]
    fn test_half_integer_shell_sizes() {
        assert_eq!(half_integer_shell_size(0), Ok(big(0)));
        assert_eq!(half_integer_shell_size(2), Ok(big(128)));
        assert_eq!(half_integer_shell_size(4), Ok(big(1024)));
        assert_eq!(half_integer_shell_size(6), Ok(big(3584)));
        assert_eq!(half_integer_shell_size(8), Ok(big(8192)));
        assert_eq!(half_integer_shell_size(3), Ok(big(0)));
    }

    #[test]
    fn test_theta_coefficients() {
        assert_eq!(theta_coefficient(0), Ok(big(1)));
        assert_eq!(theta_coefficient(1), Ok(big(0)));
        assert_eq!(theta_coefficient(2), Ok(big(240)));
        assert_eq!(theta_coefficient(4), Ok(big(2160)));
        assert_eq!(theta_coefficient(6), Ok(big(6720)));
    }

    #[test]
    fn test_integer_shell_sizes() {
        assert_eq!(integer_shell_size(0), Ok(big(1)));
        assert_eq!(integer_shell_size(2), Ok(big(112)));
        assert_eq!(integer_shell_size(4), Ok(big(1136)));
        assert_eq!(integer_shell_size(5), Ok(big(0)));
    }
}
