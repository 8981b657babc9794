//! Property-based tests for generated shells.
//!
//! Every shell must hold exactly the E8 vectors of its norm: right norm,
//! right congruence, strictly increasing, and as many as the theta series
//! predicts.

use proptest::prelude::*;

use e8_core::{
    half_integer_shell_size, integer_shell_size, theta_coefficient, BigUint, NormSq, Regime,
    Sublattice,
};
use e8_shell::{Execution, Shell, ShellCache};

fn compute(n: u32, regime: Regime) -> Shell {
    Shell::compute(NormSq::from(n), regime, Execution::Parallel)
}

fn any_regime() -> impl Strategy<Value = Regime> {
    prop::sample::select(Regime::ALL.to_vec())
}

fn size(n: u32, regime: Regime) -> BigUint {
    BigUint::from(compute(n, regime).len())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn every_vector_has_the_shell_norm(n in 0u32..12, regime in any_regime()) {
        let shell = compute(n, regime);
        for v in &shell {
            prop_assert_eq!(v.norm_sq(), n as u64);
            prop_assert_eq!(v.doubled_norm_sq(), 4 * n as u64);
        }
    }

    #[test]
    fn congruences_hold(n in 0u32..12) {
        for v in &compute(n, Regime::Integer) {
            prop_assert_eq!(v.sublattice(), Sublattice::Integer);
            prop_assert!(v.doubled().iter().all(|d| d % 2 == 0));
            // Doubled sum ≡ 0 (mod 4) is "integer sum even"
            prop_assert_eq!(v.coordinate_sum_doubled().rem_euclid(4), 0);
        }
        for v in &compute(n, Regime::HalfInteger) {
            prop_assert!(v.doubled().iter().all(|d| d % 2 != 0));
            prop_assert_eq!(v.coordinate_sum_doubled().rem_euclid(4), 0);
        }
    }

    #[test]
    fn strictly_increasing(n in 0u32..12, regime in any_regime()) {
        let shell = compute(n, regime);
        prop_assert!(shell.as_slice().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn sizes_follow_theta_series(n in 0u32..14) {
        let i = n as i64;
        prop_assert_eq!(size(n, Regime::Both), theta_coefficient(i).unwrap());
        prop_assert_eq!(size(n, Regime::Integer), integer_shell_size(i).unwrap());
        prop_assert_eq!(size(n, Regime::HalfInteger), half_integer_shell_size(i).unwrap());
    }

    #[test]
    fn both_is_disjoint_union(n in 0u32..10) {
        let both = compute(n, Regime::Both);
        let int = compute(n, Regime::Integer);
        let half = compute(n, Regime::HalfInteger);
        prop_assert_eq!(both.len(), int.len() + half.len());
        prop_assert!(int.iter().all(|v| both.contains(v)));
        prop_assert!(half.iter().all(|v| both.contains(v)));
    }

    #[test]
    fn negation_preserves_shell(n in 1u32..10) {
        let shell = compute(n, Regime::Both);
        for v in &shell {
            let neg = e8_core::LatticeVector::from_doubled(v.doubled().map(|d| -d)).unwrap();
            prop_assert!(shell.contains(&neg));
        }
    }

    #[test]
    fn negative_norms_rejected(n in i64::MIN..0) {
        let cache = ShellCache::new();
        prop_assert!(cache.shell(n, Regime::Both).is_err());
        prop_assert!(e8_core::sigma_3(n).is_err());
        prop_assert_eq!(cache.computations(), 0);
    }
}

#[test]
fn half_integer_cross_check_even_norms() {
    // |half-integer shell(n)| = 16 (σ₃(n) − σ₃(n/2))
    for n in (2..=16u32).step_by(2) {
        let i = n as i64;
        let expected = (e8_core::sigma_3(i).unwrap() - e8_core::sigma_3(i / 2).unwrap()) * 16u32;
        assert_eq!(size(n, Regime::HalfInteger), expected, "n={}", n);
    }
}

#[test]
fn repeated_requests_reuse_cached_shell() {
    let cache = ShellCache::with_execution(Execution::Sequential);
    for _ in 0..3 {
        for regime in Regime::ALL {
            cache.shell(8, regime).unwrap();
        }
    }
    assert_eq!(cache.computations(), 3);
    let a = cache.shell(8, Regime::Both).unwrap();
    let b = cache.shell(8, Regime::Both).unwrap();
    assert_eq!(a.as_slice(), b.as_slice());
}
