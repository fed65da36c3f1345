//! Single-component GamBin mass kernel.
//!
//! GamBin models the per-species "fitness" \(\lambda\) as Gamma(\(\alpha\), 1)
//! distributed, truncated at its 99th percentile, and the observed octave as
//! Binomial(`max_octave`, \(\lambda\)) given that fitness. The marginal mass at
//! octave \(k\) is the gamma-weighted average of binomial kernels:
//!
//! \[
//! P(k) = \sum_{j=1}^{100} \binom{m}{k} \, t_j^k (1-t_j)^{m-k} \, W_j
//! \]
//!
//! where \(t_j = j/100\) and \(W_j\) is the truncated-gamma mass of the
//! \(j\)-th interval of the rescaled grid. The 100-interval discretization is
//! part of the distribution's definition, not a tunable approximation knob:
//! changing it changes the distribution.

use statrs::distribution::{ContinuousCDF, Gamma};
use statrs::function::gamma::ln_gamma;

/// Number of intervals in the discretized gamma-mixture integral.
const INTERVALS: usize = 100;

/// The gamma fitness distribution is truncated at this quantile and the
/// interval weights renormalized by it.
const TRUNCATION_MASS: f64 = 0.99;

fn ln_choose(n: u64, k: u64) -> f64 {
    // ln(n choose k) = ln Γ(n+1) - ln Γ(k+1) - ln Γ(n-k+1)
    let n1 = (n as f64) + 1.0;
    let k1 = (k as f64) + 1.0;
    let nk1 = ((n - k) as f64) + 1.0;
    ln_gamma(n1) - ln_gamma(k1) - ln_gamma(nk1)
}

// 0^0 = 1 here: k = 0 and k = max_octave hit zero exponents, and t_100 = 1
// makes the base itself zero at the top of the grid.
fn pow_zero_is_one(base: f64, exp: u64) -> f64 {
    if exp == 0 {
        1.0
    } else {
        base.powi(exp as i32)
    }
}

/// Mass of the truncated Gamma(alpha, 1) fitness distribution on each of the
/// 100 intervals of the rescaled evaluation grid, renormalized to sum to 1.
fn gamma_interval_weights(alpha: f64) -> Vec<f64> {
    let gamma =
        Gamma::new(alpha, 1.0).expect("alpha is validated positive at mixture construction");
    let q99 = gamma.inverse_cdf(TRUNCATION_MASS);

    let mut weights = Vec::with_capacity(INTERVALS);
    let mut prev = 0.0;
    for j in 1..=INTERVALS {
        let t = (j as f64) / (INTERVALS as f64);
        let cdf = gamma.cdf(q99 * t);
        weights.push((cdf - prev) / TRUNCATION_MASS);
        prev = cdf;
    }
    weights
}

/// Mass of one GamBin component at each requested octave.
///
/// Octaves outside `0..=max_octave` (including negative ones) have exactly
/// zero mass. Caller guarantees `alpha` is finite and positive.
pub(crate) fn component_mass(x: &[i64], alpha: f64, max_octave: u32) -> Vec<f64> {
    let weights = gamma_interval_weights(alpha);
    let m = u64::from(max_octave);

    x.iter()
        .map(|&k| {
            if k < 0 || (k as u64) > m {
                return 0.0;
            }
            let k = k as u64;
            let choose = ln_choose(m, k).exp();
            let mut p = 0.0;
            for (j, &w) in weights.iter().enumerate() {
                let t = ((j + 1) as f64) / (INTERVALS as f64);
                p += choose * pow_zero_is_one(t, k) * pow_zero_is_one(1.0 - t, m - k) * w;
            }
            p
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn interval_weights_sum_to_one() {
        for alpha in [0.3, 1.0, 2.0, 5.0, 17.0] {
            let w = gamma_interval_weights(alpha);
            assert_eq!(w.len(), INTERVALS);
            let total: f64 = w.iter().sum();
            // cdf(q99)/0.99 = 1 up to the accuracy of the gamma quantile.
            assert!((total - 1.0).abs() < 1e-8, "alpha={alpha}: sum={total}");
            assert!(w.iter().all(|&wi| wi >= 0.0));
        }
    }

    #[test]
    fn matches_reference_alpha_one() {
        // Reference values for alpha=1, max_octave=4 (Gamma(1,1) is
        // Exponential(1), so q99 = ln 100 exactly).
        let expected = [
            0.497880542260730,
            0.274068396065349,
            0.137024875462879,
            0.063884468185485,
            0.027141718025557,
        ];
        let got = component_mass(&[0, 1, 2, 3, 4], 1.0, 4);
        for (g, e) in got.iter().zip(expected) {
            assert!((g - e).abs() < 1e-7, "got {g}, expected {e}");
        }
    }

    #[test]
    fn matches_reference_fractional_alpha() {
        let expected = [
            0.371972750149521,
            0.350065552613727,
            0.199687948755268,
            0.078273748481484,
        ];
        let got = component_mass(&[0, 1, 2, 3], 2.5, 3);
        for (g, e) in got.iter().zip(expected) {
            assert!((g - e).abs() < 1e-7, "got {g}, expected {e}");
        }
    }

    #[test]
    fn zero_outside_support() {
        let got = component_mass(&[-3, -1, 5, 6, 100], 1.0, 4);
        assert!(got.iter().all(|&p| p == 0.0));
    }

    #[test]
    fn degenerate_support_is_point_mass() {
        // max_octave = 0: all fitness values produce octave 0.
        let got = component_mass(&[0], 0.8, 0);
        assert!((got[0] - 1.0).abs() < 1e-8);
    }

    #[test]
    fn moderately_large_max_octave_is_stable() {
        // The log-gamma binomial coefficient must not overflow around a few
        // hundred trials.
        let m = 300u32;
        let x: Vec<i64> = (0..=i64::from(m)).collect();
        let pmf = component_mass(&x, 2.0, m);
        assert!(pmf.iter().all(|p| p.is_finite() && *p >= 0.0));
        let total: f64 = pmf.iter().sum();
        assert!((total - 1.0).abs() < 1e-8, "sum={total}");
    }

    proptest! {
        #[test]
        fn component_pmf_sums_to_one(alpha in 0.2f64..8.0, max_octave in 0u32..60) {
            let x: Vec<i64> = (0..=i64::from(max_octave)).collect();
            let pmf = component_mass(&x, alpha, max_octave);
            let total: f64 = pmf.iter().sum();
            prop_assert!((total - 1.0).abs() < 1e-8, "sum={}", total);
        }

        #[test]
        fn component_pmf_is_nonnegative(alpha in 0.2f64..8.0, max_octave in 0u32..60) {
            let x: Vec<i64> = (-2..=i64::from(max_octave) + 2).collect();
            let pmf = component_mass(&x, alpha, max_octave);
            prop_assert!(pmf.iter().all(|&p| p >= 0.0 && p.is_finite()));
        }
    }
}
