//! `gambin`: the GamBin species-abundance distribution.
//!
//! GamBin is a discrete distribution over abundance *octaves* (doubling
//! classes) used in ecology to describe species-abundance distributions. Each
//! species carries a latent "fitness" drawn from a Gamma(\(\alpha\), 1)
//! distribution truncated at its 99th percentile; conditional on fitness, the
//! species' octave is binomial over `max_octave` trials. Marginalizing the
//! fitness yields a flexible one-parameter family that interpolates between
//! logseries-like and lognormal-like abundance shapes.
//!
//! This crate provides the distribution itself, for weighted mixtures of one
//! or more GamBin components:
//!
//! - [`mass`] -- probability mass function,
//! - [`cumulative`] -- cumulative distribution function,
//! - [`quantile`] -- quantile (inverse CDF) function,
//! - [`sample`] -- random octave generation,
//! - [`octaves`] -- binning of raw abundance data into octaves.
//!
//! Parameter fitting and plotting are out of scope: they are downstream
//! consumers of these entry points. Every call recomputes the mixture PMF
//! from its parameters; there is no shared or cached state, so calls are
//! freely concurrent.
//!
//! ## References
//!
//! - Ugland et al. (2007): "Modelling dimensionality in species abundance
//!   distributions: description and evaluation of the Gambin model"
//! - Matthews et al. (2014): "The gambin model provides a superior fit to
//!   species abundance distributions with a single free parameter"
//!
//! ## Quick example
//!
//! ```rust
//! use gambin::{mass, Mixture};
//!
//! let mix = Mixture::single(2.0, 7).unwrap();
//! let pmf = mass(&mix, &(0..=7).collect::<Vec<_>>(), false);
//!
//! let total: f64 = pmf.iter().sum();
//! assert!((total - 1.0).abs() < 1e-8);
//! ```

#![forbid(unsafe_code)]

use thiserror::Error;

mod kernel;
pub mod octaves;
pub mod sample;

/// Errors for mixture construction, octave binning, and sampling.
#[derive(Debug, Error)]
pub enum GambinError {
    /// A mixture weight was negative. Weights must be non-negative; they are
    /// normalized to sum to 1 at construction.
    #[error("negative weight at index {0}: mixture weights must be non-negative")]
    NegativeWeight(usize),

    /// `alphas` and `max_octaves` must pair up one-to-one.
    #[error("length mismatch: {alphas} alphas vs {max_octaves} max octaves")]
    LengthMismatch {
        /// Number of shape parameters supplied.
        alphas: usize,
        /// Number of support bounds supplied.
        max_octaves: usize,
    },

    #[error("empty sample")]
    EmptySample,

    #[error("invalid input: {0}")]
    Invalid(&'static str),

    #[error(transparent)]
    Sampling(#[from] rand::distributions::WeightedError),
}

pub type Result<T> = core::result::Result<T, GambinError>;

/// A weighted mixture of GamBin components.
///
/// Each component is a pair (`alpha`, `max_octave`): a positive shape
/// parameter and the highest octave with positive mass for that component.
/// Weights are normalized to sum to 1 at construction, so an invalid mixture
/// cannot be built and the distribution functions themselves are infallible.
///
/// The mixture's support is `0..=support_max()`; a component whose own
/// `max_octave` is below the global maximum contributes zero mass above it.
///
/// # Examples
///
/// ```
/// use gambin::Mixture;
///
/// let mix = Mixture::new(vec![1.0, 3.0], vec![6, 8], vec![0.25, 0.75]).unwrap();
/// assert_eq!(mix.components(), 2);
/// assert_eq!(mix.support_max(), 8);
/// assert!((mix.weights().iter().sum::<f64>() - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Mixture {
    alphas: Vec<f64>,
    max_octaves: Vec<u32>,
    /// Normalized weights, summing to 1.
    weights: Vec<f64>,
}

impl Mixture {
    /// Build a mixture from per-component shapes, support bounds, and raw
    /// (unnormalized) weights.
    ///
    /// # Errors
    ///
    /// Returns [`GambinError::LengthMismatch`] if `alphas` and `max_octaves`
    /// differ in length, [`GambinError::NegativeWeight`] if any weight is
    /// negative, and [`GambinError::Invalid`] for an empty mixture, a weight
    /// vector of the wrong length, all-zero weights, or a non-finite or
    /// non-positive `alpha`.
    pub fn new(alphas: Vec<f64>, max_octaves: Vec<u32>, weights: Vec<f64>) -> Result<Self> {
        if alphas.len() != max_octaves.len() {
            return Err(GambinError::LengthMismatch {
                alphas: alphas.len(),
                max_octaves: max_octaves.len(),
            });
        }
        if alphas.is_empty() {
            return Err(GambinError::Invalid("mixture needs at least one component"));
        }
        if weights.len() != alphas.len() {
            return Err(GambinError::Invalid("one weight per component is required"));
        }
        if let Some(i) = weights.iter().position(|&w| !(w >= 0.0)) {
            return Err(GambinError::NegativeWeight(i));
        }
        if alphas.iter().any(|&a| !a.is_finite() || a <= 0.0) {
            return Err(GambinError::Invalid("alpha must be finite and > 0"));
        }
        let total: f64 = weights.iter().sum();
        if !total.is_finite() || total <= 0.0 {
            return Err(GambinError::Invalid("weights must have a positive finite sum"));
        }
        let weights = weights.into_iter().map(|w| w / total).collect();
        Ok(Self {
            alphas,
            max_octaves,
            weights,
        })
    }

    /// Build a mixture with uniform `1/C` weights (the default-weight idiom
    /// of the reference distribution).
    ///
    /// # Errors
    ///
    /// Same conditions as [`Mixture::new`], minus the weight checks.
    pub fn uniform(alphas: Vec<f64>, max_octaves: Vec<u32>) -> Result<Self> {
        let c = alphas.len().max(1);
        Self::new(alphas, max_octaves, vec![1.0; c])
    }

    /// Build a single-component "mixture".
    ///
    /// # Errors
    ///
    /// Returns [`GambinError::Invalid`] if `alpha` is non-finite or
    /// non-positive.
    pub fn single(alpha: f64, max_octave: u32) -> Result<Self> {
        Self::new(vec![alpha], vec![max_octave], vec![1.0])
    }

    /// Number of mixture components.
    #[must_use]
    pub fn components(&self) -> usize {
        self.alphas.len()
    }

    /// The top of the mixture's support: the largest per-component
    /// `max_octave`.
    #[must_use]
    pub fn support_max(&self) -> u32 {
        self.max_octaves.iter().copied().max().unwrap_or(0)
    }

    /// Per-component shape parameters.
    #[must_use]
    pub fn alphas(&self) -> &[f64] {
        &self.alphas
    }

    /// Per-component support bounds.
    #[must_use]
    pub fn max_octaves(&self) -> &[u32] {
        &self.max_octaves
    }

    /// Normalized mixture weights (sum to 1).
    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

/// The mixture PMF over the full support `0..=support_max()`, recomputed from
/// the mixture parameters. Shared by [`cumulative`], [`quantile`], and the
/// [`sample`] module.
pub(crate) fn support_mass(mix: &Mixture) -> Vec<f64> {
    let x: Vec<i64> = (0..=i64::from(mix.support_max())).collect();
    mass(mix, &x, false)
}

/// Probability mass function of a GamBin mixture.
///
/// Evaluates the weighted sum of component mass functions at each requested
/// octave. Octaves outside a component's support (including negative ones)
/// contribute exactly zero. With `log = true` the natural log is taken of the
/// mixed (linear-space) mass, not per component.
///
/// # Examples
///
/// ```
/// use gambin::{mass, Mixture};
///
/// let mix = Mixture::single(1.0, 4).unwrap();
/// let pmf = mass(&mix, &[0, 1, 2, 3, 4, 5], false);
/// // 5 is above max_octave, so it carries no mass at all.
/// assert_eq!(pmf[5], 0.0);
/// ```
#[must_use]
pub fn mass(mix: &Mixture, x: &[i64], log: bool) -> Vec<f64> {
    let mut out = vec![0.0; x.len()];
    for ((&alpha, &max_octave), &w) in mix
        .alphas
        .iter()
        .zip(mix.max_octaves.iter())
        .zip(mix.weights.iter())
    {
        let comp = kernel::component_mass(x, alpha, max_octave);
        for (o, p) in out.iter_mut().zip(comp) {
            *o += w * p;
        }
    }
    if log {
        for o in &mut out {
            *o = o.ln();
        }
    }
    out
}

/// Cumulative distribution function of a GamBin mixture.
///
/// Computes the PMF over the full support, complements it elementwise when
/// `lower_tail` is false (before the cumulative sum, matching the reference
/// distribution), cumulatively sums, optionally logs, then looks up each
/// requested quantile by `floor(q)`.
///
/// Quantiles whose floor falls outside `0..=support_max()` yield `NaN`; the
/// reference leaves them undefined.
///
/// # Examples
///
/// ```
/// use gambin::{cumulative, Mixture};
///
/// let mix = Mixture::single(2.0, 7).unwrap();
/// let cdf = cumulative(&mix, &[0.0, 3.5, 7.0], true, false);
/// assert!(cdf[0] > 0.0);
/// assert!(cdf[0] <= cdf[1] && cdf[1] <= cdf[2]);
/// assert!((cdf[2] - 1.0).abs() < 1e-8);
/// ```
#[must_use]
pub fn cumulative(mix: &Mixture, q: &[f64], lower_tail: bool, log_p: bool) -> Vec<f64> {
    let mut p = support_mass(mix);
    if !lower_tail {
        for v in &mut p {
            *v = 1.0 - *v;
        }
    }
    for i in 1..p.len() {
        p[i] += p[i - 1];
    }
    if log_p {
        for v in &mut p {
            *v = v.ln();
        }
    }
    q.iter()
        .map(|&qi| {
            let idx = qi.floor();
            if idx < 0.0 || idx >= p.len() as f64 {
                f64::NAN
            } else {
                p[idx as usize]
            }
        })
        .collect()
}

/// Quantile (inverse CDF) function of a GamBin mixture.
///
/// Bucket boundaries are the cumulative sums of the PMF (complemented and/or
/// logged first when requested), with a leading zero boundary. Each
/// probability `p` is assigned the octave whose half-open bucket
/// `(boundary[k], boundary[k+1]]` contains it, computed as the number of
/// boundaries strictly below `p`, minus one. `p = 0` therefore maps to `-1`
/// (it sits below octave 0's bucket), and `p = 1` maps to `support_max()`.
///
/// # Examples
///
/// ```
/// use gambin::{quantile, Mixture};
///
/// let mix = Mixture::single(2.0, 7).unwrap();
/// let q = quantile(&mix, &[0.0, 0.5, 1.0], true, false);
/// assert_eq!(q[0], -1);
/// assert_eq!(q[2], 7);
/// ```
#[must_use]
pub fn quantile(mix: &Mixture, p: &[f64], lower_tail: bool, log_p: bool) -> Vec<i64> {
    let mut pmf = support_mass(mix);
    if !lower_tail {
        for v in &mut pmf {
            *v = 1.0 - *v;
        }
    }
    if log_p {
        for v in &mut pmf {
            *v = v.ln();
        }
    }
    let mut boundaries = Vec::with_capacity(pmf.len() + 1);
    boundaries.push(0.0);
    let mut acc = 0.0;
    for v in pmf {
        acc += v;
        boundaries.push(acc);
    }
    // Top bucket absorbs rounding: in exact arithmetic the last boundary is
    // 1, so p = 1 belongs to the top octave even when the computed total
    // mass lands a few ulps below it.
    let top = boundaries.len() as i64 - 2;
    p.iter()
        .map(|&pi| (boundaries.iter().filter(|&&b| b < pi).count() as i64 - 1).min(top))
        .collect()
}
