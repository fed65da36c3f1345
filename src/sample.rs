//! Random octave generation.
//!
//! Draws independent octaves with replacement from the categorical
//! distribution defined by the mixture PMF over its full support. The RNG is
//! caller-supplied so simulations stay reproducible; nothing here keeps state
//! between calls.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::{support_mass, Mixture, Result};

/// Draw `n` independent octaves from the mixture.
///
/// # Errors
///
/// Returns [`GambinError::Sampling`](crate::GambinError::Sampling) if the
/// categorical table cannot be built from the PMF (this requires a degenerate
/// mixture whose entire support mass underflowed to zero).
///
/// # Examples
///
/// ```
/// use gambin::{sample::sample_n, Mixture};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mix = Mixture::single(2.0, 7).unwrap();
/// let mut rng = StdRng::seed_from_u64(42);
/// let draws = sample_n(&mix, 1000, &mut rng).unwrap();
/// assert_eq!(draws.len(), 1000);
/// assert!(draws.iter().all(|&o| o <= 7));
/// ```
pub fn sample_n<R: Rng + ?Sized>(mix: &Mixture, n: usize, rng: &mut R) -> Result<Vec<u32>> {
    let pmf = support_mass(mix);
    let table = WeightedIndex::new(&pmf)?;
    Ok((0..n).map(|_| table.sample(rng) as u32).collect())
}

/// Draw one octave per element of `like`.
///
/// The "pass a data vector to imply the sample count" idiom of the reference
/// ecosystem, as a separate statically-typed entry point: only `like.len()`
/// is used.
///
/// # Errors
///
/// Same conditions as [`sample_n`].
pub fn sample_like<T, R: Rng + ?Sized>(mix: &Mixture, like: &[T], rng: &mut R) -> Result<Vec<u32>> {
    sample_n(mix, like.len(), rng)
}
