//! Octave binning of raw abundance data.
//!
//! Species-abundance workflows bin raw per-species abundances into doubling
//! classes before anything GamBin-shaped happens: octave \(j\) holds the
//! species with abundance in \([2^j, 2^{j+1})\). Fitting tools consume the
//! resulting table together with the distribution functions at the crate
//! root; the binning itself is the only data preparation this crate does.

use crate::{GambinError, Result};

/// Per-octave species counts: `species[j]` is the number of species whose
/// abundance falls in octave `j` (abundance class \([2^j, 2^{j+1})\)).
///
/// # Examples
///
/// ```
/// use gambin::octaves::Octaves;
///
/// let oct = Octaves::from_abundances([1, 1, 2, 3, 4, 5, 8, 16]).unwrap();
/// assert_eq!(oct.species, vec![2, 2, 2, 1, 1]);
/// assert_eq!(oct.max_octave(), 4);
/// assert_eq!(oct.total_species(), 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Octaves {
    /// Species counts indexed by octave.
    pub species: Vec<usize>,
}

impl Octaves {
    /// Bin per-species abundances into octaves.
    ///
    /// Each element of the input is one species' abundance. Zero abundances
    /// are silently ignored (they correspond to species absent from the
    /// sample).
    ///
    /// # Errors
    ///
    /// Returns [`GambinError::EmptySample`] if the iterator is empty, or
    /// [`GambinError::Invalid`] if all abundances are zero.
    pub fn from_abundances<I>(abundances: I) -> Result<Self>
    where
        I: IntoIterator<Item = u64>,
    {
        let abundances: Vec<u64> = abundances.into_iter().collect();
        if abundances.is_empty() {
            return Err(GambinError::EmptySample);
        }
        let max_a = *abundances.iter().max().unwrap_or(&0);
        if max_a == 0 {
            return Err(GambinError::Invalid("all abundances are zero"));
        }
        let mut species = vec![0usize; max_a.ilog2() as usize + 1];
        for a in abundances {
            if a == 0 {
                continue;
            }
            species[a.ilog2() as usize] += 1;
        }
        Ok(Self { species })
    }

    /// The highest occupied octave index.
    #[must_use]
    pub fn max_octave(&self) -> u32 {
        (self.species.len() as u32).saturating_sub(1)
    }

    /// Total number of species binned.
    #[must_use]
    pub fn total_species(&self) -> usize {
        self.species.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn bins_doubling_classes() {
        // Octave edges: 1, 2-3, 4-7, 8-15, 16-31, ...
        let oct = Octaves::from_abundances([1, 2, 3, 4, 7, 8, 15, 16, 31, 32]).unwrap();
        assert_eq!(oct.species, vec![1, 2, 2, 2, 2, 1]);
    }

    #[test]
    fn ignores_zero_abundances() {
        let oct = Octaves::from_abundances([0, 5, 0, 1]).unwrap();
        assert_eq!(oct.total_species(), 2);
        assert_eq!(oct.species, vec![1, 0, 1]);
    }

    #[test]
    fn rejects_empty() {
        assert!(Octaves::from_abundances(Vec::new()).is_err());
    }

    #[test]
    fn rejects_all_zeros() {
        assert!(Octaves::from_abundances([0, 0, 0]).is_err());
    }

    proptest! {
        #[test]
        fn total_species_counts_nonzero_abundances(ab in prop::collection::vec(0u64..10_000, 1..200)) {
            let nonzero = ab.iter().filter(|&&a| a > 0).count();
            prop_assume!(nonzero > 0);
            let oct = Octaves::from_abundances(ab).unwrap();
            prop_assert_eq!(oct.total_species(), nonzero);
        }

        #[test]
        fn top_octave_is_occupied(ab in prop::collection::vec(1u64..10_000, 1..200)) {
            let oct = Octaves::from_abundances(ab).unwrap();
            prop_assert!(oct.species[oct.max_octave() as usize] > 0);
        }
    }
}
