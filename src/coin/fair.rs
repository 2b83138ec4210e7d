//! Random coin driven by a small, fast PRNG.

use rand::{Rng, SeedableRng, rngs::SmallRng};
use thiserror::Error;

use crate::coin::Coin;

#[derive(Error, Debug, PartialEq, Eq)]
/// Errors that can occur when creating a [`Fair`] coin.
#[expect(
    clippy::module_name_repetitions,
    reason = "Using 'Error' would be too generic and may cause confusion."
)]
#[non_exhaustive]
pub enum FairError {
    /// The probability `$p$` must be in the range `$(0, 1)$`.
    #[error("p must be in (0, 1).")]
    InvalidProbability,
}

/// A coin which succeeds with some constant probability `$p$`.
///
/// Despite the name, the coin need not be fair: [`Fair::with_probability`]
/// allows any `$p \in (0, 1)$`, with smaller values producing flatter sets.
#[derive(Debug, Clone)]
pub struct Fair {
    /// The probability that a flip succeeds.
    p: f64,
    /// The random number generator.
    rng: SmallRng,
}

impl Fair {
    /// The success probability used by [`Fair::new`] and [`Fair::seeded`].
    pub const DEFAULT_P: f64 = 0.5;

    /// Create a fair coin seeded from the thread-local generator.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Fair {
            p: Self::DEFAULT_P,
            rng: SmallRng::from_rng(&mut rand::rng()),
        }
    }

    /// Create a fair coin with a fixed seed, so that the sequence of flips
    /// (and hence the shape of the set) is reproducible.
    #[inline]
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Fair {
            p: Self::DEFAULT_P,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Create a coin which succeeds with probability `p`.
    ///
    /// # Errors
    ///
    /// `p` must be strictly between 0 and 1.
    #[inline]
    pub fn with_probability(p: f64) -> Result<Self, FairError> {
        if !(0.0 < p && p < 1.0) {
            return Err(FairError::InvalidProbability);
        }
        Ok(Fair { p, ..Fair::new() })
    }

    /// Replace the generator with one seeded from `seed`, keeping `p`.
    #[inline]
    #[must_use]
    pub fn reseeded(self, seed: u64) -> Self {
        Fair {
            rng: SmallRng::seed_from_u64(seed),
            ..self
        }
    }

    /// The probability that a flip succeeds.
    #[inline]
    #[must_use]
    pub fn probability(&self) -> f64 {
        self.p
    }
}

impl Default for Fair {
    #[inline]
    fn default() -> Self {
        Fair::new()
    }
}

impl Coin for Fair {
    #[inline]
    fn flip(&mut self) -> bool {
        self.rng.random_bool(self.p)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::{Fair, FairError};
    use crate::coin::Coin;

    #[rstest]
    #[case(0.0)]
    #[case(1.0)]
    #[case(-0.5)]
    #[case(1.5)]
    #[case(f64::NAN)]
    fn invalid_p(#[case] p: f64) {
        assert_eq!(
            Fair::with_probability(p).err(),
            Some(FairError::InvalidProbability)
        );
    }

    #[test]
    fn error_message() {
        assert_eq!(
            FairError::InvalidProbability.to_string(),
            "p must be in (0, 1)."
        );
    }

    #[test]
    fn seeded_is_reproducible() {
        let mut a = Fair::seeded(0x1234_abcd);
        let mut b = Fair::seeded(0x1234_abcd);
        let a: Vec<bool> = std::iter::repeat_with(|| a.flip()).take(256).collect();
        let b: Vec<bool> = std::iter::repeat_with(|| b.flip()).take(256).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn reseeded_keeps_probability() -> Result<()> {
        let coin = Fair::with_probability(0.25)?.reseeded(7);
        assert_eq!(coin.probability(), 0.25);
        Ok(())
    }

    #[rstest]
    fn success_rate(#[values(0.1, 0.5, 0.9)] p: f64) -> Result<()> {
        let trials = 100_000;
        let mut coin = Fair::with_probability(p)?.reseeded(42);
        let successes = std::iter::repeat_with(|| coin.flip())
            .take(trials)
            .filter(|&x| x)
            .count();
        #[expect(clippy::as_conversions, clippy::cast_precision_loss)]
        let rate = successes as f64 / trials as f64;
        assert!((rate - p).abs() < 0.01, "rate {rate} too far from {p}");
        Ok(())
    }
}
