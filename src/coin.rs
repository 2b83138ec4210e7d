//! Skipsets decide how high each key reaches by repeatedly flipping a coin
//! when the key is inserted: every success copies the key one level higher,
//! and the first failure stops the promotion.
//!
//! With a coin which succeeds with probability $p$, the chance that a key
//! reaches level $n$ is $p^n$, so the expected fraction of keys on level $n$
//! is $p^n$ and the expected height of the set is $O(\log n)$.  No upper bound
//! is placed on the height.
//!
//! The default [`Fair`] coin uses $p = 1/2$.  Any other source of randomness
//! (or a scripted sequence of flips, which is useful in tests) can be plugged
//! in by implementing [`Coin`].

pub mod fair;

pub use fair::{Fair, FairError};

// ////////////////////////////////////////////////////////////////////////////
// Coin
// ////////////////////////////////////////////////////////////////////////////

/// Upon the insertion of a new key, the key is promoted to the next level for
/// as long as [`flip`][Coin::flip] keeps returning `true`.
pub trait Coin {
    /// Flip the coin, returning `true` if the key should be promoted.
    #[must_use]
    fn flip(&mut self) -> bool;
}

impl<F> Coin for F
where
    F: FnMut() -> bool,
{
    #[inline]
    fn flip(&mut self) -> bool {
        self()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::Coin;

    #[test]
    fn closures_are_coins() {
        let mut flips = [true, true, false].into_iter();
        let mut coin = move || flips.next().unwrap_or(false);

        let drawn: Vec<bool> = std::iter::repeat_with(|| coin.flip()).take(5).collect();
        assert_eq!(drawn, [true, true, false, false, false]);
    }
}
