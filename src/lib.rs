//! A skipset is a way of storing distinct keys in ascending order such that
//! membership tests, insertions and removals all take `O(log(n))` time on
//! average.
//!
//! Conceptually, a skipset resembles something like:
//!
//! ```text
//! <min> -------------------------> [4] --------------------------------> <max>
//! <min> ----------> [2] ---------> [4] ----------------> [7] ----------> <max>
//! <min> --> [1] --> [2] --> [3] --> [4] --> [5] --> [6] --> [7] --> [8] --> <max>
//! ```
//!
//! where every level is bounded by a pair of sentinel nodes, and each node
//! `[x]` is linked to its neighbours on the same level as well as to the
//! occurrences of `x` directly above and below it.  A search starts at the
//! top-left sentinel, moves right while the keys are smaller than the target,
//! and drops down a level each time it overshoots.
//!
//! Keys are `i32`, with [`MIN_SENTINEL`] and [`MAX_SENTINEL`] reserved for the
//! sentinels themselves.  How high each key reaches is decided by a [`Coin`]
//! when the key is inserted; see the [`coin`] module.

pub mod coin;
mod skipnode;
mod skipset;

pub use coin::{Coin, Fair, FairError};
pub use skipset::{Iter, SkipSet, SkipSetError};

/// The type of the keys stored in a [`SkipSet`].
pub type Key = i32;

/// The key held by the head sentinel of every level.  Rejected as a user key.
pub const MIN_SENTINEL: Key = Key::MIN;

/// The key held by the tail sentinel of every level.  Rejected as a user key.
pub const MAX_SENTINEL: Key = Key::MAX;
