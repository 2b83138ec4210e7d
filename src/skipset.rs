//! An ordered set of integer keys built from sentinel-bounded levels.

use std::{cmp::Ordering, fmt, iter};

use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    Key, MAX_SENTINEL, MIN_SENTINEL,
    coin::{Coin, Fair},
    skipnode::{Arena, NodeId, SkipNode},
};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// Errors returned by the [`SkipSet`] operations.
#[non_exhaustive]
pub enum SkipSetError {
    /// The key collides with one of the values reserved for the sentinels
    /// ([`MIN_SENTINEL`] and [`MAX_SENTINEL`]).
    #[error("key {0} is reserved as a sentinel")]
    InvalidKey(Key),
}

// ////////////////////////////////////////////////////////////////////////////
// SkipSet
// ////////////////////////////////////////////////////////////////////////////

/// The skipset stores a set of distinct keys in ascending order, and provides
/// membership tests, insertion and removal in `$O(\log n)$` expected time.
///
/// Each level of the set is a doubly linked chain bounded by a head sentinel
/// holding [`MIN_SENTINEL`] and a tail sentinel holding [`MAX_SENTINEL`].
/// Level 0 holds every key, and each key is copied to higher levels for as
/// long as the set's [`Coin`] keeps landing on success when the key is
/// inserted.  Occurrences of the same key on adjacent levels are linked
/// vertically, and so are the sentinels.
///
/// Because the sentinel values are part of the structure, they cannot be
/// stored in the set: every operation rejects them with
/// [`SkipSetError::InvalidKey`] before touching anything.
///
/// # Examples
///
/// ```
/// use skipset::SkipSet;
///
/// let mut set = SkipSet::new();
/// assert_eq!(set.insert(3), Ok(true));
/// assert_eq!(set.insert(3), Ok(false));
/// assert_eq!(set.find(3), Ok(true));
/// assert_eq!(set.delete(3), Ok(true));
/// assert_eq!(set.find(3), Ok(false));
/// assert!(set.insert(i32::MAX).is_err());
/// ```
pub struct SkipSet<C = Fair> {
    /// Storage for every node, sentinels included.
    nodes: Arena,
    /// Head sentinel of each level, bottom first.  Never empty.
    heads: Vec<NodeId>,
    /// Tail sentinel of each level, bottom first.  Same length as `heads`.
    tails: Vec<NodeId>,
    /// Number of keys at level 0.
    len: usize,
    /// Decides how far each new key is promoted.
    coin: C,
}

// ///////////////////////////////////////////////
// Inherent methods
// ///////////////////////////////////////////////

impl SkipSet<Fair> {
    /// Create a new, empty skipset promoting keys with a fair coin seeded from
    /// the thread-local generator.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let set = SkipSet::new();
    /// assert!(set.is_empty());
    /// assert_eq!(set.height(), 1);
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        SkipSet::with_coin(Fair::new())
    }

    /// Create a new, empty skipset whose shape is reproducible: the same seed
    /// and the same sequence of operations always give the same levels.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut a = SkipSet::with_seed(7);
    /// let mut b = SkipSet::with_seed(7);
    /// for key in 0..100 {
    ///     a.insert(key)?;
    ///     b.insert(key)?;
    /// }
    /// assert_eq!(a.levels(), b.levels());
    /// # Ok::<(), skipset::SkipSetError>(())
    /// ```
    #[inline]
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        SkipSet::with_coin(Fair::seeded(seed))
    }

    /// Build a skipset from the given keys, ignoring duplicates.
    ///
    /// # Errors
    ///
    /// Fails with [`SkipSetError::InvalidKey`] on the first sentinel value
    /// encountered.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let set = SkipSet::try_from_keys([5, 1, 3, 1])?;
    /// assert_eq!(set.iter().collect::<Vec<_>>(), [1, 3, 5]);
    /// assert!(SkipSet::try_from_keys([1, i32::MIN]).is_err());
    /// # Ok::<(), skipset::SkipSetError>(())
    /// ```
    #[inline]
    pub fn try_from_keys<I>(keys: I) -> Result<Self, SkipSetError>
    where
        I: IntoIterator<Item = Key>,
    {
        let mut set = SkipSet::new();
        for key in keys {
            set.insert(key)?;
        }
        Ok(set)
    }
}

impl<C> SkipSet<C> {
    /// Returns the number of keys in the skipset.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let set = SkipSet::try_from_keys(0..10)?;
    /// assert_eq!(set.len(), 10);
    /// # Ok::<(), skipset::SkipSetError>(())
    /// ```
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the skipset contains no keys.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of levels currently present.
    ///
    /// An empty skipset has a single, empty level.
    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        self.heads.len()
    }

    /// Removes every key, leaving a single empty level.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut set = SkipSet::try_from_keys(0..100)?;
    /// set.clear();
    /// assert!(set.is_empty());
    /// assert_eq!(set.height(), 1);
    /// # Ok::<(), skipset::SkipSetError>(())
    /// ```
    #[inline]
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.heads.clear();
        self.tails.clear();
        self.len = 0;
        self.push_level();
    }

    /// Returns `true` if the skipset contains `key`.
    ///
    /// # Errors
    ///
    /// Fails with [`SkipSetError::InvalidKey`] if `key` is a sentinel value.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let set = SkipSet::try_from_keys([1, 4, 7])?;
    /// assert_eq!(set.find(4), Ok(true));
    /// assert_eq!(set.find(5), Ok(false));
    /// # Ok::<(), skipset::SkipSetError>(())
    /// ```
    #[inline]
    pub fn find(&self, key: Key) -> Result<bool, SkipSetError> {
        validate(key)?;
        Ok(self.nodes[self.search(key)].key == key)
    }

    /// Removes `key` from the skipset, returning `true` if it was present.
    ///
    /// Every level the key reached loses its occurrence, and any levels left
    /// empty at the top are discarded.
    ///
    /// # Errors
    ///
    /// Fails with [`SkipSetError::InvalidKey`] if `key` is a sentinel value.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut set = SkipSet::try_from_keys([1, 2])?;
    /// assert_eq!(set.delete(1), Ok(true));
    /// assert_eq!(set.delete(1), Ok(false));
    /// assert_eq!(set.len(), 1);
    /// # Ok::<(), skipset::SkipSetError>(())
    /// ```
    pub fn delete(&mut self, key: Key) -> Result<bool, SkipSetError> {
        validate(key)?;
        let landing = self.search(key);
        if self.nodes[landing].key != key {
            trace!(key, "delete: absent");
            return Ok(false);
        }

        // Unwind from the bottom occurrence through every level it reached.
        let mut cursor = Some(self.bottom(landing));
        while let Some(id) = cursor {
            self.nodes.unlink(id);
            cursor = self.nodes.free(id).upstream;
        }
        self.len -= 1;
        trace!(key, len = self.len, "delete: removed");

        self.prune();
        Ok(true)
    }

    /// Returns an iterator over the keys in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let set = SkipSet::try_from_keys([3, 1, 2])?;
    /// assert_eq!(set.iter().collect::<Vec<_>>(), [1, 2, 3]);
    /// assert_eq!(set.iter().rev().collect::<Vec<_>>(), [3, 2, 1]);
    /// # Ok::<(), skipset::SkipSetError>(())
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            nodes: &self.nodes,
            front: self.heads[0],
            back: self.tails[0],
            remaining: self.len,
        }
    }

    /// Returns the keys present on each level, from the top level down to
    /// level 0.  Sentinels are not included.
    ///
    /// This is mainly intended for diagnostics; the [`Display`][fmt::Display]
    /// implementation renders the same information.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let set = SkipSet::try_from_keys(0..50)?;
    /// let levels = set.levels();
    /// assert_eq!(levels.len(), set.height());
    /// assert_eq!(levels.last(), Some(&(0..50).collect::<Vec<_>>()));
    /// # Ok::<(), skipset::SkipSetError>(())
    /// ```
    #[must_use]
    pub fn levels(&self) -> Vec<Vec<Key>> {
        self.heads
            .iter()
            .zip(&self.tails)
            .rev()
            .map(|(&head, &tail)| {
                iter::successors(self.nodes[head].next, |&id| self.nodes[id].next)
                    .take_while(|&id| id != tail)
                    .map(|id| self.nodes[id].key)
                    .collect()
            })
            .collect()
    }
}

impl<C> SkipSet<C>
where
    C: Coin,
{
    /// Create a new, empty skipset which promotes keys using `coin`.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// // Never promote: the set degenerates into a sorted linked list.
    /// let mut set = SkipSet::with_coin(|| false);
    /// for key in 0..10 {
    ///     set.insert(key)?;
    /// }
    /// assert_eq!(set.height(), 1);
    /// # Ok::<(), skipset::SkipSetError>(())
    /// ```
    #[inline]
    pub fn with_coin(coin: C) -> Self {
        let mut set = SkipSet {
            nodes: Arena::default(),
            heads: Vec::new(),
            tails: Vec::new(),
            len: 0,
            coin,
        };
        set.push_level();
        set
    }

    /// Adds `key` to the skipset, returning `true` if it was not already
    /// present.
    ///
    /// # Errors
    ///
    /// Fails with [`SkipSetError::InvalidKey`] if `key` is a sentinel value.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut set = SkipSet::new();
    /// assert_eq!(set.insert(1), Ok(true));
    /// assert_eq!(set.insert(1), Ok(false));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, key: Key) -> Result<bool, SkipSetError> {
        validate(key)?;
        let landing = self.search(key);
        if self.nodes[landing].key == key {
            trace!(key, "insert: duplicate");
            return Ok(false);
        }
        debug_assert!(
            self.nodes[landing].downstream.is_none(),
            "A missed search must end on level 0"
        );

        let node = self.nodes.alloc(SkipNode::new(key));
        self.nodes.splice_after(landing, node);
        self.len += 1;
        trace!(key, len = self.len, "insert: added");

        self.promote(node);
        Ok(true)
    }

    /// Copies `node` onto successively higher levels for as long as the coin
    /// succeeds, creating new levels as needed.
    fn promote(&mut self, mut node: NodeId) {
        while self.coin.flip() {
            let key = self.nodes[node].key;
            let above = self.nodes.alloc(SkipNode::new(key));
            let anchor = self.climb_point(node);
            match self.nodes[anchor].upstream {
                Some(up) => self.nodes.splice_after(up, above),
                None => {
                    let (head, _) = self.push_level();
                    self.nodes.splice_after(head, above);
                    debug!(key, height = self.height(), "promote: new level");
                }
            }
            self.nodes.stack(node, above);
            node = above;
        }
    }
}

// ///////////////////////////////////////////////
// Internal methods
// ///////////////////////////////////////////////

impl<C> SkipSet<C> {
    /// Appends a new top level consisting of just its two sentinels, stacked
    /// on top of the previous top level's sentinels.
    fn push_level(&mut self) -> (NodeId, NodeId) {
        let head = self.nodes.alloc(SkipNode::new(MIN_SENTINEL));
        let tail = self.nodes.alloc(SkipNode::new(MAX_SENTINEL));
        self.nodes.link(head, tail);
        if let (Some(&below_head), Some(&below_tail)) = (self.heads.last(), self.tails.last()) {
            self.nodes.stack(below_head, head);
            self.nodes.stack(below_tail, tail);
        }
        self.heads.push(head);
        self.tails.push(tail);
        (head, tail)
    }

    /// Discards top levels left with nothing between their sentinels.  Level 0
    /// is always kept.
    fn prune(&mut self) {
        let before = self.height();
        while self.heads.len() > 1 {
            let top = self.heads.len() - 1;
            let (head, tail) = (self.heads[top], self.tails[top]);
            if self.nodes[head].next != Some(tail) {
                break;
            }
            self.heads.pop();
            self.tails.pop();
            self.nodes.free(head);
            self.nodes.free(tail);
            let (below_head, below_tail) = (self.heads[top - 1], self.tails[top - 1]);
            self.nodes[below_head].upstream = None;
            self.nodes[below_tail].upstream = None;
        }
        if self.height() < before {
            debug!(
                pruned = before - self.height(),
                height = self.height(),
                "prune: dropped empty levels"
            );
        }
    }

    /// Drop-search for `key`, starting from the top head sentinel.
    ///
    /// The search moves right while the keys are smaller than `key`, and
    /// drops a level once it overshoots.  It returns the first node found
    /// holding `key` (which is that key's topmost occurrence), or otherwise
    /// the level-0 node after which `key` would be inserted.
    fn search(&self, key: Key) -> NodeId {
        let mut current = self.heads[self.heads.len() - 1];
        loop {
            let node = &self.nodes[current];
            match node.key.cmp(&key) {
                Ordering::Equal => break,
                Ordering::Greater => {
                    let Some(previous) = node.previous else {
                        break;
                    };
                    current = previous;
                    match self.nodes[previous].downstream {
                        Some(below) => current = below,
                        None => break,
                    }
                }
                Ordering::Less => match node.next.or(node.downstream) {
                    Some(step) => current = step,
                    None => break,
                },
            }
        }
        current
    }

    /// Follows `downstream` links from `id` to the level-0 occurrence.
    fn bottom(&self, mut id: NodeId) -> NodeId {
        while let Some(below) = self.nodes[id].downstream {
            id = below;
        }
        id
    }

    /// Walks left from `node` until reaching a node which has an `upstream`
    /// link, or the head sentinel of the level.
    fn climb_point(&self, mut node: NodeId) -> NodeId {
        while let Some(previous) = self.nodes[node].previous {
            node = previous;
            if self.nodes[node].upstream.is_some() {
                break;
            }
        }
        node
    }

    /// Checks the integrity of the skipset, panicking on the first broken
    /// invariant.
    #[cfg(test)]
    #[expect(clippy::panic, reason = "Integrity failures are test failures")]
    pub(crate) fn check(&self) {
        assert!(!self.heads.is_empty(), "No levels");
        assert_eq!(self.heads.len(), self.tails.len(), "Unpaired sentinels");

        let mut live = 0;
        for (level, (&head, &tail)) in self.heads.iter().zip(&self.tails).enumerate() {
            assert_eq!(self.nodes[head].key, MIN_SENTINEL);
            assert_eq!(self.nodes[tail].key, MAX_SENTINEL);
            assert_eq!(self.nodes[head].previous, None);
            assert_eq!(self.nodes[tail].next, None);

            // Sentinel towers span exactly the levels present.
            for (sentinel, column) in [(head, &self.heads), (tail, &self.tails)] {
                let up = column.get(level + 1).copied();
                let down = level.checked_sub(1).map(|below| column[below]);
                assert_eq!(self.nodes[sentinel].upstream, up);
                assert_eq!(self.nodes[sentinel].downstream, down);
            }

            let mut count = 0;
            let mut current = head;
            loop {
                let Some(next) = self.nodes[current].next else {
                    panic!("Level {level} does not reach its tail");
                };
                assert_eq!(self.nodes[next].previous, Some(current));
                assert!(
                    self.nodes[current].key < self.nodes[next].key,
                    "Level {level} is not strictly ascending"
                );
                if next == tail {
                    break;
                }
                self.check_tower(next, level);
                count += 1;
                current = next;
            }

            if level == 0 {
                assert_eq!(count, self.len, "Level 0 does not match the length");
            } else {
                assert!(count > 0, "Level {level} is empty");
            }
            live += count + 2;
        }
        assert_eq!(self.nodes.live(), live, "Arena holds unreachable nodes");
    }

    /// Checks that the non-sentinel `id`, found on `level`, is vertically
    /// consistent with the occurrences of its key.
    #[cfg(test)]
    fn check_tower(&self, id: NodeId, level: usize) {
        let node = &self.nodes[id];
        if let Some(up) = node.upstream {
            assert_eq!(self.nodes[up].downstream, Some(id));
            assert_eq!(self.nodes[up].key, node.key);
        }
        match node.downstream {
            Some(down) => {
                assert!(level > 0, "Level 0 node {} has a downstream", node.key);
                assert_eq!(self.nodes[down].upstream, Some(id));
                assert_eq!(self.nodes[down].key, node.key);
            }
            None => assert_eq!(level, 0, "Key {} floats above level 0", node.key),
        }
    }
}

/// Rejects the two reserved sentinel values.
fn validate(key: Key) -> Result<(), SkipSetError> {
    if key == MIN_SENTINEL || key == MAX_SENTINEL {
        return Err(SkipSetError::InvalidKey(key));
    }
    Ok(())
}

// ///////////////////////////////////////////////
// Trait implementation
// ///////////////////////////////////////////////

impl Default for SkipSet<Fair> {
    #[inline]
    fn default() -> Self {
        SkipSet::new()
    }
}

impl<C> fmt::Debug for SkipSet<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Renders each level on its own line, top level first.
impl<C> fmt::Display for SkipSet<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "-----")?;
        for level in self.levels() {
            writeln!(f, "{level:?}")?;
        }
        write!(f, "-----")
    }
}

impl<'a, C> iter::IntoIterator for &'a SkipSet<C> {
    type Item = Key;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

// ///////////////////////////////////////////////
// Iterator
// ///////////////////////////////////////////////

/// Ascending iterator over the keys of a [`SkipSet`], created by
/// [`SkipSet::iter`].
pub struct Iter<'a> {
    /// The arena of the set being iterated.
    nodes: &'a Arena,
    /// The last level-0 node yielded from the front (initially the head).
    front: NodeId,
    /// The last level-0 node yielded from the back (initially the tail).
    back: NodeId,
    /// Keys not yet yielded from either end.
    remaining: usize,
}

impl Iterator for Iter<'_> {
    type Item = Key;

    fn next(&mut self) -> Option<Key> {
        if self.remaining == 0 {
            return None;
        }
        let next = self.nodes[self.front].next?;
        self.front = next;
        self.remaining -= 1;
        Some(self.nodes[next].key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Key> {
        if self.remaining == 0 {
            return None;
        }
        let previous = self.nodes[self.back].previous?;
        self.back = previous;
        self.remaining -= 1;
        Some(self.nodes[previous].key)
    }
}

impl ExactSizeIterator for Iter<'_> {}

// ////////////////////////////////////////////////////////////////////////////
// Tests
// ////////////////////////////////////////////////////////////////////////////
