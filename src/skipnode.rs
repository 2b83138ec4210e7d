//! Nodes of the skipset and the arena that owns them.
//!
//! Every occurrence of a key at some level is a separate [`SkipNode`], and
//! nodes refer to one another through [`NodeId`] handles into an [`Arena`]
//! rather than through pointers. This keeps the four-way link graph (which is
//! cyclic in both directions) free of shared ownership while still allowing
//! every link update to happen in constant time.

use std::ops;

use crate::Key;

// ////////////////////////////////////////////////////////////////////////////
// SkipNode
// ////////////////////////////////////////////////////////////////////////////

/// Handle to a node stored in an [`Arena`].
///
/// A handle is only meaningful for the arena which issued it, and only until
/// the node is freed. After that the slot may be handed out again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

/// One occurrence of a key at one level.
///
/// The horizontal links (`previous` and `next`) connect nodes within the same
/// level, while the vertical links (`upstream` and `downstream`) connect the
/// occurrences of the same key on adjacent levels.  All four links are paired:
/// if `a.next == Some(b)` then `b.previous == Some(a)`, and likewise for
/// `upstream` and `downstream`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SkipNode {
    /// The key, or one of the sentinel values for the head and tail nodes.
    pub key: Key,
    /// The node immediately after this one on the same level.
    pub next: Option<NodeId>,
    /// The node immediately before this one on the same level.
    pub previous: Option<NodeId>,
    /// The occurrence of the same key one level higher.
    pub upstream: Option<NodeId>,
    /// The occurrence of the same key one level lower.
    pub downstream: Option<NodeId>,
}

impl SkipNode {
    /// Create a new unlinked node.
    pub fn new(key: Key) -> Self {
        SkipNode {
            key,
            next: None,
            previous: None,
            upstream: None,
            downstream: None,
        }
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Arena
// ////////////////////////////////////////////////////////////////////////////

/// Slot storage for [`SkipNode`]s.
///
/// Freed slots are kept on a free list and reused by the next allocation.
#[derive(Clone, Debug, Default)]
pub(crate) struct Arena {
    /// The slots; `None` marks a freed slot.
    slots: Vec<Option<SkipNode>>,
    /// Indices of freed slots, most recently freed last.
    free: Vec<usize>,
}

impl Arena {
    /// Store `node`, returning its handle.
    pub fn alloc(&mut self, node: SkipNode) -> NodeId {
        if let Some(index) = self.free.pop() {
            self.slots[index] = Some(node);
            NodeId(index)
        } else {
            self.slots.push(Some(node));
            NodeId(self.slots.len() - 1)
        }
    }

    /// Release the node behind `id` and return it.
    ///
    /// # Panics
    ///
    /// Panics if `id` was already freed.
    pub fn free(&mut self, id: NodeId) -> SkipNode {
        match self.slots[id.0].take() {
            Some(node) => {
                self.free.push(id.0);
                node
            }
            None => panic!("Node {} freed twice", id.0),
        }
    }

    /// Number of nodes currently alive.
    pub fn live(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Drop every node, invalidating all handles.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }

    // /////////////////////////////
    // Link Manipulation
    // /////////////////////////////

    /// Make `right` the horizontal successor of `left`.
    pub fn link(&mut self, left: NodeId, right: NodeId) {
        self[left].next = Some(right);
        self[right].previous = Some(left);
    }

    /// Place `above` directly on top of `below`.
    pub fn stack(&mut self, below: NodeId, above: NodeId) {
        self[below].upstream = Some(above);
        self[above].downstream = Some(below);
    }

    /// Insert the unlinked node `new` between `at` and its current successor.
    pub fn splice_after(&mut self, at: NodeId, new: NodeId) {
        if let Some(next) = self[at].next {
            self.link(new, next);
        }
        self.link(at, new);
    }

    /// Join the horizontal neighbours of `id`, bypassing it.
    ///
    /// The node keeps its own links so that callers can still read where it
    /// used to sit.
    pub fn unlink(&mut self, id: NodeId) {
        let SkipNode { previous, next, .. } = self[id];
        if let Some(previous) = previous {
            self[previous].next = next;
        }
        if let Some(next) = next {
            self[next].previous = previous;
        }
    }
}

impl ops::Index<NodeId> for Arena {
    type Output = SkipNode;

    #[expect(
        clippy::expect_used,
        reason = "Dangling handles are a broken link invariant"
    )]
    fn index(&self, id: NodeId) -> &SkipNode {
        self.slots[id.0].as_ref().expect("Dangling node handle")
    }
}

impl ops::IndexMut<NodeId> for Arena {
    #[expect(
        clippy::expect_used,
        reason = "Dangling handles are a broken link invariant"
    )]
    fn index_mut(&mut self, id: NodeId) -> &mut SkipNode {
        self.slots[id.0].as_mut().expect("Dangling node handle")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{Arena, SkipNode};

    #[test]
    fn alloc_reuses_freed_slots() {
        let mut arena = Arena::default();
        let a = arena.alloc(SkipNode::new(1));
        let b = arena.alloc(SkipNode::new(2));
        assert_eq!(arena.live(), 2);

        assert_eq!(arena.free(a).key, 1);
        assert_eq!(arena.live(), 1);

        let c = arena.alloc(SkipNode::new(3));
        assert_eq!(c, a);
        assert_eq!(arena[c].key, 3);
        assert_eq!(arena[b].key, 2);
        assert_eq!(arena.live(), 2);
    }

    #[test]
    #[should_panic(expected = "freed twice")]
    fn double_free() {
        let mut arena = Arena::default();
        let a = arena.alloc(SkipNode::new(1));
        arena.free(a);
        arena.free(a);
    }

    #[test]
    #[should_panic(expected = "Dangling node handle")]
    fn dangling_access() {
        let mut arena = Arena::default();
        let a = arena.alloc(SkipNode::new(1));
        arena.free(a);
        let _key = arena[a].key;
    }

    #[test]
    fn splice_and_unlink() {
        let mut arena = Arena::default();
        let head = arena.alloc(SkipNode::new(i32::MIN));
        let tail = arena.alloc(SkipNode::new(i32::MAX));
        arena.link(head, tail);

        let mid = arena.alloc(SkipNode::new(5));
        arena.splice_after(head, mid);
        assert_eq!(arena[head].next, Some(mid));
        assert_eq!(arena[mid].previous, Some(head));
        assert_eq!(arena[mid].next, Some(tail));
        assert_eq!(arena[tail].previous, Some(mid));

        arena.unlink(mid);
        assert_eq!(arena[head].next, Some(tail));
        assert_eq!(arena[tail].previous, Some(head));
        // The removed node still remembers its neighbours.
        assert_eq!(arena[mid].previous, Some(head));
    }

    #[test]
    fn stack_pairs_vertical_links() {
        let mut arena = Arena::default();
        let below = arena.alloc(SkipNode::new(7));
        let above = arena.alloc(SkipNode::new(7));
        arena.stack(below, above);
        assert_eq!(arena[below].upstream, Some(above));
        assert_eq!(arena[above].downstream, Some(below));
        assert_eq!(arena[below].downstream, None);
    }
}
