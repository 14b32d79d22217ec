//! Arena-backed red-black tree keyed by a caller-supplied comparator.
//!
//! A binary search tree that satisfies the following properties:
//! 1. Each node has a color, either red or black.
//! 2. A red node cannot have a red parent.
//! 3. Every path from the root to an absent-child position passes through
//!    the same number of black nodes.
//!
//! Properties 2-3 bound the depth of a tree with `n` nodes by
//! `2 * log2(n + 1)`, so insert, find and remove are O(log n).
//!
//! Nodes live in a slot vector owned by the tree; parent/child links are
//! small indices (`NodeId`) rather than pointers, with freed slots chained
//! on a free list and reused by later insertions.
//!
//! # Comparator convention
//!
//! The comparator is invoked as `cmp(candidate, stored)`. A `Greater`
//! result descends into the **left** subtree; `Equal` and `Less` descend
//! into the **right** subtree (ties go right). This is inverted relative
//! to the usual smaller-goes-left rule: with an ascending comparator the
//! leftmost node ([`RbTree::minimum`]) holds the largest object and the
//! rightmost node ([`RbTree::maximum`]) the smallest, and [`RbTree::traverse`]
//! visits objects in descending comparator order. Callers that want the
//! conventional mapping simply pass a reversed comparator.
//!
//! # Thread safety
//!
//! The tree performs no internal synchronization. Concurrent use requires
//! an external exclusive lock around every call for a given instance,
//! including read-only calls while any mutation may be in flight. See
//! `crate::cache` for the locking discipline layered on top.

use std::cmp::Ordering;

#[cfg(test)]
mod proptests;

/// Three-way comparison between a candidate object and a stored one.
///
/// `Greater` routes descent left, `Equal`/`Less` route right.
pub type Comparator<T> = fn(&T, &T) -> Ordering;

/// Errors from mutating tree operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The node arena could not grow to hold another node.
    #[error("node allocation failed")]
    AllocationFailed,
}

/// Result type for tree operations.
pub type Result<T> = std::result::Result<T, TreeError>;

/// Stable identifier of a live node within one tree.
///
/// A `NodeId` stays valid until any removal: freed slots are recycled, so
/// after `remove`/`remove_at`/`clear` every previously returned id must be
/// considered stale. Passing a stale id to an operation that takes one is
/// a contract violation and panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Absent-child sentinel, treated as black by the fixup passes.
    const NIL: NodeId = NodeId(u32::MAX);

    fn is_nil(self) -> bool {
        self == Self::NIL
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Red,
    Black,
}

#[derive(Debug, Clone)]
struct Node<T> {
    object: T,
    color: Color,
    parent: NodeId,
    left: NodeId,
    right: NodeId,
}

#[derive(Debug, Clone)]
enum Slot<T> {
    Occupied(Node<T>),
    /// Vacant slot, holding the next entry of the free list.
    Vacant(NodeId),
}

/// Outcome of [`RbTree::insert_unique`].
#[derive(Debug)]
pub enum Unique<T> {
    /// No equal object was present; the candidate was inserted here.
    New(NodeId),
    /// An equal object already exists at `node`; the tree is unchanged and
    /// the unstored candidate is handed back to the caller.
    Existing { node: NodeId, candidate: T },
}

/// Red-black tree over objects of type `T`.
///
/// The tree owns its objects; removal hands them back by value.
#[derive(Clone)]
pub struct RbTree<T> {
    slots: Vec<Slot<T>>,
    free: NodeId,
    root: NodeId,
    len: usize,
    cmp: Comparator<T>,
}

impl<T> RbTree<T> {
    /// Create an empty tree bound to a comparator.
    pub fn new(cmp: Comparator<T>) -> Self {
        Self {
            slots: Vec::new(),
            free: NodeId::NIL,
            root: NodeId::NIL,
            len: 0,
            cmp,
        }
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Longest root-to-leaf path, in nodes. O(n).
    pub fn depth(&self) -> usize {
        self.subtree_depth(self.root)
    }

    /// Borrow the object stored at a live node.
    ///
    /// # Panics
    /// Panics if `node` is stale (see [`NodeId`]).
    pub fn object(&self, node: NodeId) -> &T {
        &self.node(node).object
    }

    /// Borrow the object stored at `node`, or `None` if the id is stale.
    pub fn get(&self, node: NodeId) -> Option<&T> {
        match self.slots.get(node.index()) {
            Some(Slot::Occupied(n)) => Some(&n.object),
            _ => None,
        }
    }

    /// Insert unconditionally as a new leaf. Duplicates are permitted and
    /// placed by the descent rule (ties go right). O(log n).
    pub fn insert(&mut self, object: T) -> Result<NodeId> {
        if self.root.is_nil() {
            return self.insert_root(object);
        }

        let mut cur = self.root;
        let (parent, as_left) = loop {
            let node = self.node(cur);
            let go_left = (self.cmp)(&object, &node.object) == Ordering::Greater;
            let next = if go_left { node.left } else { node.right };
            if next.is_nil() {
                break (cur, go_left);
            }
            cur = next;
        };

        self.attach_leaf(parent, as_left, object)
    }

    /// Insert only if no equal object (comparator result `Equal`) exists.
    ///
    /// On a duplicate the tree is left untouched and the candidate is
    /// returned inside [`Unique::Existing`]. O(log n).
    pub fn insert_unique(&mut self, object: T) -> Result<Unique<T>> {
        if self.root.is_nil() {
            return self.insert_root(object).map(Unique::New);
        }

        let mut cur = self.root;
        let (parent, as_left) = loop {
            let node = self.node(cur);
            let ord = (self.cmp)(&object, &node.object);
            if ord == Ordering::Equal {
                return Ok(Unique::Existing {
                    node: cur,
                    candidate: object,
                });
            }
            let go_left = ord == Ordering::Greater;
            let next = if go_left { node.left } else { node.right };
            if next.is_nil() {
                break (cur, go_left);
            }
            cur = next;
        };

        self.attach_leaf(parent, as_left, object).map(Unique::New)
    }

    /// Insert `object` immediately after `at` in structural order, without
    /// consulting the comparator. `None` inserts at the overall minimum
    /// position (leftmost).
    ///
    /// The caller asserts that this placement keeps the tree ordered; the
    /// tree does not re-validate, and a wrong position silently corrupts
    /// the order invariant.
    ///
    /// # Panics
    /// Panics if `at` is stale.
    pub fn insert_after(&mut self, at: Option<NodeId>, object: T) -> Result<NodeId> {
        if self.root.is_nil() {
            return self.insert_root(object);
        }

        let (parent, as_left) = match at {
            None => (self.subtree_min(self.root), true),
            Some(at) => {
                let right = self.node(at).right;
                if right.is_nil() {
                    (at, false)
                } else {
                    (self.subtree_min(right), true)
                }
            }
        };

        self.attach_leaf(parent, as_left, object)
    }

    /// Insert `object` immediately before `at` in structural order, without
    /// consulting the comparator. `None` inserts at the overall maximum
    /// position (rightmost). Same caller contract as [`RbTree::insert_after`].
    ///
    /// # Panics
    /// Panics if `at` is stale.
    pub fn insert_before(&mut self, at: Option<NodeId>, object: T) -> Result<NodeId> {
        if self.root.is_nil() {
            return self.insert_root(object);
        }

        let (parent, as_left) = match at {
            None => (self.subtree_max(self.root), false),
            Some(at) => {
                let left = self.node(at).left;
                if left.is_nil() {
                    (at, true)
                } else {
                    (self.subtree_max(left), false)
                }
            }
        };

        self.attach_leaf(parent, as_left, object)
    }

    /// Find the node holding an object equal to `probe`. O(log n).
    pub fn find(&self, probe: &T) -> Option<NodeId> {
        let mut cur = self.root;
        while !cur.is_nil() {
            let node = self.node(cur);
            cur = match (self.cmp)(probe, &node.object) {
                Ordering::Equal => return Some(cur),
                Ordering::Greater => node.left,
                Ordering::Less => node.right,
            };
        }
        None
    }

    pub fn contains(&self, probe: &T) -> bool {
        self.find(probe).is_some()
    }

    /// Leftmost node. Under the descent rule this holds the object an
    /// ascending comparator would call the largest.
    pub fn minimum(&self) -> Option<NodeId> {
        if self.root.is_nil() {
            None
        } else {
            Some(self.subtree_min(self.root))
        }
    }

    /// Rightmost node; the smallest object under an ascending comparator.
    pub fn maximum(&self) -> Option<NodeId> {
        if self.root.is_nil() {
            None
        } else {
            Some(self.subtree_max(self.root))
        }
    }

    /// Next node in structural left-to-right order, or `None` at the
    /// rightmost node.
    ///
    /// # Panics
    /// Panics if `node` is stale.
    pub fn successor(&self, node: NodeId) -> Option<NodeId> {
        let succ = self.raw_successor(node);
        if succ.is_nil() {
            None
        } else {
            Some(succ)
        }
    }

    /// Previous node in structural left-to-right order, or `None` at the
    /// leftmost node.
    ///
    /// # Panics
    /// Panics if `node` is stale.
    pub fn predecessor(&self, node: NodeId) -> Option<NodeId> {
        let left = self.node(node).left;
        if !left.is_nil() {
            return Some(self.subtree_max(left));
        }
        let mut prev = node;
        let mut pred = self.node(node).parent;
        while !pred.is_nil() && prev == self.node(pred).left {
            prev = pred;
            pred = self.node(pred).parent;
        }
        if pred.is_nil() {
            None
        } else {
            Some(pred)
        }
    }

    /// Find an object equal to `probe`, unlink its node and hand the
    /// stored object back. `None` is the normal not-found outcome.
    pub fn remove(&mut self, probe: &T) -> Option<T> {
        let node = self.find(probe)?;
        Some(self.remove_at(node))
    }

    /// Remove a specific node, returning its object.
    ///
    /// A node with two children is first physically relocated: its in-order
    /// successor takes over the node's links and color (the links are
    /// swapped, not the payloads), then the node is spliced out of the
    /// successor's old position. If the spliced-out node was black, a fixup
    /// pass restores the black-height invariant. O(log n).
    ///
    /// # Panics
    /// Panics if `node` is stale.
    pub fn remove_at(&mut self, node: NodeId) -> T {
        if self.node(node).left != NodeId::NIL && self.node(node).right != NodeId::NIL {
            let succ = self.subtree_min(self.node(node).right);
            self.swap_with_successor(node, succ);
        }

        // At most one child now.
        let n = self.node(node);
        let child = if n.left.is_nil() { n.right } else { n.left };
        let parent = n.parent;
        let was_black = n.color == Color::Black;

        if !child.is_nil() {
            self.node_mut(child).parent = parent;
        }
        if parent.is_nil() {
            self.root = child;
        } else if self.node(parent).left == node {
            self.node_mut(parent).left = child;
        } else {
            self.node_mut(parent).right = child;
        }

        let object = self.release_slot(node);
        self.len -= 1;

        if was_black && !self.root.is_nil() {
            self.remove_fixup(child, parent);
        }

        object
    }

    /// Visit every object in structural left-to-right order.
    ///
    /// Recursion depth is bounded by the tree height, O(log n).
    pub fn traverse<F: FnMut(&T)>(&self, mut visit: F) {
        self.walk(self.root, &mut visit);
    }

    /// Visit every object in structural right-to-left order.
    pub fn traverse_rev<F: FnMut(&T)>(&self, mut visit: F) {
        self.walk_rev(self.root, &mut visit);
    }

    /// Iterate objects in structural left-to-right order without recursion
    /// (minimum plus successor walk).
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            tree: self,
            next: if self.root.is_nil() {
                NodeId::NIL
            } else {
                self.subtree_min(self.root)
            },
        }
    }

    /// Drop every node and reset to empty. Objects stored in the tree are
    /// dropped with their nodes.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free = NodeId::NIL;
        self.root = NodeId::NIL;
        self.len = 0;
    }

    // ------------------------------------------------------------------
    // Slot arena
    // ------------------------------------------------------------------

    fn node(&self, id: NodeId) -> &Node<T> {
        match self.slots.get(id.index()) {
            Some(Slot::Occupied(node)) => node,
            _ => panic!("stale NodeId passed to red-black tree operation"),
        }
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        match self.slots.get_mut(id.index()) {
            Some(Slot::Occupied(node)) => node,
            _ => panic!("stale NodeId passed to red-black tree operation"),
        }
    }

    fn alloc(&mut self, object: T, color: Color) -> Result<NodeId> {
        let node = Node {
            object,
            color,
            parent: NodeId::NIL,
            left: NodeId::NIL,
            right: NodeId::NIL,
        };
        if self.free.is_nil() {
            if self.slots.len() >= NodeId::NIL.index() {
                return Err(TreeError::AllocationFailed);
            }
            self.slots
                .try_reserve(1)
                .map_err(|_| TreeError::AllocationFailed)?;
            let id = NodeId(self.slots.len() as u32);
            self.slots.push(Slot::Occupied(node));
            Ok(id)
        } else {
            let id = self.free;
            let next_free = match self.slots[id.index()] {
                Slot::Vacant(next) => next,
                Slot::Occupied(_) => unreachable!("free list points at occupied slot"),
            };
            self.free = next_free;
            self.slots[id.index()] = Slot::Occupied(node);
            Ok(id)
        }
    }

    fn release_slot(&mut self, id: NodeId) -> T {
        let slot = std::mem::replace(&mut self.slots[id.index()], Slot::Vacant(self.free));
        self.free = id;
        match slot {
            Slot::Occupied(node) => node.object,
            Slot::Vacant(_) => panic!("stale NodeId passed to red-black tree operation"),
        }
    }

    // ------------------------------------------------------------------
    // Insertion plumbing
    // ------------------------------------------------------------------

    fn insert_root(&mut self, object: T) -> Result<NodeId> {
        // The root is always black.
        let id = self.alloc(object, Color::Black)?;
        self.root = id;
        self.len = 1;
        Ok(id)
    }

    fn attach_leaf(&mut self, parent: NodeId, as_left: bool, object: T) -> Result<NodeId> {
        let id = self.alloc(object, Color::Red)?;
        self.node_mut(id).parent = parent;
        if as_left {
            self.node_mut(parent).left = id;
        } else {
            self.node_mut(parent).right = id;
        }
        self.len += 1;
        self.insert_fixup(id);
        Ok(id)
    }

    // ------------------------------------------------------------------
    // Navigation helpers on raw ids
    // ------------------------------------------------------------------

    fn subtree_min(&self, mut node: NodeId) -> NodeId {
        while !self.node(node).left.is_nil() {
            node = self.node(node).left;
        }
        node
    }

    fn subtree_max(&self, mut node: NodeId) -> NodeId {
        while !self.node(node).right.is_nil() {
            node = self.node(node).right;
        }
        node
    }

    fn raw_successor(&self, node: NodeId) -> NodeId {
        let right = self.node(node).right;
        if !right.is_nil() {
            return self.subtree_min(right);
        }
        // Go up until we arrive at a parent from the left.
        let mut prev = node;
        let mut succ = self.node(node).parent;
        while !succ.is_nil() && prev == self.node(succ).right {
            prev = succ;
            succ = self.node(succ).parent;
        }
        succ
    }

    fn subtree_depth(&self, node: NodeId) -> usize {
        if node.is_nil() {
            return 0;
        }
        let left = self.subtree_depth(self.node(node).left);
        let right = self.subtree_depth(self.node(node).right);
        1 + left.max(right)
    }

    fn walk<F: FnMut(&T)>(&self, node: NodeId, visit: &mut F) {
        if !node.is_nil() {
            self.walk(self.node(node).left, visit);
            visit(&self.node(node).object);
            self.walk(self.node(node).right, visit);
        }
    }

    fn walk_rev<F: FnMut(&T)>(&self, node: NodeId, visit: &mut F) {
        if !node.is_nil() {
            self.walk_rev(self.node(node).right, visit);
            visit(&self.node(node).object);
            self.walk_rev(self.node(node).left, visit);
        }
    }

    // ------------------------------------------------------------------
    // Rebalancing
    // ------------------------------------------------------------------

    /// Color of a node, with absent children implicitly black.
    fn color(&self, node: NodeId) -> Color {
        if node.is_nil() {
            Color::Black
        } else {
            self.node(node).color
        }
    }

    fn set_color(&mut self, node: NodeId, color: Color) {
        self.node_mut(node).color = color;
    }

    /// Rotate the subtree at `x` left:
    ///
    /// ```text
    ///      |                 |
    ///      x                 y
    ///    /   \    ==>      /   \
    ///   T1    y           x    T3
    ///       /   \       /   \
    ///      T2    T3    T1    T2
    /// ```
    fn rotate_left(&mut self, x: NodeId) {
        let y = self.node(x).right;
        let t2 = self.node(y).left;

        self.node_mut(x).right = t2;
        if !t2.is_nil() {
            self.node_mut(t2).parent = x;
        }

        let x_parent = self.node(x).parent;
        self.node_mut(y).parent = x_parent;
        if x_parent.is_nil() {
            self.root = y;
        } else if self.node(x_parent).left == x {
            self.node_mut(x_parent).left = y;
        } else {
            self.node_mut(x_parent).right = y;
        }

        self.node_mut(y).left = x;
        self.node_mut(x).parent = y;
    }

    /// Mirror image of [`RbTree::rotate_left`].
    fn rotate_right(&mut self, y: NodeId) {
        let x = self.node(y).left;
        let t2 = self.node(x).right;

        self.node_mut(y).left = t2;
        if !t2.is_nil() {
            self.node_mut(t2).parent = y;
        }

        let y_parent = self.node(y).parent;
        self.node_mut(x).parent = y_parent;
        if y_parent.is_nil() {
            self.root = x;
        } else if self.node(y_parent).left == y {
            self.node_mut(y_parent).left = x;
        } else {
            self.node_mut(y_parent).right = x;
        }

        self.node_mut(x).right = y;
        self.node_mut(y).parent = x;
    }

    /// Restore the red-black properties after inserting a red leaf.
    fn insert_fixup(&mut self, node: NodeId) {
        let mut cur = node;

        while cur != self.root && self.color(self.node(cur).parent) == Color::Red {
            let parent = self.node(cur).parent;
            // The root is always black, so a red parent has a parent.
            let grandparent = self.node(parent).parent;

            if parent == self.node(grandparent).left {
                let uncle = self.node(grandparent).right;

                if self.color(uncle) == Color::Red {
                    // Red parent and red uncle: push the blackness down
                    // from the grandparent and continue from there.
                    self.set_color(parent, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    cur = grandparent;
                } else {
                    // Straighten a zig-zag into a zig-zig first.
                    if cur == self.node(parent).right {
                        cur = parent;
                        self.rotate_left(cur);
                    }
                    let parent = self.node(cur).parent;
                    let grandparent = self.node(parent).parent;
                    self.set_color(parent, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    self.rotate_right(grandparent);
                }
            } else {
                let uncle = self.node(grandparent).left;

                if self.color(uncle) == Color::Red {
                    self.set_color(parent, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    cur = grandparent;
                } else {
                    if cur == self.node(parent).left {
                        cur = parent;
                        self.rotate_right(cur);
                    }
                    let parent = self.node(cur).parent;
                    let grandparent = self.node(parent).parent;
                    self.set_color(parent, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    self.rotate_left(grandparent);
                }
            }
        }

        let root = self.root;
        self.set_color(root, Color::Black);
    }

    /// Restore the black-height invariant after splicing out a black node.
    ///
    /// `cur` is the node that replaced the spliced one (possibly the
    /// absent-child position, hence the explicit `parent`); paths through
    /// it are one black short until the deficiency is absorbed.
    fn remove_fixup(&mut self, mut cur: NodeId, mut parent: NodeId) {
        while cur != self.root && self.color(cur) == Color::Black {
            if self.node(parent).left == cur {
                let mut sibling = self.node(parent).right;

                if self.color(sibling) == Color::Red {
                    // Produce a black sibling before proceeding.
                    self.set_color(sibling, Color::Black);
                    self.set_color(parent, Color::Red);
                    self.rotate_left(parent);
                    sibling = self.node(parent).right;
                }

                // A deficient position always has a real sibling: paths on
                // the other side of `parent` carry at least one black node.
                debug_assert!(!sibling.is_nil(), "deficient node without sibling");

                if self.color(self.node(sibling).left) == Color::Black
                    && self.color(self.node(sibling).right) == Color::Black
                {
                    // Black sibling with two black children: recolor it and
                    // move up, stopping early at a red parent.
                    self.set_color(sibling, Color::Red);
                    if self.color(parent) == Color::Red {
                        self.set_color(parent, Color::Black);
                        cur = self.root;
                    } else {
                        cur = parent;
                        parent = self.node(cur).parent;
                    }
                } else {
                    if self.color(self.node(sibling).right) == Color::Red {
                        // Far nephew red: one rotation absorbs the
                        // deficiency.
                        let far = self.node(sibling).right;
                        self.set_color(far, Color::Black);
                        self.rotate_left(parent);
                    } else {
                        // Near nephew red: straighten it outward, then
                        // rotate at the parent.
                        self.rotate_right(sibling);
                        self.rotate_left(parent);
                    }
                    // The subtree's new top inherits the old parent color.
                    let top = self.node(parent).parent;
                    let parent_color = self.color(parent);
                    self.set_color(top, parent_color);
                    self.set_color(parent, Color::Black);
                    cur = self.root;
                }
            } else {
                let mut sibling = self.node(parent).left;

                if self.color(sibling) == Color::Red {
                    self.set_color(sibling, Color::Black);
                    self.set_color(parent, Color::Red);
                    self.rotate_right(parent);
                    sibling = self.node(parent).left;
                }

                debug_assert!(!sibling.is_nil(), "deficient node without sibling");

                if self.color(self.node(sibling).left) == Color::Black
                    && self.color(self.node(sibling).right) == Color::Black
                {
                    self.set_color(sibling, Color::Red);
                    if self.color(parent) == Color::Red {
                        self.set_color(parent, Color::Black);
                        cur = self.root;
                    } else {
                        cur = parent;
                        parent = self.node(cur).parent;
                    }
                } else {
                    if self.color(self.node(sibling).left) == Color::Red {
                        let far = self.node(sibling).left;
                        self.set_color(far, Color::Black);
                        self.rotate_right(parent);
                    } else {
                        self.rotate_left(sibling);
                        self.rotate_right(parent);
                    }
                    let top = self.node(parent).parent;
                    let parent_color = self.color(parent);
                    self.set_color(top, parent_color);
                    self.set_color(parent, Color::Black);
                    cur = self.root;
                }
            }
        }

        if !cur.is_nil() {
            self.set_color(cur, Color::Black);
        }
    }

    /// Physically exchange the links and colors of a node and its in-order
    /// successor, leaving the objects in place on their own nodes. May
    /// temporarily violate the order invariant; the caller splices the
    /// relocated node out immediately afterwards.
    fn swap_with_successor(&mut self, node: NodeId, succ: NodeId) {
        let immediate = self.node(node).right == succ;

        let s = self.node(succ);
        let (s_parent, s_left, s_right, s_color) = (s.parent, s.left, s.right, s.color);
        let n = self.node(node);
        let (n_parent, n_left, n_right, n_color) = (n.parent, n.left, n.right, n.color);

        {
            let s = self.node_mut(succ);
            s.parent = n_parent;
            s.left = n_left;
            s.right = if immediate { node } else { n_right };
            s.color = n_color;
        }
        {
            let n = self.node_mut(node);
            n.parent = if immediate { succ } else { s_parent };
            n.left = s_left;
            n.right = s_right;
            n.color = s_color;
        }

        if !immediate {
            let p = self.node(node).parent;
            if self.node(p).left == succ {
                self.node_mut(p).left = node;
            } else {
                self.node_mut(p).right = node;
            }
        }

        let n_left = self.node(node).left;
        if !n_left.is_nil() {
            self.node_mut(n_left).parent = node;
        }
        let n_right = self.node(node).right;
        if !n_right.is_nil() {
            self.node_mut(n_right).parent = node;
        }

        let s_parent = self.node(succ).parent;
        if s_parent.is_nil() {
            self.root = succ;
        } else if self.node(s_parent).left == node {
            self.node_mut(s_parent).left = succ;
        } else {
            self.node_mut(s_parent).right = succ;
        }

        let s_left = self.node(succ).left;
        if !s_left.is_nil() {
            self.node_mut(s_left).parent = succ;
        }
        let s_right = self.node(succ).right;
        if !s_right.is_nil() {
            self.node_mut(s_right).parent = succ;
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for RbTree<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RbTree")
            .field("len", &self.len)
            .field("depth", &self.depth())
            .finish_non_exhaustive()
    }
}

/// Structural left-to-right iterator, see [`RbTree::iter`].
pub struct Iter<'a, T> {
    tree: &'a RbTree<T>,
    next: NodeId,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.next.is_nil() {
            return None;
        }
        let current = self.next;
        self.next = self.tree.raw_successor(current);
        Some(&self.tree.node(current).object)
    }
}

impl<'a, T> IntoIterator for &'a RbTree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}
