//! Structural cursors
//!
//! A cursor addresses a *slot* among the children of one element: slot `n`
//! sits immediately before the n-th child, and slot `children.len()` is the
//! end of the child list. Inserting at a cursor splices the new element into
//! that slot.
//!
//! Cursors are short-lived. Each one is stamped with the generation of the
//! tree it was taken from; any structural change to the tree makes older
//! cursors stale, and trees refuse to insert through a stale cursor.

use crate::{BackingTree, ElementId, TreeId};

/// A position between two siblings in a backing tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    tree: TreeId,
    generation: u64,
    parent: ElementId,
    slot: usize,
}

impl Cursor {
    /// Create a cursor for a slot. Backing tree implementations call this;
    /// callers normally use [`BackingTree::cursor_before`] and friends.
    pub fn new(tree: TreeId, generation: u64, parent: ElementId, slot: usize) -> Self {
        Self {
            tree,
            generation,
            parent,
            slot,
        }
    }

    /// The tree this cursor belongs to
    pub fn tree_id(&self) -> TreeId {
        self.tree
    }

    /// Tree generation the cursor was taken at
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The element whose children this cursor moves between
    pub fn parent(&self) -> ElementId {
        self.parent
    }

    /// Child slot index within the parent
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Check whether this cursor denotes a direct child slot of `element`
    pub fn is_child_slot_of(&self, element: ElementId) -> bool {
        self.parent == element
    }

    /// Re-stamp the cursor after the owning tree changed underneath it.
    ///
    /// Only the code that just performed an edit through this cursor should
    /// call this, to keep the cursor usable for the next edit at that point.
    pub fn restamp(&mut self, generation: u64, slot: usize) {
        self.generation = generation;
        self.slot = slot;
    }

    /// The element sitting right after the cursor, if any
    pub fn current<T: BackingTree + ?Sized>(&self, tree: &T) -> Option<ElementId> {
        tree.children(self.parent).get(self.slot).copied()
    }

    /// Step over the next sibling. Returns false at the end of the child list.
    pub fn to_next_sibling<T: BackingTree + ?Sized>(&mut self, tree: &T) -> bool {
        if self.slot < tree.children(self.parent).len() {
            self.slot += 1;
            true
        } else {
            false
        }
    }

    /// Step back over the previous sibling. Returns false at slot 0.
    pub fn to_prev_sibling(&mut self) -> bool {
        if self.slot > 0 {
            self.slot -= 1;
            true
        } else {
            false
        }
    }

    /// Move to the slot just before the parent element, one level up
    pub fn to_parent<T: BackingTree + ?Sized>(&mut self, tree: &T) -> bool {
        let Some(grandparent) = tree.parent(self.parent) else {
            return false;
        };
        let Some(index) = tree.index_in_parent(self.parent) else {
            return false;
        };
        self.parent = grandparent;
        self.slot = index;
        true
    }

    /// Descend into the element right after the cursor, to its first slot
    pub fn to_first_child<T: BackingTree + ?Sized>(&mut self, tree: &T) -> bool {
        match self.current(tree) {
            Some(child) => {
                self.parent = child;
                self.slot = 0;
                true
            }
            None => false,
        }
    }

    /// Move to the end of the current child list
    pub fn to_end<T: BackingTree + ?Sized>(&mut self, tree: &T) {
        self.slot = tree.children(self.parent).len();
    }

    /// Check whether the cursor lies anywhere inside the subtree of `ancestor`
    pub fn is_within<T: BackingTree + ?Sized>(&self, tree: &T, ancestor: ElementId) -> bool {
        self.parent == ancestor || tree.is_ancestor(ancestor, self.parent)
    }
}
