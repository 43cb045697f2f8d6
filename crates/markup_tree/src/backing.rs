//! The backing tree interface
//!
//! [`BackingTree`] is the narrow structural interface the document model
//! consumes: ordered child enumeration, element creation at a cursor, subtree
//! copy and subtree delete. Any DOM-like store with ordered children can
//! implement the handful of required methods; cursor handling, copying and
//! ancestry queries come for free as provided methods.

use crate::{Cursor, ElementId, TreeId};

/// Ordered element tree that the document model mirrors
pub trait BackingTree {
    /// Identity of this tree
    fn tree_id(&self) -> TreeId;

    /// Structural generation; bumped by every insert and delete
    fn generation(&self) -> u64;

    /// The root element
    fn root(&self) -> ElementId;

    /// Check whether an element exists in this tree
    fn contains(&self, id: ElementId) -> bool;

    /// Qualified element name (e.g. `w:p`)
    fn name(&self, id: ElementId) -> Option<&str>;

    /// Parent element (None for the root or unknown ids)
    fn parent(&self, id: ElementId) -> Option<ElementId>;

    /// Direct children in document order (empty for unknown ids)
    fn children(&self, id: ElementId) -> &[ElementId];

    /// Attributes in insertion order
    fn attributes(&self, id: ElementId) -> &[(String, String)];

    /// Character content of a text-bearing element
    fn text(&self, id: ElementId) -> Option<&str>;

    /// Set or overwrite an attribute. Returns false for unknown ids.
    fn set_attribute(&mut self, id: ElementId, key: &str, value: &str) -> bool;

    /// Remove an attribute. Returns true if it was present.
    fn remove_attribute(&mut self, id: ElementId, key: &str) -> bool;

    /// Replace the character content of an element
    fn set_text(&mut self, id: ElementId, text: Option<&str>) -> bool;

    /// Create a new empty element as the `index`-th child of `parent`
    fn insert_child(&mut self, parent: ElementId, index: usize, name: &str) -> Option<ElementId>;

    /// Detach and drop an element with its whole subtree
    fn remove_subtree(&mut self, id: ElementId) -> bool;

    // -------------------------------------------------------------------------
    // Provided methods
    // -------------------------------------------------------------------------

    /// Look up a single attribute value
    fn attribute(&self, id: ElementId, key: &str) -> Option<&str> {
        self.attributes(id)
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Position of an element among its parent's children
    fn index_in_parent(&self, id: ElementId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    /// Check whether `ancestor` is a proper ancestor of `id`
    fn is_ancestor(&self, ancestor: ElementId, id: ElementId) -> bool {
        let mut current = self.parent(id);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent(p);
        }
        false
    }

    /// Append a new empty element at the end of `parent`'s children
    fn append_element(&mut self, parent: ElementId, name: &str) -> Option<ElementId> {
        let index = self.children(parent).len();
        self.insert_child(parent, index, name)
    }

    /// Cursor at a given child slot of `parent`
    fn cursor_at(&self, parent: ElementId, slot: usize) -> Option<Cursor> {
        if !self.contains(parent) || slot > self.children(parent).len() {
            return None;
        }
        Some(Cursor::new(self.tree_id(), self.generation(), parent, slot))
    }

    /// Cursor on the slot right before an element
    fn cursor_before(&self, id: ElementId) -> Option<Cursor> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        self.cursor_at(parent, index)
    }

    /// Cursor on the slot right after an element
    fn cursor_after(&self, id: ElementId) -> Option<Cursor> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        self.cursor_at(parent, index + 1)
    }

    /// Cursor on the end slot of an element's children
    fn cursor_at_end(&self, parent: ElementId) -> Option<Cursor> {
        self.cursor_at(parent, self.children(parent).len())
    }

    /// Check that a cursor is usable for an edit on this tree.
    ///
    /// # Panics
    ///
    /// Panics if the cursor was taken from a different tree. That is a
    /// programming error, not a recoverable position problem.
    fn is_current(&self, cursor: &Cursor) -> bool {
        assert_eq!(
            cursor.tree_id(),
            self.tree_id(),
            "cursor belongs to a different backing tree"
        );
        cursor.generation() == self.generation()
            && self.contains(cursor.parent())
            && cursor.slot() <= self.children(cursor.parent()).len()
    }

    /// Splice a new element in at the cursor and advance the cursor past it.
    ///
    /// Returns None, leaving the tree untouched, if the cursor is stale.
    fn insert_element(&mut self, cursor: &mut Cursor, name: &str) -> Option<ElementId> {
        if !self.is_current(cursor) {
            return None;
        }
        let id = self.insert_child(cursor.parent(), cursor.slot(), name)?;
        cursor.restamp(self.generation(), cursor.slot() + 1);
        Some(id)
    }

    /// Deep-copy a subtree of this tree and append the copy under `parent`.
    ///
    /// The source is captured before anything is written, so copying an
    /// element into its own descendants is well defined.
    fn copy_subtree(&mut self, source: ElementId, parent: ElementId) -> Option<ElementId> {
        let snapshot = ElementSnapshot::capture(&*self, source)?;
        snapshot.materialize(self, parent)
    }

    /// Deep-copy a subtree of another tree and append the copy under `parent`
    fn import_subtree(
        &mut self,
        source: &dyn BackingTree,
        source_id: ElementId,
        parent: ElementId,
    ) -> Option<ElementId> {
        let snapshot = ElementSnapshot::capture(source, source_id)?;
        snapshot.materialize(self, parent)
    }

    /// All elements of a subtree in pre-order, including `id` itself
    fn descendants(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !self.contains(current) {
                continue;
            }
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// First direct child with the given name
    fn first_child_named(&self, id: ElementId, name: &str) -> Option<ElementId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&c| self.name(c) == Some(name))
    }
}

/// Detached copy of a subtree, used to move content between or within trees
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSnapshot {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<ElementSnapshot>,
}

impl ElementSnapshot {
    /// Capture an element and everything below it
    pub fn capture<T: BackingTree + ?Sized>(tree: &T, id: ElementId) -> Option<Self> {
        let name = tree.name(id)?.to_string();
        let children = tree
            .children(id)
            .iter()
            .filter_map(|&child| Self::capture(tree, child))
            .collect();
        Some(Self {
            name,
            attributes: tree.attributes(id).to_vec(),
            text: tree.text(id).map(str::to_string),
            children,
        })
    }

    /// Write the snapshot into a tree as the last child of `parent`
    pub fn materialize<T: BackingTree + ?Sized>(&self, tree: &mut T, parent: ElementId) -> Option<ElementId> {
        let index = tree.children(parent).len();
        self.materialize_at(tree, parent, index)
    }

    /// Write the snapshot into a tree at child slot `index` of `parent`
    pub fn materialize_at<T: BackingTree + ?Sized>(
        &self,
        tree: &mut T,
        parent: ElementId,
        index: usize,
    ) -> Option<ElementId> {
        let id = tree.insert_child(parent, index, &self.name)?;
        for (key, value) in &self.attributes {
            tree.set_attribute(id, key, value);
        }
        if let Some(text) = &self.text {
            tree.set_text(id, Some(text));
        }
        for child in &self.children {
            child.materialize(tree, id)?;
        }
        Some(id)
    }
}
