//! Editing session
//!
//! Every mutating container operation takes an [`EditSession`]: the backing
//! tree it edits, the resolver for new relationships and the active content
//! settings, borrowed together for the duration of one edit.

use crate::{markup, ContentSettings, RelationshipResolver};
use markup_tree::{BackingTree, ElementId};

/// Mutable access to the collaborators of one logical editing session
pub struct EditSession<'a> {
    pub(crate) tree: &'a mut dyn BackingTree,
    pub(crate) links: &'a mut dyn RelationshipResolver,
    pub(crate) settings: &'a ContentSettings,
}

impl<'a> EditSession<'a> {
    /// Bundle a backing tree, resolver and settings
    pub fn new(
        tree: &'a mut dyn BackingTree,
        links: &'a mut dyn RelationshipResolver,
        settings: &'a ContentSettings,
    ) -> Self {
        Self {
            tree,
            links,
            settings,
        }
    }

    /// Read access to the backing tree
    pub fn tree(&self) -> &dyn BackingTree {
        &*self.tree
    }

    /// Write access to the backing tree
    pub fn tree_mut(&mut self) -> &mut dyn BackingTree {
        &mut *self.tree
    }

    /// The relationship resolver
    pub fn links(&self) -> &dyn RelationshipResolver {
        &*self.links
    }

    /// The active content settings
    pub fn settings(&self) -> &ContentSettings {
        self.settings
    }

    /// Re-register the hyperlink targets of content copied in from another
    /// document, so each `r:id` below `root` resolves in this one.
    ///
    /// Returns the number of hyperlinks rewritten. Ids the source cannot
    /// resolve are left alone.
    pub fn relink_imported(&mut self, source_links: &dyn RelationshipResolver, root: ElementId) -> usize {
        let mut rewritten = 0;
        for element in self.tree.descendants(root) {
            if self.tree.name(element) != Some(markup::HYPERLINK) {
                continue;
            }
            let Some(old_id) = self.tree.attribute(element, markup::RELATIONSHIP_ID) else {
                continue;
            };
            let Some(target) = source_links.target(old_id) else {
                tracing::debug!(element = %element, old_id, "imported hyperlink has no target");
                continue;
            };
            let new_id = self.links.register_external_link(target);
            self.tree.set_attribute(element, markup::RELATIONSHIP_ID, &new_id);
            rewritten += 1;
        }
        rewritten
    }
}

/// Read access to the document content is copied from
#[derive(Clone, Copy)]
pub struct ContentSource<'a> {
    pub tree: &'a dyn BackingTree,
    pub links: &'a dyn RelationshipResolver,
}

impl<'a> ContentSource<'a> {
    pub fn new(tree: &'a dyn BackingTree, links: &'a dyn RelationshipResolver) -> Self {
        Self { tree, links }
    }
}
