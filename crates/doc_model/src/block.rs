//! Block Container - paragraphs, tables and block content controls
//!
//! The container keeps a single document-order list of its nodes. The
//! paragraph, table and content control views are filtered from that list
//! on request, so the views can never drift apart. Every mutation is written
//! to the backing tree first and then mirrored in the list.

use crate::classify::{self, ContentFamily};
use crate::position::{self, Categorized, Position};
use crate::{
    markup, BlockContentControl, ContainerOwner, ContentSource, DocModelError, EditSession, Node,
    NodeKind, Paragraph, Result, Table,
};
use markup_tree::{BackingTree, Cursor, ElementId, ElementSnapshot};
use serde::{Deserialize, Serialize};

// =============================================================================
// Block Nodes
// =============================================================================

/// Category of a block node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    Paragraph,
    Table,
    ContentControl,
}

impl BlockKind {
    /// Element name created for this kind
    pub fn element_name(&self) -> &'static str {
        match self {
            BlockKind::Paragraph => markup::PARAGRAPH,
            BlockKind::Table => markup::TABLE,
            BlockKind::ContentControl => markup::SDT,
        }
    }

    /// Block kind of a classified node, if it is a block node
    pub fn from_node_kind(kind: NodeKind) -> Option<Self> {
        match kind {
            NodeKind::Paragraph => Some(BlockKind::Paragraph),
            NodeKind::Table => Some(BlockKind::Table),
            NodeKind::BlockContentControl => Some(BlockKind::ContentControl),
            _ => None,
        }
    }
}

/// A node of a block container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockNode {
    Paragraph(Paragraph),
    Table(Table),
    ContentControl(BlockContentControl),
}

impl BlockNode {
    fn load(tree: &dyn BackingTree, kind: BlockKind, element: ElementId) -> Self {
        match kind {
            BlockKind::Paragraph => BlockNode::Paragraph(Paragraph::load(tree, element)),
            BlockKind::Table => BlockNode::Table(Table::new(element)),
            BlockKind::ContentControl => {
                BlockNode::ContentControl(BlockContentControl::load(tree, element))
            }
        }
    }

    fn empty(kind: BlockKind, element: ElementId) -> Self {
        match kind {
            BlockKind::Paragraph => BlockNode::Paragraph(Paragraph::empty(element)),
            BlockKind::Table => BlockNode::Table(Table::new(element)),
            BlockKind::ContentControl => {
                BlockNode::ContentControl(BlockContentControl::unbound(element))
            }
        }
    }

    pub fn block_kind(&self) -> BlockKind {
        match self {
            BlockNode::Paragraph(_) => BlockKind::Paragraph,
            BlockNode::Table(_) => BlockKind::Table,
            BlockNode::ContentControl(_) => BlockKind::ContentControl,
        }
    }

    /// This node's contribution to its container's text
    pub fn text(&self, tree: &dyn BackingTree) -> String {
        match self {
            BlockNode::Paragraph(p) => p.text(tree),
            BlockNode::Table(t) => t.text(tree),
            BlockNode::ContentControl(c) => c.text(tree),
        }
    }

    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            BlockNode::Paragraph(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_paragraph_mut(&mut self) -> Option<&mut Paragraph> {
        match self {
            BlockNode::Paragraph(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            BlockNode::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_table_mut(&mut self) -> Option<&mut Table> {
        match self {
            BlockNode::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_content_control(&self) -> Option<&BlockContentControl> {
        match self {
            BlockNode::ContentControl(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_content_control_mut(&mut self) -> Option<&mut BlockContentControl> {
        match self {
            BlockNode::ContentControl(c) => Some(c),
            _ => None,
        }
    }
}

impl Node for BlockNode {
    fn element(&self) -> ElementId {
        match self {
            BlockNode::Paragraph(p) => p.element(),
            BlockNode::Table(t) => t.element(),
            BlockNode::ContentControl(c) => c.element(),
        }
    }

    fn kind(&self) -> NodeKind {
        match self {
            BlockNode::Paragraph(p) => p.kind(),
            BlockNode::Table(t) => t.kind(),
            BlockNode::ContentControl(c) => c.kind(),
        }
    }
}

impl Categorized for BlockNode {
    type Category = BlockKind;

    fn category(&self) -> BlockKind {
        self.block_kind()
    }
}

// =============================================================================
// Block Container
// =============================================================================

/// Ordered block content of a body, comment, text box, table cell or block
/// content control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockContainer {
    element: ElementId,
    owner: ContainerOwner,
    unified: Vec<BlockNode>,
}

impl BlockContainer {
    /// Mirror the block children of an existing element in one pass
    pub fn load(tree: &dyn BackingTree, element: ElementId, owner: ContainerOwner) -> Self {
        let unified = classify::walk(tree, element, ContentFamily::Block)
            .into_iter()
            .filter_map(|c| {
                BlockKind::from_node_kind(c.kind).map(|kind| BlockNode::load(tree, kind, c.element))
            })
            .collect();
        Self {
            element,
            owner,
            unified,
        }
    }

    /// An empty container over an element with no block children
    pub fn new_empty(element: ElementId, owner: ContainerOwner) -> Self {
        Self {
            element,
            owner,
            unified: Vec::new(),
        }
    }

    /// The backing element whose children this container mirrors
    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn owner(&self) -> ContainerOwner {
        self.owner
    }

    pub fn len(&self) -> usize {
        self.unified.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unified.is_empty()
    }

    /// All nodes in document order
    pub fn nodes(&self) -> &[BlockNode] {
        &self.unified
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlockNode> {
        self.unified.iter()
    }

    pub fn get(&self, index: usize) -> Option<&BlockNode> {
        self.unified.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut BlockNode> {
        self.unified.get_mut(index)
    }

    // -------------------------------------------------------------------------
    // Typed views
    // -------------------------------------------------------------------------

    pub fn paragraphs(&self) -> Vec<&Paragraph> {
        self.unified.iter().filter_map(BlockNode::as_paragraph).collect()
    }

    pub fn tables(&self) -> Vec<&Table> {
        self.unified.iter().filter_map(BlockNode::as_table).collect()
    }

    pub fn content_controls(&self) -> Vec<&BlockContentControl> {
        self.unified
            .iter()
            .filter_map(BlockNode::as_content_control)
            .collect()
    }

    /// Paragraph by its index among paragraphs
    pub fn paragraph(&self, index: usize) -> Option<&Paragraph> {
        self.typed(BlockKind::Paragraph, index)
            .and_then(BlockNode::as_paragraph)
    }

    pub fn paragraph_mut(&mut self, index: usize) -> Option<&mut Paragraph> {
        self.typed_mut(BlockKind::Paragraph, index)
            .and_then(BlockNode::as_paragraph_mut)
    }

    pub fn table(&self, index: usize) -> Option<&Table> {
        self.typed(BlockKind::Table, index).and_then(BlockNode::as_table)
    }

    pub fn content_control(&self, index: usize) -> Option<&BlockContentControl> {
        self.typed(BlockKind::ContentControl, index)
            .and_then(BlockNode::as_content_control)
    }

    pub fn content_control_mut(&mut self, index: usize) -> Option<&mut BlockContentControl> {
        self.typed_mut(BlockKind::ContentControl, index)
            .and_then(BlockNode::as_content_control_mut)
    }

    fn typed(&self, kind: BlockKind, index: usize) -> Option<&BlockNode> {
        position::unified_index(&self.unified, kind, index).map(|i| &self.unified[i])
    }

    fn typed_mut(&mut self, kind: BlockKind, index: usize) -> Option<&mut BlockNode> {
        let unified = position::unified_index(&self.unified, kind, index)?;
        self.unified.get_mut(unified)
    }

    /// Paragraph index of the node at a unified index, if it is a paragraph
    pub fn paragraph_pos(&self, index: usize) -> Option<usize> {
        self.typed_pos(BlockKind::Paragraph, index)
    }

    pub fn table_pos(&self, index: usize) -> Option<usize> {
        self.typed_pos(BlockKind::Table, index)
    }

    pub fn content_control_pos(&self, index: usize) -> Option<usize> {
        self.typed_pos(BlockKind::ContentControl, index)
    }

    fn typed_pos(&self, kind: BlockKind, index: usize) -> Option<usize> {
        match position::typed_index(&self.unified, index)? {
            (found, typed) if found == kind => Some(typed),
            _ => None,
        }
    }

    // -------------------------------------------------------------------------
    // Lookup
    // -------------------------------------------------------------------------

    /// Unified and typed index of the node mirroring `element`
    pub fn position_of(&self, element: ElementId) -> Option<Position> {
        let unified = self.unified.iter().position(|n| n.element() == element)?;
        let (_, typed) = position::typed_index(&self.unified, unified)?;
        Some(Position { unified, typed })
    }

    /// Unified index of the `typed`-th node of `kind`
    pub fn unified_index(&self, kind: BlockKind, typed: usize) -> Option<usize> {
        position::unified_index(&self.unified, kind, typed)
    }

    pub fn paragraph_by_element(&self, element: ElementId) -> Option<&Paragraph> {
        self.by_element(element).and_then(BlockNode::as_paragraph)
    }

    pub fn table_by_element(&self, element: ElementId) -> Option<&Table> {
        self.by_element(element).and_then(BlockNode::as_table)
    }

    pub fn content_control_by_element(&self, element: ElementId) -> Option<&BlockContentControl> {
        self.by_element(element)
            .and_then(BlockNode::as_content_control)
    }

    fn by_element(&self, element: ElementId) -> Option<&BlockNode> {
        self.unified.iter().find(|n| n.element() == element)
    }

    // -------------------------------------------------------------------------
    // Creation
    // -------------------------------------------------------------------------

    /// Append a new, empty node of `kind` at the end of the container
    pub fn create(&mut self, session: &mut EditSession<'_>, kind: BlockKind) -> Result<&mut BlockNode> {
        let element = session
            .tree_mut()
            .append_element(self.element, kind.element_name())
            .ok_or(DocModelError::NodeNotFound(self.element))?;
        Ok(self.push(BlockNode::empty(kind, element)))
    }

    pub fn create_paragraph(&mut self, session: &mut EditSession<'_>) -> Result<&mut Paragraph> {
        self.create(session, BlockKind::Paragraph)?
            .as_paragraph_mut()
            .ok_or_else(|| kind_mismatch(BlockKind::Paragraph))
    }

    pub fn create_table(&mut self, session: &mut EditSession<'_>) -> Result<&mut Table> {
        self.create(session, BlockKind::Table)?
            .as_table_mut()
            .ok_or_else(|| kind_mismatch(BlockKind::Table))
    }

    pub fn create_sdt(&mut self, session: &mut EditSession<'_>) -> Result<&mut BlockContentControl> {
        self.create(session, BlockKind::ContentControl)?
            .as_content_control_mut()
            .ok_or_else(|| kind_mismatch(BlockKind::ContentControl))
    }

    /// Splice a new, empty node of `kind` in at the cursor.
    ///
    /// The cursor must be a current child slot of this container's element.
    /// On success it is advanced past the new node, so repeated inserts with
    /// the same cursor land in order.
    ///
    /// # Panics
    ///
    /// Panics if the cursor was taken from a different backing tree.
    pub fn insert_at(
        &mut self,
        session: &mut EditSession<'_>,
        cursor: &mut Cursor,
        kind: BlockKind,
    ) -> Result<&mut BlockNode> {
        let tree = session.tree_mut();
        if !tree.is_current(cursor) || !cursor.is_child_slot_of(self.element) {
            tracing::debug!(container = %self.element, ?kind, "rejected insert at foreign cursor slot");
            return Err(DocModelError::InvalidCursorPosition {
                container: self.element,
            });
        }

        let index = position::count_before(&*tree, self.element, cursor.slot(), ContentFamily::Block);
        let element = tree
            .insert_element(cursor, kind.element_name())
            .ok_or(DocModelError::InvalidCursorPosition {
                container: self.element,
            })?;
        self.unified.insert(index, BlockNode::empty(kind, element));
        Ok(&mut self.unified[index])
    }

    pub fn insert_paragraph(&mut self, session: &mut EditSession<'_>, cursor: &mut Cursor) -> Result<&mut Paragraph> {
        self.insert_at(session, cursor, BlockKind::Paragraph)?
            .as_paragraph_mut()
            .ok_or_else(|| kind_mismatch(BlockKind::Paragraph))
    }

    pub fn insert_table(&mut self, session: &mut EditSession<'_>, cursor: &mut Cursor) -> Result<&mut Table> {
        self.insert_at(session, cursor, BlockKind::Table)?
            .as_table_mut()
            .ok_or_else(|| kind_mismatch(BlockKind::Table))
    }

    pub fn insert_sdt(
        &mut self,
        session: &mut EditSession<'_>,
        cursor: &mut Cursor,
    ) -> Result<&mut BlockContentControl> {
        self.insert_at(session, cursor, BlockKind::ContentControl)?
            .as_content_control_mut()
            .ok_or_else(|| kind_mismatch(BlockKind::ContentControl))
    }

    // -------------------------------------------------------------------------
    // Copying
    // -------------------------------------------------------------------------

    /// Append a deep copy of `node`, which must live in the session's tree.
    ///
    /// The source may belong to this container. A table with no text is
    /// copied as an empty paragraph while
    /// [`ContentSettings::clone_empty_table_as_paragraph`](crate::ContentSettings)
    /// is set.
    pub fn clone_node(&mut self, session: &mut EditSession<'_>, node: &BlockNode) -> Result<&mut BlockNode> {
        if clones_as_paragraph(session, session.tree(), node) {
            return self.create(session, BlockKind::Paragraph);
        }
        let copy = session
            .tree_mut()
            .copy_subtree(node.element(), self.element)
            .ok_or(DocModelError::NodeNotFound(node.element()))?;
        Ok(self.push(BlockNode::load(session.tree(), node.block_kind(), copy)))
    }

    /// Append a deep copy of the node at `index` of this container
    pub fn duplicate(&mut self, session: &mut EditSession<'_>, index: usize) -> Result<&mut BlockNode> {
        let node = self
            .unified
            .get(index)
            .cloned()
            .ok_or(DocModelError::IndexOutOfRange {
                index,
                len: self.unified.len(),
            })?;
        self.clone_node(session, &node)
    }

    /// Append a deep copy of a node from another document.
    ///
    /// Hyperlinks in the copy are registered with this session's resolver.
    pub fn import_node(
        &mut self,
        session: &mut EditSession<'_>,
        source: ContentSource<'_>,
        node: &BlockNode,
    ) -> Result<&mut BlockNode> {
        if clones_as_paragraph(session, source.tree, node) {
            return self.create(session, BlockKind::Paragraph);
        }
        let copy = session
            .tree_mut()
            .import_subtree(source.tree, node.element(), self.element)
            .ok_or(DocModelError::NodeNotFound(node.element()))?;
        session.relink_imported(source.links, copy);
        Ok(self.push(BlockNode::load(session.tree(), node.block_kind(), copy)))
    }

    /// Replace the content control at `index` of the content controls view
    /// with a deep copy of `source`, which must live in the session's tree.
    ///
    /// The copy takes the old control's place in the backing tree and in
    /// every view. Returns false, changing nothing, if the index is out of
    /// range or the source is gone.
    pub fn set_content_control(
        &mut self,
        session: &mut EditSession<'_>,
        index: usize,
        source: &BlockContentControl,
    ) -> bool {
        let Some(unified) = self.unified_index(BlockKind::ContentControl, index) else {
            return false;
        };
        // Captured before removal; the source may be the control being replaced
        let Some(snapshot) = ElementSnapshot::capture(session.tree(), source.element()) else {
            return false;
        };
        let old = self.unified[unified].element();
        let tree = session.tree_mut();
        let (Some(parent), Some(slot)) = (tree.parent(old), tree.index_in_parent(old)) else {
            return false;
        };
        tree.remove_subtree(old);
        let Some(copy) = snapshot.materialize_at(tree, parent, slot) else {
            return false;
        };
        self.unified[unified] = BlockNode::ContentControl(BlockContentControl::load(&*tree, copy));
        tracing::trace!(container = %self.element, index, replaced = %old, "replaced block content control");
        true
    }

    fn push(&mut self, node: BlockNode) -> &mut BlockNode {
        let index = self.unified.len();
        self.unified.push(node);
        &mut self.unified[index]
    }

    // -------------------------------------------------------------------------
    // Removal
    // -------------------------------------------------------------------------

    /// Remove the node at a unified index together with its backing subtree.
    ///
    /// Returns false, changing nothing, if the index is out of range.
    pub fn remove(&mut self, session: &mut EditSession<'_>, index: usize) -> bool {
        let Some((kind, typed)) = position::typed_index(&self.unified, index) else {
            return false;
        };
        let node = self.unified.remove(index);
        session.tree_mut().remove_subtree(node.element());
        tracing::trace!(container = %self.element, index, ?kind, typed, "removed block node");
        true
    }

    // -------------------------------------------------------------------------
    // Text and consistency
    // -------------------------------------------------------------------------

    /// Text of every node in document order, one entry per line
    pub fn text(&self, tree: &dyn BackingTree) -> String {
        self.unified
            .iter()
            .map(|n| n.text(tree))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Check that the node list matches a fresh walk of the backing children
    pub fn matches_backing(&self, tree: &dyn BackingTree) -> bool {
        let walked = classify::walk(tree, self.element, ContentFamily::Block);
        walked.len() == self.unified.len()
            && walked
                .iter()
                .zip(&self.unified)
                .all(|(c, n)| c.element == n.element() && c.kind == n.kind())
    }
}

fn clones_as_paragraph(session: &EditSession<'_>, source: &dyn BackingTree, node: &BlockNode) -> bool {
    match node {
        BlockNode::Table(table) => {
            session.settings().clone_empty_table_as_paragraph && table.text(source).is_empty()
        }
        _ => false,
    }
}

fn kind_mismatch(kind: BlockKind) -> DocModelError {
    DocModelError::InvalidOperation(format!("created node is not a {:?}", kind))
}
