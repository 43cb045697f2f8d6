//! Run Container - text, hyperlink and field runs and inline content controls
//!
//! Inline content is flattened on load: hyperlink and field wrappers yield
//! one node per run they hold, and tracked insertions or smart tags vanish
//! in favour of their children. The two typed views are "runs" (text,
//! hyperlink and field runs) and "sdt runs" (inline content controls).
//!
//! Runs held by one hyperlink or field wrapper share it. Removing a run only
//! deletes the wrapper once no other run in the container references it.

use crate::classify::{self, ClassifiedElement, ContentFamily};
use crate::position::{self, Categorized, Position};
use crate::{
    markup, ContainerOwner, ContentSource, DocModelError, EditSession, FieldRun, HyperlinkRun,
    InlineContentControl, Node, NodeKind, Result, TextRun,
};
use markup_tree::{BackingTree, Cursor, ElementId, ElementSnapshot};
use serde::{Deserialize, Serialize};

// =============================================================================
// Inline Nodes
// =============================================================================

/// The two typed views of a run container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InlineCategory {
    /// Text, hyperlink and field runs
    Run,
    /// Inline content controls
    ContentControl,
}

/// What to create in a run container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InlineKind {
    Run,
    /// A hyperlink run with a new wrapper pointing at this URI
    Hyperlink(String),
    Field,
    ContentControl,
}

/// A node of a run container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InlineNode {
    Text(TextRun),
    Hyperlink(HyperlinkRun),
    Field(FieldRun),
    ContentControl(InlineContentControl),
}

impl InlineNode {
    fn from_classified(tree: &dyn BackingTree, found: &ClassifiedElement) -> Option<Self> {
        let node = match (found.kind, found.wrapper) {
            (NodeKind::TextRun, _) => InlineNode::Text(TextRun::new(found.element)),
            (NodeKind::HyperlinkRun, Some(wrapper)) => {
                InlineNode::Hyperlink(HyperlinkRun::new(found.element, wrapper))
            }
            (NodeKind::FieldRun, Some(wrapper)) => {
                InlineNode::Field(FieldRun::new(found.element, wrapper))
            }
            (NodeKind::InlineContentControl, _) => {
                InlineNode::ContentControl(InlineContentControl::load(tree, found.element))
            }
            _ => return None,
        };
        Some(node)
    }

    pub fn category(&self) -> InlineCategory {
        match self {
            InlineNode::ContentControl(_) => InlineCategory::ContentControl,
            _ => InlineCategory::Run,
        }
    }

    /// Hyperlink or field wrapper this run shares with its siblings
    pub fn wrapper(&self) -> Option<ElementId> {
        match self {
            InlineNode::Hyperlink(run) => Some(run.wrapper()),
            InlineNode::Field(run) => Some(run.wrapper()),
            _ => None,
        }
    }

    /// Run text, or the nested text of a content control
    pub fn text(&self, tree: &dyn BackingTree) -> String {
        match self {
            InlineNode::Text(run) => run.text(tree),
            InlineNode::Hyperlink(run) => run.text(tree),
            InlineNode::Field(run) => run.text(tree),
            InlineNode::ContentControl(sdt) => sdt.text(tree),
        }
    }

    /// Replace the text of a run. Content controls are left unchanged and
    /// report false.
    pub fn set_text(&self, tree: &mut dyn BackingTree, text: &str) -> bool {
        match self {
            InlineNode::Text(run) => run.set_text(tree, text),
            InlineNode::Hyperlink(run) => run.set_text(tree, text),
            InlineNode::Field(run) => run.set_text(tree, text),
            InlineNode::ContentControl(_) => return false,
        }
        true
    }

    pub fn as_hyperlink_run(&self) -> Option<&HyperlinkRun> {
        match self {
            InlineNode::Hyperlink(run) => Some(run),
            _ => None,
        }
    }

    pub fn as_field_run(&self) -> Option<&FieldRun> {
        match self {
            InlineNode::Field(run) => Some(run),
            _ => None,
        }
    }

    pub fn as_content_control(&self) -> Option<&InlineContentControl> {
        match self {
            InlineNode::ContentControl(sdt) => Some(sdt),
            _ => None,
        }
    }

    pub fn as_content_control_mut(&mut self) -> Option<&mut InlineContentControl> {
        match self {
            InlineNode::ContentControl(sdt) => Some(sdt),
            _ => None,
        }
    }
}

impl Node for InlineNode {
    fn element(&self) -> ElementId {
        match self {
            InlineNode::Text(run) => run.element(),
            InlineNode::Hyperlink(run) => run.element(),
            InlineNode::Field(run) => run.element(),
            InlineNode::ContentControl(sdt) => sdt.element(),
        }
    }

    fn kind(&self) -> NodeKind {
        match self {
            InlineNode::Text(run) => run.kind(),
            InlineNode::Hyperlink(run) => run.kind(),
            InlineNode::Field(run) => run.kind(),
            InlineNode::ContentControl(sdt) => sdt.kind(),
        }
    }
}

impl Categorized for InlineNode {
    type Category = InlineCategory;

    fn category(&self) -> InlineCategory {
        InlineNode::category(self)
    }
}

// =============================================================================
// Run Container
// =============================================================================

/// Ordered inline content of a paragraph or inline content control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunContainer {
    element: ElementId,
    owner: ContainerOwner,
    unified: Vec<InlineNode>,
}

impl RunContainer {
    /// Mirror the inline children of an existing element in one pass
    pub fn load(tree: &dyn BackingTree, element: ElementId, owner: ContainerOwner) -> Self {
        let unified = classify::walk(tree, element, ContentFamily::Inline)
            .iter()
            .filter_map(|found| InlineNode::from_classified(tree, found))
            .collect();
        Self {
            element,
            owner,
            unified,
        }
    }

    pub fn new_empty(element: ElementId, owner: ContainerOwner) -> Self {
        Self {
            element,
            owner,
            unified: Vec::new(),
        }
    }

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

    pub fn nodes(&self) -> &[InlineNode] {
        &self.unified
    }

    pub fn iter(&self) -> impl Iterator<Item = &InlineNode> {
        self.unified.iter()
    }

    pub fn get(&self, index: usize) -> Option<&InlineNode> {
        self.unified.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut InlineNode> {
        self.unified.get_mut(index)
    }

    // -------------------------------------------------------------------------
    // Typed views
    // -------------------------------------------------------------------------

    /// Text, hyperlink and field runs in document order
    pub fn runs(&self) -> Vec<&InlineNode> {
        position::typed_view(&self.unified, InlineCategory::Run).collect()
    }

    pub fn run(&self, index: usize) -> Option<&InlineNode> {
        position::unified_index(&self.unified, InlineCategory::Run, index).map(|i| &self.unified[i])
    }

    pub fn run_count(&self) -> usize {
        position::typed_len(&self.unified, InlineCategory::Run)
    }

    /// Inline content controls in document order
    pub fn sdt_runs(&self) -> Vec<&InlineContentControl> {
        self.unified
            .iter()
            .filter_map(InlineNode::as_content_control)
            .collect()
    }

    pub fn sdt_run(&self, index: usize) -> Option<&InlineContentControl> {
        position::unified_index(&self.unified, InlineCategory::ContentControl, index)
            .and_then(|i| self.unified[i].as_content_control())
    }

    pub fn sdt_run_mut(&mut self, index: usize) -> Option<&mut InlineContentControl> {
        let unified = position::unified_index(&self.unified, InlineCategory::ContentControl, index)?;
        self.unified[unified].as_content_control_mut()
    }

    /// Run index of the node at a unified index, if it is a run
    pub fn run_pos(&self, index: usize) -> Option<usize> {
        self.typed_pos(InlineCategory::Run, index)
    }

    pub fn sdt_run_pos(&self, index: usize) -> Option<usize> {
        self.typed_pos(InlineCategory::ContentControl, index)
    }

    fn typed_pos(&self, category: InlineCategory, index: usize) -> Option<usize> {
        match position::typed_index(&self.unified, index)? {
            (found, typed) if found == category => Some(typed),
            _ => None,
        }
    }

    /// Unified and typed index of the node mirroring `element`
    pub fn position_of(&self, element: ElementId) -> Option<Position> {
        let unified = self.unified.iter().position(|n| n.element() == element)?;
        let (_, typed) = position::typed_index(&self.unified, unified)?;
        Some(Position { unified, typed })
    }

    pub fn unified_index(&self, category: InlineCategory, typed: usize) -> Option<usize> {
        position::unified_index(&self.unified, category, typed)
    }

    // -------------------------------------------------------------------------
    // Creation
    // -------------------------------------------------------------------------

    /// Append a new node of `kind`; hyperlink and field runs get a wrapper of
    /// their own
    pub fn create(&mut self, session: &mut EditSession<'_>, kind: InlineKind) -> Result<&mut InlineNode> {
        let slot = session.tree().children(self.element).len();
        let node = splice(session, self.element, slot, &kind)?;
        let index = self.unified.len();
        self.unified.push(node);
        Ok(&mut self.unified[index])
    }

    pub fn create_run(&mut self, session: &mut EditSession<'_>) -> Result<&mut InlineNode> {
        self.create(session, InlineKind::Run)
    }

    pub fn create_hyperlink_run(&mut self, session: &mut EditSession<'_>, uri: &str) -> Result<&mut InlineNode> {
        self.create(session, InlineKind::Hyperlink(uri.to_string()))
    }

    pub fn create_field_run(&mut self, session: &mut EditSession<'_>) -> Result<&mut InlineNode> {
        self.create(session, InlineKind::Field)
    }

    pub fn create_sdt_run(&mut self, session: &mut EditSession<'_>) -> Result<&mut InlineContentControl> {
        self.create(session, InlineKind::ContentControl)?
            .as_content_control_mut()
            .ok_or_else(|| DocModelError::InvalidOperation("created node is not a content control".into()))
    }

    // -------------------------------------------------------------------------
    // Positional inserts
    // -------------------------------------------------------------------------

    /// Insert a new node of `kind` before the run at `position`.
    ///
    /// `position == run_count()` appends. A wrapped run is resolved up to the
    /// direct child of this container that holds it, and the new node goes
    /// in front of that child.
    pub fn insert(
        &mut self,
        session: &mut EditSession<'_>,
        position: usize,
        kind: InlineKind,
    ) -> Result<&mut InlineNode> {
        let runs = self.run_count();
        if position == runs {
            return self.create(session, kind);
        }
        let anchor = self
            .run(position)
            .map(|run| run.wrapper().unwrap_or_else(|| run.element()))
            .ok_or(DocModelError::IndexOutOfRange {
                index: position,
                len: runs,
            })?;
        let slot = self
            .direct_child_slot(session.tree(), anchor)
            .ok_or(DocModelError::InvalidCursorPosition {
                container: self.element,
            })?;

        let index = position::count_before(session.tree(), self.element, slot, ContentFamily::Inline);
        let node = splice(session, self.element, slot, &kind)?;
        self.unified.insert(index, node);
        Ok(&mut self.unified[index])
    }

    pub fn insert_run(&mut self, session: &mut EditSession<'_>, position: usize) -> Result<&mut InlineNode> {
        self.insert(session, position, InlineKind::Run)
    }

    pub fn insert_hyperlink_run(
        &mut self,
        session: &mut EditSession<'_>,
        position: usize,
        uri: &str,
    ) -> Result<&mut InlineNode> {
        self.insert(session, position, InlineKind::Hyperlink(uri.to_string()))
    }

    pub fn insert_field_run(&mut self, session: &mut EditSession<'_>, position: usize) -> Result<&mut InlineNode> {
        self.insert(session, position, InlineKind::Field)
    }

    pub fn insert_sdt_run(&mut self, session: &mut EditSession<'_>, position: usize) -> Result<&mut InlineNode> {
        self.insert(session, position, InlineKind::ContentControl)
    }

    /// Splice a new node of `kind` in at the cursor and advance the cursor
    /// past it.
    ///
    /// # Panics
    ///
    /// Panics if the cursor was taken from a different backing tree.
    pub fn insert_at(
        &mut self,
        session: &mut EditSession<'_>,
        cursor: &mut Cursor,
        kind: InlineKind,
    ) -> Result<&mut InlineNode> {
        if !session.tree().is_current(cursor) || !cursor.is_child_slot_of(self.element) {
            tracing::debug!(container = %self.element, ?kind, "rejected insert at foreign cursor slot");
            return Err(DocModelError::InvalidCursorPosition {
                container: self.element,
            });
        }

        let slot = cursor.slot();
        let index = position::count_before(session.tree(), self.element, slot, ContentFamily::Inline);
        let node = splice(session, self.element, slot, &kind)?;
        cursor.restamp(session.tree().generation(), slot + 1);
        self.unified.insert(index, node);
        Ok(&mut self.unified[index])
    }

    fn direct_child_slot(&self, tree: &dyn BackingTree, mut element: ElementId) -> Option<usize> {
        loop {
            let parent = tree.parent(element)?;
            if parent == self.element {
                return tree.index_in_parent(element);
            }
            element = parent;
        }
    }

    // -------------------------------------------------------------------------
    // Copying
    // -------------------------------------------------------------------------

    /// Append a copy of `node`, which must live in the session's tree.
    ///
    /// A wrapped run is copied into a fresh wrapper carrying the source
    /// wrapper's attributes; the copy never shares the original wrapper.
    pub fn clone_node(&mut self, session: &mut EditSession<'_>, node: &InlineNode) -> Result<&mut InlineNode> {
        let snapshot = capture(session.tree(), node).ok_or(DocModelError::NodeNotFound(node.element()))?;
        let top = snapshot
            .materialize(session.tree_mut(), self.element)
            .ok_or(DocModelError::NodeNotFound(self.element))?;
        self.push_classified(session.tree(), top)
    }

    /// Append a copy of a node from another document, re-registering any
    /// hyperlink target with this session's resolver
    pub fn import_node(
        &mut self,
        session: &mut EditSession<'_>,
        source: ContentSource<'_>,
        node: &InlineNode,
    ) -> Result<&mut InlineNode> {
        let snapshot = capture(source.tree, node).ok_or(DocModelError::NodeNotFound(node.element()))?;
        let top = snapshot
            .materialize(session.tree_mut(), self.element)
            .ok_or(DocModelError::NodeNotFound(self.element))?;
        session.relink_imported(source.links, top);
        self.push_classified(session.tree(), top)
    }

    fn push_classified(&mut self, tree: &dyn BackingTree, element: ElementId) -> Result<&mut InlineNode> {
        let found = classify::classify_element(tree, element, ContentFamily::Inline);
        let start = self.unified.len();
        self.unified.extend(
            found
                .iter()
                .filter_map(|f| InlineNode::from_classified(tree, f)),
        );
        if self.unified.len() == start {
            return Err(DocModelError::InvalidOperation(
                "copied element holds no inline content".into(),
            ));
        }
        Ok(&mut self.unified[start])
    }

    // -------------------------------------------------------------------------
    // Removal
    // -------------------------------------------------------------------------

    /// Remove the run at `index` of the runs view.
    ///
    /// The run's wrapper is deleted along with it only when no other run
    /// still references that wrapper.
    pub fn remove_run(&mut self, session: &mut EditSession<'_>, index: usize) -> bool {
        let Some(unified) = position::unified_index(&self.unified, InlineCategory::Run, index) else {
            return false;
        };
        let node = self.unified.remove(unified);
        let tree = session.tree_mut();
        match node.wrapper() {
            Some(wrapper) if self.unified.iter().any(|n| n.wrapper() == Some(wrapper)) => {
                tracing::trace!(wrapper = %wrapper, run = %node.element(), "wrapper still referenced, removing run only");
                tree.remove_subtree(node.element());
            }
            Some(wrapper) => {
                tree.remove_subtree(wrapper);
            }
            None => {
                tree.remove_subtree(node.element());
            }
        }
        true
    }

    /// Remove the content control at `index` of the sdt runs view
    pub fn remove_sdt_run(&mut self, session: &mut EditSession<'_>, index: usize) -> bool {
        let Some(unified) = position::unified_index(&self.unified, InlineCategory::ContentControl, index)
        else {
            return false;
        };
        let node = self.unified.remove(unified);
        session.tree_mut().remove_subtree(node.element());
        true
    }

    /// Replace the content control at `index` of the sdt runs view with a
    /// deep copy of `source`, which must live in the session's tree.
    ///
    /// Returns false, changing nothing, if the index is out of range.
    pub fn set_sdt_run(&mut self, session: &mut EditSession<'_>, index: usize, source: &InlineContentControl) -> bool {
        let Some(unified) = position::unified_index(&self.unified, InlineCategory::ContentControl, index)
        else {
            return false;
        };
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
        self.unified[unified] = InlineNode::ContentControl(InlineContentControl::load(&*tree, copy));
        tracing::trace!(container = %self.element, index, replaced = %old, "replaced inline content control");
        true
    }

    /// Remove whatever node sits at a unified index
    pub fn remove(&mut self, session: &mut EditSession<'_>, index: usize) -> bool {
        match position::typed_index(&self.unified, index) {
            Some((InlineCategory::Run, typed)) => self.remove_run(session, typed),
            Some((InlineCategory::ContentControl, typed)) => self.remove_sdt_run(session, typed),
            None => false,
        }
    }

    // -------------------------------------------------------------------------
    // Text and consistency
    // -------------------------------------------------------------------------

    /// Runs are concatenated; a content control's text is followed by a line
    /// break unless it is the last entry.
    pub fn text(&self, tree: &dyn BackingTree) -> String {
        let mut out = String::new();
        let last = self.unified.len().saturating_sub(1);
        for (i, node) in self.unified.iter().enumerate() {
            out.push_str(&node.text(tree));
            if node.category() == InlineCategory::ContentControl && i < last {
                out.push('\n');
            }
        }
        out
    }

    /// Check that the node list matches a fresh walk of the backing children
    pub fn matches_backing(&self, tree: &dyn BackingTree) -> bool {
        let walked = classify::walk(tree, self.element, ContentFamily::Inline);
        walked.len() == self.unified.len()
            && walked
                .iter()
                .zip(&self.unified)
                .all(|(c, n)| c.element == n.element() && c.kind == n.kind() && c.wrapper == n.wrapper())
    }
}

/// Create the backing elements for `kind` at a child slot of `parent`
fn splice(session: &mut EditSession<'_>, parent: ElementId, slot: usize, kind: &InlineKind) -> Result<InlineNode> {
    let missing = || DocModelError::NodeNotFound(parent);
    let node = match kind {
        InlineKind::Run => {
            let run = session
                .tree_mut()
                .insert_child(parent, slot, markup::RUN)
                .ok_or_else(missing)?;
            InlineNode::Text(TextRun::new(run))
        }
        InlineKind::Hyperlink(uri) => {
            let (wrapper, run) = splice_wrapper(session, parent, slot, markup::HYPERLINK).ok_or_else(missing)?;
            let id = session.links.register_external_link(uri);
            session.tree_mut().set_attribute(wrapper, markup::RELATIONSHIP_ID, &id);
            InlineNode::Hyperlink(HyperlinkRun::new(run, wrapper))
        }
        InlineKind::Field => {
            let (wrapper, run) = splice_wrapper(session, parent, slot, markup::SIMPLE_FIELD).ok_or_else(missing)?;
            InlineNode::Field(FieldRun::new(run, wrapper))
        }
        InlineKind::ContentControl => {
            let sdt = session
                .tree_mut()
                .insert_child(parent, slot, markup::SDT)
                .ok_or_else(missing)?;
            InlineNode::ContentControl(InlineContentControl::unbound(sdt))
        }
    };
    Ok(node)
}

fn splice_wrapper(
    session: &mut EditSession<'_>,
    parent: ElementId,
    slot: usize,
    name: &str,
) -> Option<(ElementId, ElementId)> {
    let tree = session.tree_mut();
    let wrapper = tree.insert_child(parent, slot, name)?;
    let run = tree.append_element(wrapper, markup::RUN)?;
    Some((wrapper, run))
}

/// Snapshot a node for copying; wrapped runs are captured inside a copy of
/// their wrapper that holds only this run
fn capture(tree: &dyn BackingTree, node: &InlineNode) -> Option<ElementSnapshot> {
    let snapshot = ElementSnapshot::capture(tree, node.element())?;
    match node.wrapper() {
        None => Some(snapshot),
        Some(wrapper) => Some(ElementSnapshot {
            name: tree.name(wrapper)?.to_string(),
            attributes: tree.attributes(wrapper).to_vec(),
            text: None,
            children: vec![snapshot],
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ContentSettings, RelationshipResolver, RelationshipTable};
    use markup_tree::{xml, ElementTree};

    struct Fixture {
        tree: ElementTree,
        links: RelationshipTable,
        settings: ContentSettings,
    }

    impl Fixture {
        fn new(markup: &str) -> Self {
            Self {
                tree: xml::parse(markup).unwrap(),
                links: RelationshipTable::new(),
                settings: ContentSettings::default(),
            }
        }

        fn session(&mut self) -> EditSession<'_> {
            EditSession::new(&mut self.tree, &mut self.links, &self.settings)
        }

        fn paragraph(&self) -> RunContainer {
            let root = self.tree.root();
            RunContainer::load(&self.tree, root, ContainerOwner::Paragraph(root))
        }
    }

    fn kinds(container: &RunContainer) -> Vec<NodeKind> {
        container.iter().map(Node::kind).collect()
    }

    // -------------------------------------------------------------------------
    // Loading
    // -------------------------------------------------------------------------

    #[test]
    fn test_load_flattens_wrappers() {
        let fx = Fixture::new(concat!(
            "<w:p><w:pPr/><w:r><w:t>a</w:t></w:r>",
            "<w:ins><w:smartTag><w:r><w:t>b</w:t></w:r></w:smartTag></w:ins>",
            "<w:hyperlink r:id=\"rId4\"><w:r><w:t>c</w:t></w:r><w:r><w:t>d</w:t></w:r></w:hyperlink>",
            "<w:sdt><w:sdtContent><w:r><w:t>e</w:t></w:r></w:sdtContent></w:sdt>",
            "<w:fldSimple w:instr=\"PAGE\"><w:r><w:t>1</w:t></w:r></w:fldSimple></w:p>"
        ));
        let p = fx.paragraph();
        assert_eq!(
            kinds(&p),
            vec![
                NodeKind::TextRun,
                NodeKind::TextRun,
                NodeKind::HyperlinkRun,
                NodeKind::HyperlinkRun,
                NodeKind::InlineContentControl,
                NodeKind::FieldRun,
            ]
        );
        assert_eq!(p.run_count(), 5);
        assert_eq!(p.sdt_runs().len(), 1);
        assert_eq!(p.get(2).unwrap().wrapper(), p.get(3).unwrap().wrapper());
        assert_eq!(p.text(&fx.tree), "abcde\n1");
        assert!(p.matches_backing(&fx.tree));
    }

    // -------------------------------------------------------------------------
    // Creation and inserts
    // -------------------------------------------------------------------------

    #[test]
    fn test_create_hyperlink_run_registers_relationship() {
        let mut fx = Fixture::new("<w:p/>");
        let mut p = fx.paragraph();
        let node = p
            .create_hyperlink_run(&mut fx.session(), "https://example.com")
            .unwrap()
            .clone();
        let run = node.as_hyperlink_run().unwrap();

        assert_eq!(run.relationship_id(&fx.tree), Some("rId1"));
        assert_eq!(run.target(&fx.tree, &fx.links), Some("https://example.com"));
        assert_eq!(fx.tree.parent(run.element()), Some(run.wrapper()));
        assert!(p.matches_backing(&fx.tree));
    }

    #[test]
    fn test_each_created_wrapper_is_unshared() {
        let mut fx = Fixture::new("<w:p/>");
        let mut p = fx.paragraph();
        let mut session = fx.session();
        p.create_field_run(&mut session).unwrap();
        p.create_field_run(&mut session).unwrap();
        drop(session);

        assert_ne!(p.get(0).unwrap().wrapper(), p.get(1).unwrap().wrapper());
        assert_eq!(fx.tree.children(fx.tree.root()).len(), 2);
    }

    #[test]
    fn test_insert_before_wrapped_run_goes_before_wrapper() {
        let mut fx = Fixture::new(concat!(
            "<w:p><w:r><w:t>a</w:t></w:r>",
            "<w:hyperlink><w:r><w:t>b</w:t></w:r><w:r><w:t>c</w:t></w:r></w:hyperlink></w:p>"
        ));
        let mut p = fx.paragraph();
        let element = p.insert_run(&mut fx.session(), 2).unwrap().element();

        // The run lands in front of the whole hyperlink
        assert_eq!(p.position_of(element), Some(Position { unified: 1, typed: 1 }));
        assert_eq!(fx.tree.index_in_parent(element), Some(1));
        assert!(p.matches_backing(&fx.tree));
    }

    #[test]
    fn test_insert_inside_transparent_wrapper_resolves_to_direct_child() {
        let mut fx = Fixture::new("<w:p><w:ins><w:r/><w:r/></w:ins></w:p>");
        let mut p = fx.paragraph();
        let element = p.insert_sdt_run(&mut fx.session(), 1).unwrap().element();

        assert_eq!(fx.tree.parent(element), Some(fx.tree.root()));
        assert_eq!(p.position_of(element).unwrap().unified, 0);
        assert!(p.matches_backing(&fx.tree));
    }

    #[test]
    fn test_insert_past_end_is_rejected() {
        let mut fx = Fixture::new("<w:p><w:r/></w:p>");
        let mut p = fx.paragraph();
        let result = p.insert_run(&mut fx.session(), 5);
        assert!(matches!(result, Err(DocModelError::IndexOutOfRange { index: 5, len: 1 })));
        assert_eq!(p.len(), 1);
    }

    #[test]
    fn test_insert_at_cursor_between_runs() {
        let mut fx = Fixture::new("<w:p><w:r><w:t>a</w:t></w:r><w:r><w:t>b</w:t></w:r></w:p>");
        let mut p = fx.paragraph();
        let second = p.get(1).unwrap().element();
        let mut cursor = fx.tree.cursor_before(second).unwrap();

        let mut session = fx.session();
        p.insert_at(&mut session, &mut cursor, InlineKind::Hyperlink("https://x.test".into()))
            .unwrap();
        p.insert_at(&mut session, &mut cursor, InlineKind::ContentControl)
            .unwrap();
        drop(session);

        assert_eq!(
            kinds(&p),
            vec![
                NodeKind::TextRun,
                NodeKind::HyperlinkRun,
                NodeKind::InlineContentControl,
                NodeKind::TextRun,
            ]
        );
        assert_eq!(cursor.current(&fx.tree), Some(second));
        assert!(p.matches_backing(&fx.tree));
    }

    // -------------------------------------------------------------------------
    // Removal
    // -------------------------------------------------------------------------

    #[test]
    fn test_remove_run_keeps_shared_wrapper() {
        let mut fx = Fixture::new(
            "<w:p><w:hyperlink r:id=\"rId1\"><w:r><w:t>a</w:t></w:r><w:r><w:t>b</w:t></w:r></w:hyperlink></w:p>",
        );
        let mut p = fx.paragraph();
        let wrapper = p.get(0).unwrap().wrapper().unwrap();

        assert!(p.remove_run(&mut fx.session(), 0));
        assert!(fx.tree.contains(wrapper));
        assert_eq!(p.text(&fx.tree), "b");

        assert!(p.remove_run(&mut fx.session(), 0));
        assert!(!fx.tree.contains(wrapper));
        assert!(p.is_empty());
        assert!(fx.tree.children(fx.tree.root()).is_empty());
    }

    #[test]
    fn test_remove_dispatches_by_category() {
        let mut fx = Fixture::new("<w:p><w:r/><w:sdt/><w:r/></w:p>");
        let mut p = fx.paragraph();
        assert!(p.remove(&mut fx.session(), 1));
        assert!(p.sdt_runs().is_empty());
        assert!(!p.remove(&mut fx.session(), 2));
        assert!(!p.remove_sdt_run(&mut fx.session(), 0));
        assert_eq!(p.run_count(), 2);
        assert!(p.matches_backing(&fx.tree));
    }

    // -------------------------------------------------------------------------
    // Copying
    // -------------------------------------------------------------------------

    #[test]
    fn test_clone_wrapped_run_gets_fresh_wrapper() {
        let mut fx = Fixture::new(
            "<w:p><w:hyperlink r:id=\"rId7\"><w:r><w:t>a</w:t></w:r><w:r><w:t>b</w:t></w:r></w:hyperlink></w:p>",
        );
        let mut p = fx.paragraph();
        let source = p.get(1).unwrap().clone();
        let copy = p.clone_node(&mut fx.session(), &source).unwrap().clone();

        assert_ne!(copy.wrapper(), source.wrapper());
        assert_eq!(copy.text(&fx.tree), "b");
        let run = copy.as_hyperlink_run().unwrap();
        assert_eq!(run.relationship_id(&fx.tree), Some("rId7"));
        assert_eq!(fx.tree.children(run.wrapper()).len(), 1);
        assert!(p.matches_backing(&fx.tree));
    }

    #[test]
    fn test_import_relinks_hyperlink() {
        let mut source_links = RelationshipTable::new();
        source_links.register_external_link("https://skip.test");
        let rid = source_links.register_external_link("https://source.test");
        let source_tree =
            xml::parse(&format!(r#"<w:p><w:hyperlink r:id="{rid}"><w:r><w:t>go</w:t></w:r></w:hyperlink></w:p>"#))
                .unwrap();
        let source = RunContainer::load(
            &source_tree,
            source_tree.root(),
            ContainerOwner::Paragraph(source_tree.root()),
        );

        let mut fx = Fixture::new("<w:p/>");
        let mut p = fx.paragraph();
        let imported = p
            .import_node(
                &mut fx.session(),
                ContentSource::new(&source_tree, &source_links),
                source.get(0).unwrap(),
            )
            .unwrap()
            .clone();

        let run = imported.as_hyperlink_run().unwrap();
        assert_eq!(run.relationship_id(&fx.tree), Some("rId1"));
        assert_eq!(run.target(&fx.tree, &fx.links), Some("https://source.test"));
        assert_eq!(imported.text(&fx.tree), "go");
    }

    #[test]
    fn test_set_sdt_run_keeps_position() {
        let mut fx = Fixture::new(concat!(
            "<w:p><w:sdt><w:sdtPr><w:tag w:val=\"first\"/></w:sdtPr>",
            "<w:sdtContent><w:r><w:t>a</w:t></w:r></w:sdtContent></w:sdt>",
            "<w:r><w:t>b</w:t></w:r>",
            "<w:ins><w:sdt><w:sdtPr><w:tag w:val=\"second\"/></w:sdtPr>",
            "<w:sdtContent><w:r><w:t>c</w:t></w:r></w:sdtContent></w:sdt></w:ins></w:p>"
        ));
        let mut p = fx.paragraph();
        let wrapped = p.sdt_run(1).unwrap().element();
        let source = p.sdt_run(0).unwrap().clone();
        assert!(p.set_sdt_run(&mut fx.session(), 1, &source));
        assert!(!p.set_sdt_run(&mut fx.session(), 2, &source));

        assert!(!fx.tree.contains(wrapped));
        let replaced = p.sdt_run(1).unwrap();
        assert_eq!(replaced.properties().unwrap().tag(&fx.tree), Some("first"));
        assert_eq!(p.position_of(replaced.element()), Some(Position { unified: 2, typed: 1 }));
        assert_eq!(fx.tree.name(fx.tree.parent(replaced.element()).unwrap()), Some("w:ins"));
        assert_eq!(p.text(&fx.tree), "a\nba");
        assert!(p.matches_backing(&fx.tree));
    }
}
