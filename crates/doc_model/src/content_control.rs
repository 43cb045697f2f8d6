//! Content Control Module - Structured Document Tags (SDT)
//!
//! A content control (`w:sdt`) is a placeholder node that owns one nested
//! container plus an optional properties record. Block-level controls nest a
//! [`BlockContainer`], inline controls nest a [`RunContainer`]; both share
//! [`ContentControl`] and differ only in the container type.
//!
//! ## States
//!
//! A freshly created control is unbound: it has neither `w:sdtPr` nor
//! `w:sdtContent`. Properties and content are attached independently and in
//! any order; attaching either one again replaces the previous element.

use crate::{
    markup, BlockContainer, ContainerOwner, DocModelError, EditSession, Node, NodeKind, Result,
    RunContainer,
};
use markup_tree::{BackingTree, ElementId};
use serde::{Deserialize, Serialize};

// =============================================================================
// Lock State
// =============================================================================

/// Editing lock of a content control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LockState {
    /// No locking
    Unlocked,
    /// Contents cannot be edited
    ContentLocked,
    /// The control cannot be deleted
    SdtLocked,
    /// Neither the control nor its contents can be changed
    SdtContentLocked,
}

impl LockState {
    /// Value of the `w:lock` element for this state
    pub fn ooxml_value(&self) -> &'static str {
        match self {
            LockState::Unlocked => "unlocked",
            LockState::ContentLocked => "contentLocked",
            LockState::SdtLocked => "sdtLocked",
            LockState::SdtContentLocked => "sdtContentLocked",
        }
    }

    /// Parse a `w:lock` value
    pub fn from_ooxml(value: &str) -> Option<Self> {
        match value {
            "unlocked" => Some(LockState::Unlocked),
            "contentLocked" => Some(LockState::ContentLocked),
            "sdtLocked" => Some(LockState::SdtLocked),
            "sdtContentLocked" => Some(LockState::SdtContentLocked),
            _ => None,
        }
    }

    /// Check if the control itself may be removed
    pub fn can_delete(&self) -> bool {
        matches!(self, LockState::Unlocked | LockState::ContentLocked)
    }

    /// Check if the control's contents may be edited
    pub fn can_edit_content(&self) -> bool {
        matches!(self, LockState::Unlocked | LockState::SdtLocked)
    }
}

// =============================================================================
// Properties
// =============================================================================

/// Handle to a `w:sdtPr` element.
///
/// Values are read from and written to the backing tree; an absent value is
/// distinct from an empty one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentControlProperties {
    element: ElementId,
}

impl ContentControlProperties {
    pub(crate) fn new(element: ElementId) -> Self {
        Self { element }
    }

    /// The `w:sdtPr` element
    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Tag used to identify the control programmatically
    pub fn tag<'t>(&self, tree: &'t dyn BackingTree) -> Option<&'t str> {
        self.value(tree, markup::TAG)
    }

    pub fn set_tag(&self, tree: &mut dyn BackingTree, tag: Option<&str>) -> bool {
        self.set_value(tree, markup::TAG, tag)
    }

    /// Friendly name shown to the user (`w:alias`)
    pub fn title<'t>(&self, tree: &'t dyn BackingTree) -> Option<&'t str> {
        self.value(tree, markup::ALIAS)
    }

    pub fn set_title(&self, tree: &mut dyn BackingTree, title: Option<&str>) -> bool {
        self.set_value(tree, markup::ALIAS, title)
    }

    /// Lock state; unknown values read as absent
    pub fn lock(&self, tree: &dyn BackingTree) -> Option<LockState> {
        self.value(tree, markup::LOCK).and_then(LockState::from_ooxml)
    }

    pub fn set_lock(&self, tree: &mut dyn BackingTree, lock: Option<LockState>) -> bool {
        self.set_value(tree, markup::LOCK, lock.map(|l| l.ooxml_value()))
    }

    fn value<'t>(&self, tree: &'t dyn BackingTree, name: &str) -> Option<&'t str> {
        let child = tree.first_child_named(self.element, name)?;
        tree.attribute(child, markup::VAL)
    }

    fn set_value(&self, tree: &mut dyn BackingTree, name: &str, value: Option<&str>) -> bool {
        if !tree.contains(self.element) {
            return false;
        }
        let existing = tree.first_child_named(self.element, name);
        match (existing, value) {
            (Some(child), Some(value)) => tree.set_attribute(child, markup::VAL, value),
            (None, Some(value)) => match tree.append_element(self.element, name) {
                Some(child) => tree.set_attribute(child, markup::VAL, value),
                None => false,
            },
            (Some(child), None) => tree.remove_subtree(child),
            (None, None) => true,
        }
    }
}

// =============================================================================
// Content Control Node
// =============================================================================

/// A container that can be nested inside a content control
pub trait SdtContent: Sized + std::fmt::Debug {
    /// Node kind of a control holding this container
    const CONTROL_KIND: NodeKind;

    /// Owner tag for the content of the control at `sdt`
    fn control_owner(sdt: ElementId) -> ContainerOwner;

    fn load(tree: &dyn BackingTree, element: ElementId, owner: ContainerOwner) -> Self;

    fn new_empty(element: ElementId, owner: ContainerOwner) -> Self;

    fn text(&self, tree: &dyn BackingTree) -> String;
}

impl SdtContent for BlockContainer {
    const CONTROL_KIND: NodeKind = NodeKind::BlockContentControl;

    fn control_owner(sdt: ElementId) -> ContainerOwner {
        ContainerOwner::BlockContentControl(sdt)
    }

    fn load(tree: &dyn BackingTree, element: ElementId, owner: ContainerOwner) -> Self {
        BlockContainer::load(tree, element, owner)
    }

    fn new_empty(element: ElementId, owner: ContainerOwner) -> Self {
        BlockContainer::new_empty(element, owner)
    }

    fn text(&self, tree: &dyn BackingTree) -> String {
        BlockContainer::text(self, tree)
    }
}

impl SdtContent for RunContainer {
    const CONTROL_KIND: NodeKind = NodeKind::InlineContentControl;

    fn control_owner(sdt: ElementId) -> ContainerOwner {
        ContainerOwner::InlineContentControl(sdt)
    }

    fn load(tree: &dyn BackingTree, element: ElementId, owner: ContainerOwner) -> Self {
        RunContainer::load(tree, element, owner)
    }

    fn new_empty(element: ElementId, owner: ContainerOwner) -> Self {
        RunContainer::new_empty(element, owner)
    }

    fn text(&self, tree: &dyn BackingTree) -> String {
        RunContainer::text(self, tree)
    }
}

/// A `w:sdt` element with its optional properties and nested content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentControl<C> {
    element: ElementId,
    properties: Option<ContentControlProperties>,
    content: Option<C>,
}

/// Content control between paragraphs and tables
pub type BlockContentControl = ContentControl<BlockContainer>;

/// Content control between runs
pub type InlineContentControl = ContentControl<RunContainer>;

impl<C: SdtContent> ContentControl<C> {
    /// Mirror an existing `w:sdt` element, binding whatever it already has
    pub(crate) fn load(tree: &dyn BackingTree, element: ElementId) -> Self {
        let properties = tree
            .first_child_named(element, markup::SDT_PROPERTIES)
            .map(ContentControlProperties::new);
        let content = tree
            .first_child_named(element, markup::SDT_CONTENT)
            .map(|c| C::load(tree, c, C::control_owner(element)));
        Self {
            element,
            properties,
            content,
        }
    }

    /// A control over a freshly created, empty `w:sdt`
    pub(crate) fn unbound(element: ElementId) -> Self {
        Self {
            element,
            properties: None,
            content: None,
        }
    }

    /// Properties record, if one has been attached
    pub fn properties(&self) -> Option<ContentControlProperties> {
        self.properties
    }

    /// Nested container, if content has been attached
    pub fn content(&self) -> Option<&C> {
        self.content.as_ref()
    }

    pub fn content_mut(&mut self) -> Option<&mut C> {
        self.content.as_mut()
    }

    /// Attach a fresh, empty properties record, replacing any existing one
    pub fn create_sdt_pr(&mut self, session: &mut EditSession<'_>) -> Result<ContentControlProperties> {
        let tree = session.tree_mut();
        if let Some(old) = tree.first_child_named(self.element, markup::SDT_PROPERTIES) {
            tree.remove_subtree(old);
            tracing::trace!(sdt = %self.element, "replacing content control properties");
        }
        let element = tree
            .insert_child(self.element, 0, markup::SDT_PROPERTIES)
            .ok_or(DocModelError::NodeNotFound(self.element))?;
        let properties = ContentControlProperties::new(element);
        self.properties = Some(properties);
        Ok(properties)
    }

    /// Attach a fresh, empty nested container, replacing any existing one
    pub fn create_sdt_content(&mut self, session: &mut EditSession<'_>) -> Result<&mut C> {
        let tree = session.tree_mut();
        if let Some(old) = tree.first_child_named(self.element, markup::SDT_CONTENT) {
            tree.remove_subtree(old);
            tracing::trace!(sdt = %self.element, "replacing content control content");
        }
        let element = tree
            .append_element(self.element, markup::SDT_CONTENT)
            .ok_or(DocModelError::NodeNotFound(self.element))?;
        let content = self
            .content
            .insert(C::new_empty(element, C::control_owner(self.element)));
        Ok(content)
    }

    /// Text of the nested container, empty when there is none
    pub fn text(&self, tree: &dyn BackingTree) -> String {
        self.content
            .as_ref()
            .map(|c| c.text(tree))
            .unwrap_or_default()
    }
}

impl<C: SdtContent> Node for ContentControl<C> {
    fn element(&self) -> ElementId {
        self.element
    }

    fn kind(&self) -> NodeKind {
        C::CONTROL_KIND
    }
}
