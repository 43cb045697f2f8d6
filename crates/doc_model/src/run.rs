//! Run nodes - text runs and runs held by hyperlink or field wrappers
//!
//! A run's text lives in the backing tree: `w:t` children carry characters,
//! `w:tab` reads as a tab and `w:br` / `w:cr` as a line break. Run formatting
//! (`w:rPr`) is left untouched by every operation here.

use crate::markup;
use crate::relationship::RelationshipResolver;
use crate::{Node, NodeKind};
use markup_tree::{BackingTree, ElementId};
use serde::{Deserialize, Serialize};

// =============================================================================
// Run text
// =============================================================================

/// Extract the text of a `w:r` element
pub fn run_text(tree: &dyn BackingTree, run: ElementId) -> String {
    let mut out = String::new();
    for &child in tree.children(run) {
        match tree.name(child) {
            Some(markup::TEXT) => out.push_str(tree.text(child).unwrap_or("")),
            Some(markup::TAB) => out.push('\t'),
            Some(markup::BREAK) | Some(markup::CARRIAGE_RETURN) => out.push('\n'),
            _ => {}
        }
    }
    out
}

/// Replace the text content of a `w:r` element
pub fn set_run_text(tree: &mut dyn BackingTree, run: ElementId, text: &str) {
    let content: Vec<ElementId> = tree
        .children(run)
        .iter()
        .copied()
        .filter(|&c| {
            matches!(
                tree.name(c),
                Some(markup::TEXT | markup::TAB | markup::BREAK | markup::CARRIAGE_RETURN)
            )
        })
        .collect();
    for child in content {
        tree.remove_subtree(child);
    }

    let mut segment = String::new();
    for ch in text.chars() {
        match ch {
            '\t' | '\n' => {
                append_text(tree, run, &segment);
                segment.clear();
                let name = if ch == '\t' { markup::TAB } else { markup::BREAK };
                tree.append_element(run, name);
            }
            _ => segment.push(ch),
        }
    }
    append_text(tree, run, &segment);
}

fn append_text(tree: &mut dyn BackingTree, run: ElementId, text: &str) {
    if text.is_empty() {
        return;
    }
    let Some(t) = tree.append_element(run, markup::TEXT) else {
        return;
    };
    // Leading or trailing spaces are dropped on save unless preserved
    if text.starts_with(char::is_whitespace) || text.ends_with(char::is_whitespace) {
        tree.set_attribute(t, markup::XML_SPACE, "preserve");
    }
    tree.set_text(t, Some(text));
}

// =============================================================================
// Run nodes
// =============================================================================

/// A plain run sitting directly in its container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    element: ElementId,
}

impl TextRun {
    pub(crate) fn new(element: ElementId) -> Self {
        Self { element }
    }

    pub fn text(&self, tree: &dyn BackingTree) -> String {
        run_text(tree, self.element)
    }

    pub fn set_text(&self, tree: &mut dyn BackingTree, text: &str) {
        set_run_text(tree, self.element, text)
    }
}

impl Node for TextRun {
    fn element(&self) -> ElementId {
        self.element
    }

    fn kind(&self) -> NodeKind {
        NodeKind::TextRun
    }
}

/// A run inside a `w:hyperlink` wrapper.
///
/// Several runs can share one wrapper; the wrapper carries the relationship
/// id of the link target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HyperlinkRun {
    element: ElementId,
    wrapper: ElementId,
}

impl HyperlinkRun {
    pub(crate) fn new(element: ElementId, wrapper: ElementId) -> Self {
        Self { element, wrapper }
    }

    /// The shared `w:hyperlink` element
    pub fn wrapper(&self) -> ElementId {
        self.wrapper
    }

    pub fn text(&self, tree: &dyn BackingTree) -> String {
        run_text(tree, self.element)
    }

    pub fn set_text(&self, tree: &mut dyn BackingTree, text: &str) {
        set_run_text(tree, self.element, text)
    }

    /// Relationship id stored on the wrapper
    pub fn relationship_id<'t>(&self, tree: &'t dyn BackingTree) -> Option<&'t str> {
        tree.attribute(self.wrapper, markup::RELATIONSHIP_ID)
    }

    /// Resolve the link target through the relationship table
    pub fn target<'r>(&self, tree: &dyn BackingTree, links: &'r dyn RelationshipResolver) -> Option<&'r str> {
        self.relationship_id(tree).and_then(|id| links.target(id))
    }
}

impl Node for HyperlinkRun {
    fn element(&self) -> ElementId {
        self.element
    }

    fn kind(&self) -> NodeKind {
        NodeKind::HyperlinkRun
    }
}

/// A run inside a `w:fldSimple` wrapper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRun {
    element: ElementId,
    wrapper: ElementId,
}

impl FieldRun {
    pub(crate) fn new(element: ElementId, wrapper: ElementId) -> Self {
        Self { element, wrapper }
    }

    /// The shared `w:fldSimple` element
    pub fn wrapper(&self) -> ElementId {
        self.wrapper
    }

    pub fn text(&self, tree: &dyn BackingTree) -> String {
        run_text(tree, self.element)
    }

    pub fn set_text(&self, tree: &mut dyn BackingTree, text: &str) {
        set_run_text(tree, self.element, text)
    }

    /// Field instruction, e.g. `PAGE`
    pub fn instruction<'t>(&self, tree: &'t dyn BackingTree) -> Option<&'t str> {
        tree.attribute(self.wrapper, markup::INSTRUCTION)
    }

    pub fn set_instruction(&self, tree: &mut dyn BackingTree, instruction: &str) {
        tree.set_attribute(self.wrapper, markup::INSTRUCTION, instruction);
    }
}

impl Node for FieldRun {
    fn element(&self) -> ElementId {
        self.element
    }

    fn kind(&self) -> NodeKind {
        NodeKind::FieldRun
    }
}
