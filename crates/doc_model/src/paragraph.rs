//! Paragraph node - a block holding inline content

use crate::{ContainerOwner, Node, NodeKind, RunContainer};
use markup_tree::{BackingTree, ElementId};
use serde::{Deserialize, Serialize};

/// A `w:p` element and the run container over its children
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    element: ElementId,
    content: RunContainer,
}

impl Paragraph {
    /// Mirror an existing paragraph element
    pub(crate) fn load(tree: &dyn BackingTree, element: ElementId) -> Self {
        Self {
            element,
            content: RunContainer::load(tree, element, ContainerOwner::Paragraph(element)),
        }
    }

    /// A paragraph over a freshly created, empty element
    pub(crate) fn empty(element: ElementId) -> Self {
        Self {
            element,
            content: RunContainer::new_empty(element, ContainerOwner::Paragraph(element)),
        }
    }

    /// Runs and inline content controls of this paragraph
    pub fn content(&self) -> &RunContainer {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut RunContainer {
        &mut self.content
    }

    /// Text of the paragraph's runs, concatenated without separators
    pub fn text(&self, tree: &dyn BackingTree) -> String {
        self.content
            .runs()
            .into_iter()
            .map(|run| run.text(tree))
            .collect()
    }
}

impl Node for Paragraph {
    fn element(&self) -> ElementId {
        self.element
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Paragraph
    }
}
