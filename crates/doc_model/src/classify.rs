//! Node Classifier
//!
//! Maps backing elements to node kinds and walks a container's direct
//! children in one pass. Hyperlink and field wrappers are unwrapped into one
//! node per contained run; tracked insertions, smart tags and custom XML
//! wrappers are transparent, so their children are classified as if they sat
//! directly in the container. Unknown elements are skipped.

use crate::markup;
use crate::NodeKind;
use markup_tree::{BackingTree, ElementId};
use serde::{Deserialize, Serialize};

/// Which family of container is being classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentFamily {
    Block,
    Inline,
}

/// Wrappers whose runs share the wrapper's identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WrapperKind {
    Hyperlink,
    Field,
}

impl WrapperKind {
    /// Node kind given to each run inside this wrapper
    pub fn run_kind(&self) -> NodeKind {
        match self {
            WrapperKind::Hyperlink => NodeKind::HyperlinkRun,
            WrapperKind::Field => NodeKind::FieldRun,
        }
    }

    /// Element name of the wrapper
    pub fn element_name(&self) -> &'static str {
        match self {
            WrapperKind::Hyperlink => markup::HYPERLINK,
            WrapperKind::Field => markup::SIMPLE_FIELD,
        }
    }
}

/// Wrappers that vanish during flattening
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransparentKind {
    Insertion,
    SmartTag,
    CustomXml,
}

/// Outcome of classifying a single element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The element is a node of this kind
    Node(NodeKind),
    /// Each run child becomes a node sharing this wrapper
    Unwrap(WrapperKind),
    /// Children are classified in place of the element
    Transparent(TransparentKind),
    /// Not content this container tracks
    Skip,
}

/// Classify an element by name within a container family
pub fn classify(name: &str, family: ContentFamily) -> Classification {
    match family {
        ContentFamily::Block => match name {
            markup::PARAGRAPH => Classification::Node(NodeKind::Paragraph),
            markup::TABLE => Classification::Node(NodeKind::Table),
            markup::SDT => Classification::Node(NodeKind::BlockContentControl),
            _ => Classification::Skip,
        },
        ContentFamily::Inline => match name {
            markup::RUN => Classification::Node(NodeKind::TextRun),
            markup::SDT => Classification::Node(NodeKind::InlineContentControl),
            markup::HYPERLINK => Classification::Unwrap(WrapperKind::Hyperlink),
            markup::SIMPLE_FIELD => Classification::Unwrap(WrapperKind::Field),
            markup::INSERTION => Classification::Transparent(TransparentKind::Insertion),
            markup::SMART_TAG => Classification::Transparent(TransparentKind::SmartTag),
            markup::CUSTOM_XML => Classification::Transparent(TransparentKind::CustomXml),
            _ => Classification::Skip,
        },
    }
}

/// One node found by a classification walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifiedElement {
    pub kind: NodeKind,
    pub element: ElementId,
    /// Shared hyperlink or field wrapper, for wrapped runs
    pub wrapper: Option<ElementId>,
}

/// Classify every direct child of `parent`, in document order
pub fn walk(tree: &dyn BackingTree, parent: ElementId, family: ContentFamily) -> Vec<ClassifiedElement> {
    let mut out = Vec::new();
    for &child in tree.children(parent) {
        classify_into(tree, child, family, &mut out);
    }
    out
}

/// Classify a single element as if it were a direct child of a container
pub fn classify_element(
    tree: &dyn BackingTree,
    element: ElementId,
    family: ContentFamily,
) -> Vec<ClassifiedElement> {
    let mut out = Vec::new();
    classify_into(tree, element, family, &mut out);
    out
}

/// Number of nodes a single sibling contributes to its container
pub fn contribution(tree: &dyn BackingTree, element: ElementId, family: ContentFamily) -> usize {
    classify_element(tree, element, family).len()
}

fn classify_into(
    tree: &dyn BackingTree,
    element: ElementId,
    family: ContentFamily,
    out: &mut Vec<ClassifiedElement>,
) {
    let Some(name) = tree.name(element) else {
        return;
    };

    match classify(name, family) {
        Classification::Node(kind) => out.push(ClassifiedElement {
            kind,
            element,
            wrapper: None,
        }),
        Classification::Unwrap(wrapper) => {
            for &child in tree.children(element) {
                if tree.name(child) == Some(markup::RUN) {
                    out.push(ClassifiedElement {
                        kind: wrapper.run_kind(),
                        element: child,
                        wrapper: Some(element),
                    });
                }
            }
        }
        Classification::Transparent(_) => {
            for &child in tree.children(element) {
                classify_into(tree, child, family, out);
            }
        }
        Classification::Skip => {
            tracing::debug!(element = %element, name, ?family, "skipping unclassified element");
        }
    }
}
