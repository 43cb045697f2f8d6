//! Core node trait and types

use markup_tree::ElementId;
use serde::{Deserialize, Serialize};

/// Enumeration of all node kinds a content container can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Paragraph,
    Table,
    BlockContentControl,
    TextRun,
    HyperlinkRun,
    FieldRun,
    InlineContentControl,
}

impl NodeKind {
    /// Check if this kind lives in block containers
    pub fn is_block(&self) -> bool {
        matches!(
            self,
            NodeKind::Paragraph | NodeKind::Table | NodeKind::BlockContentControl
        )
    }

    /// Check if this kind is one of the run kinds (text, hyperlink, field)
    pub fn is_run(&self) -> bool {
        matches!(
            self,
            NodeKind::TextRun | NodeKind::HyperlinkRun | NodeKind::FieldRun
        )
    }

    /// Check if this kind owns a nested container
    pub fn is_content_control(&self) -> bool {
        matches!(
            self,
            NodeKind::BlockContentControl | NodeKind::InlineContentControl
        )
    }
}

/// Common interface for all container nodes
pub trait Node: std::fmt::Debug {
    /// The backing element this node mirrors. Also the node's identity.
    fn element(&self) -> ElementId;

    /// The kind of this node
    fn kind(&self) -> NodeKind;
}

/// The context that owns a container.
///
/// Containers keep this as a plain tag naming the element they belong to,
/// never as a reference to the owning node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerOwner {
    /// The document body
    Body,
    /// A comment, by its `w:comment` element
    Comment(ElementId),
    /// A text box, by its `w:txbxContent` element
    TextBox(ElementId),
    /// A table cell, by its `w:tc` element
    TableCell(ElementId),
    /// A paragraph's inline content
    Paragraph(ElementId),
    /// The content of a block-level content control
    BlockContentControl(ElementId),
    /// The content of an inline content control
    InlineContentControl(ElementId),
}
