//! Document - the root of the content tree
//!
//! A document owns its backing tree (`w:document` holding `w:body` and
//! `w:comments`), the relationship table of its part and the content
//! settings, and mirrors the body and every comment in block containers.

use crate::{
    markup, BlockContainer, Comment, ContainerOwner, ContentSettings, ContentSource, DocModelError,
    EditSession, RelationshipTable, Result,
};
use chrono::Utc;
use markup_tree::{xml, BackingTree, ElementId, ElementTree};

/// The document root
#[derive(Debug, Clone)]
pub struct Document {
    tree: ElementTree,
    links: RelationshipTable,
    settings: ContentSettings,
    body: BlockContainer,
    comments_element: ElementId,
    comments: Vec<Comment>,
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        let mut tree = ElementTree::new(markup::DOCUMENT);
        let root = tree.root();
        let body = tree.push_element(root, markup::BODY);
        let comments_element = tree.push_element(root, markup::COMMENTS);
        Self {
            tree,
            links: RelationshipTable::new(),
            settings: ContentSettings::default(),
            body: BlockContainer::new_empty(body, ContainerOwner::Body),
            comments_element,
            comments: Vec::new(),
        }
    }

    /// Load a document from its markup.
    ///
    /// The root must be `w:document`. A missing body or comments element is
    /// created.
    pub fn from_xml(content: &str) -> Result<Self> {
        let mut tree = xml::parse(content)?;
        let root = tree.root();
        if tree.name(root) != Some(markup::DOCUMENT) {
            return Err(DocModelError::InvalidOperation(format!(
                "expected a {} root element",
                markup::DOCUMENT
            )));
        }
        let body = ensure_child(&mut tree, root, markup::BODY)?;
        let comments_element = ensure_child(&mut tree, root, markup::COMMENTS)?;

        let comments = tree
            .children(comments_element)
            .iter()
            .copied()
            .filter(|&c| tree.name(c) == Some(markup::COMMENT))
            .map(|c| Comment::load(&tree, c))
            .collect();
        let body = BlockContainer::load(&tree, body, ContainerOwner::Body);
        tracing::debug!(elements = tree.len(), blocks = body.len(), "loaded document");

        Ok(Self {
            tree,
            links: RelationshipTable::new(),
            settings: ContentSettings::default(),
            body,
            comments_element,
            comments,
        })
    }

    /// Serialize the backing tree
    pub fn to_xml(&self) -> String {
        xml::write(&self.tree)
    }

    pub fn with_settings(mut self, settings: ContentSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_relationships(mut self, links: RelationshipTable) -> Self {
        self.links = links;
        self
    }

    /// The backing tree
    pub fn tree(&self) -> &ElementTree {
        &self.tree
    }

    pub fn relationships(&self) -> &RelationshipTable {
        &self.links
    }

    pub fn settings(&self) -> &ContentSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: ContentSettings) {
        self.settings = settings;
    }

    /// Read access for copying content into another document
    pub fn source(&self) -> ContentSource<'_> {
        ContentSource::new(&self.tree, &self.links)
    }

    // =========================================================================
    // Body
    // =========================================================================

    pub fn body(&self) -> &BlockContainer {
        &self.body
    }

    /// The body container together with a session for editing it
    pub fn edit(&mut self) -> (&mut BlockContainer, EditSession<'_>) {
        (
            &mut self.body,
            EditSession::new(&mut self.tree, &mut self.links, &self.settings),
        )
    }

    /// Text of the body
    pub fn text(&self) -> String {
        self.body.text(&self.tree)
    }

    /// Block containers over every text box in the body
    pub fn text_boxes(&self) -> Vec<BlockContainer> {
        self.tree
            .descendants(self.body.element())
            .into_iter()
            .filter(|&e| self.tree.name(e) == Some(markup::TEXTBOX_CONTENT))
            .map(|e| BlockContainer::load(&self.tree, e, ContainerOwner::TextBox(e)))
            .collect()
    }

    // =========================================================================
    // Comments
    // =========================================================================

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Comment by its numeric id
    pub fn comment(&self, id: u32) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id(&self.tree) == Some(id))
    }

    /// A comment together with a session for editing its body
    pub fn edit_comment(&mut self, id: u32) -> Option<(&mut Comment, EditSession<'_>)> {
        let tree = &self.tree;
        let comment = self.comments.iter_mut().find(|c| c.id(tree) == Some(id))?;
        Some((
            comment,
            EditSession::new(&mut self.tree, &mut self.links, &self.settings),
        ))
    }

    /// Add an empty comment by `author`, dated now, with the next free id
    pub fn create_comment(&mut self, author: &str) -> Result<&mut Comment> {
        let id = self
            .comments
            .iter()
            .filter_map(|c| c.id(&self.tree))
            .max()
            .map_or(0, |max| max + 1);
        let comment = Comment::create(&mut self.tree, self.comments_element, id, author, Utc::now())
            .ok_or(DocModelError::NodeNotFound(self.comments_element))?;
        self.comments.push(comment);
        let index = self.comments.len() - 1;
        Ok(&mut self.comments[index])
    }

    /// Remove a comment and its content. Returns false for unknown ids.
    pub fn remove_comment(&mut self, id: u32) -> bool {
        let Some(index) = self.comments.iter().position(|c| c.id(&self.tree) == Some(id)) else {
            return false;
        };
        let comment = self.comments.remove(index);
        self.tree.remove_subtree(comment.element())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_child(tree: &mut ElementTree, parent: ElementId, name: &str) -> Result<ElementId> {
    if let Some(existing) = tree.first_child_named(parent, name) {
        return Ok(existing);
    }
    tree.append_element(parent, name)
        .ok_or(DocModelError::NodeNotFound(parent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BlockKind, Node};

    #[test]
    fn test_new_document_is_empty() {
        let doc = Document::new();
        assert!(doc.body().is_empty());
        assert!(doc.comments().is_empty());
        assert_eq!(doc.text(), "");
        assert_eq!(doc.to_xml(), "<w:document><w:body/><w:comments/></w:document>");
    }

    #[test]
    fn test_from_xml_rejects_other_roots() {
        let result = Document::from_xml("<w:body/>");
        assert!(matches!(result, Err(DocModelError::InvalidOperation(_))));
        assert!(matches!(
            Document::from_xml("<w:document>"),
            Err(DocModelError::Markup(_))
        ));
    }

    #[test]
    fn test_from_xml_creates_missing_parts() {
        let doc = Document::from_xml("<w:document/>").unwrap();
        assert_eq!(doc.to_xml(), "<w:document><w:body/><w:comments/></w:document>");
    }

    #[test]
    fn test_edit_body() {
        let mut doc = Document::new();
        {
            let (body, mut session) = doc.edit();
            let paragraph = body.create_paragraph(&mut session).unwrap();
            let run = paragraph.content_mut().create_run(&mut session).unwrap().clone();
            run.set_text(session.tree_mut(), "Hello");
            body.create(&mut session, BlockKind::Table).unwrap();
        }
        assert_eq!(doc.body().len(), 2);
        assert_eq!(doc.text(), "Hello\n");
        assert!(doc.body().matches_backing(doc.tree()));
    }

    #[test]
    fn test_comments_lifecycle() {
        let mut doc = Document::new();
        let first = doc.create_comment("Grace Hopper").unwrap().element();
        doc.create_comment("Alan Turing").unwrap();
        assert_eq!(doc.comments().len(), 2);
        assert_eq!(doc.comment(1).unwrap().author(doc.tree()), Some("Alan Turing"));

        {
            let (comment, mut session) = doc.edit_comment(0).unwrap();
            comment.body_mut().create_paragraph(&mut session).unwrap();
        }
        assert_eq!(doc.comment(0).unwrap().body().len(), 1);

        assert!(doc.remove_comment(0));
        assert!(!doc.remove_comment(0));
        assert!(!doc.tree().contains(first));

        // Ids continue after the highest remaining one
        doc.create_comment("Ada").unwrap();
        let last = doc.comments().last().unwrap();
        assert_eq!(last.id(doc.tree()), Some(2));
    }

    #[test]
    fn test_reload_round_trip() {
        let markup = concat!(
            "<w:document><w:body><w:p><w:r><w:t>one</w:t></w:r></w:p>",
            "<w:p><w:r><w:pict><w:txbxContent><w:p><w:r><w:t>boxed</w:t></w:r></w:p></w:txbxContent></w:pict></w:r></w:p>",
            "</w:body><w:comments><w:comment w:id=\"4\" w:author=\"R\"><w:p/></w:comment></w:comments></w:document>"
        );
        let doc = Document::from_xml(markup).unwrap();
        assert_eq!(doc.body().len(), 2);
        assert_eq!(doc.comment(4).unwrap().body().len(), 1);

        let boxes = doc.text_boxes();
        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0].text(doc.tree()), "boxed");
        assert_eq!(boxes[0].owner(), ContainerOwner::TextBox(boxes[0].element()));

        let again = Document::from_xml(&doc.to_xml()).unwrap();
        assert_eq!(again.text(), doc.text());
        assert_eq!(again.body().get(0).unwrap().kind(), doc.body().get(0).unwrap().kind());
    }

    #[test]
    fn test_clone_edits_independently() {
        let mut doc = Document::new();
        let mut copy = doc.clone();
        {
            let (body, mut session) = copy.edit();
            body.create_paragraph(&mut session).unwrap();
        }
        assert!(doc.body().is_empty());
        assert_eq!(copy.body().len(), 1);
        assert_ne!(copy.tree().tree_id(), doc.tree().tree_id());

        let (body, mut session) = doc.edit();
        body.create_table(&mut session).unwrap();
        drop(session);
        assert!(doc.body().matches_backing(doc.tree()));
    }

    #[test]
    #[should_panic(expected = "cursor belongs to a different backing tree")]
    fn test_cursor_from_original_rejected_by_clone() {
        let doc = Document::new();
        let mut cursor = doc.tree().cursor_at(doc.body().element(), 0).unwrap();
        let mut copy = doc.clone();
        let (body, mut session) = copy.edit();
        let _ = body.insert_paragraph(&mut session, &mut cursor);
    }
}
