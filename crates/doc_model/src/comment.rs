//! Comment model - review annotations with their own block content
//!
//! A comment (`w:comment`) carries author metadata as attributes and holds
//! paragraphs and tables like the document body does.

use crate::{markup, BlockContainer, ContainerOwner};
use chrono::{DateTime, Utc};
use markup_tree::{BackingTree, ElementId};
use serde::{Deserialize, Serialize};

/// A `w:comment` element and the block container over its content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    element: ElementId,
    body: BlockContainer,
}

impl Comment {
    /// Mirror an existing comment element
    pub(crate) fn load(tree: &dyn BackingTree, element: ElementId) -> Self {
        Self {
            element,
            body: BlockContainer::load(tree, element, ContainerOwner::Comment(element)),
        }
    }

    /// Append a new, empty comment under `parent`
    pub(crate) fn create(
        tree: &mut dyn BackingTree,
        parent: ElementId,
        id: u32,
        author: &str,
        date: DateTime<Utc>,
    ) -> Option<Self> {
        let element = tree.append_element(parent, markup::COMMENT)?;
        tree.set_attribute(element, markup::ID, &id.to_string());
        tree.set_attribute(element, markup::AUTHOR, author);
        tree.set_attribute(element, markup::INITIALS, &initials_of(author));
        tree.set_attribute(element, markup::DATE, &date.to_rfc3339());
        Some(Self {
            element,
            body: BlockContainer::new_empty(element, ContainerOwner::Comment(element)),
        })
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Numeric comment id referenced by range markers in the body
    pub fn id(&self, tree: &dyn BackingTree) -> Option<u32> {
        tree.attribute(self.element, markup::ID)?.parse().ok()
    }

    pub fn author<'t>(&self, tree: &'t dyn BackingTree) -> Option<&'t str> {
        tree.attribute(self.element, markup::AUTHOR)
    }

    pub fn initials<'t>(&self, tree: &'t dyn BackingTree) -> Option<&'t str> {
        tree.attribute(self.element, markup::INITIALS)
    }

    /// Timestamp of the comment; unparseable dates read as absent
    pub fn date(&self, tree: &dyn BackingTree) -> Option<DateTime<Utc>> {
        let raw = tree.attribute(self.element, markup::DATE)?;
        match DateTime::parse_from_rfc3339(raw) {
            Ok(date) => Some(date.with_timezone(&Utc)),
            Err(e) => {
                tracing::debug!(comment = %self.element, raw, "unreadable comment date: {}", e);
                None
            }
        }
    }

    /// The paragraphs and tables of the comment
    pub fn body(&self) -> &BlockContainer {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut BlockContainer {
        &mut self.body
    }

    pub fn text(&self, tree: &dyn BackingTree) -> String {
        self.body.text(tree)
    }
}

fn initials_of(author: &str) -> String {
    author
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}
