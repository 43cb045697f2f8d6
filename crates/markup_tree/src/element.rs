//! In-memory element tree
//!
//! Elements are stored in a flat map keyed by [`ElementId`], each holding its
//! parent link and the ordered list of child ids, the same arena layout the
//! editor's node storage uses.

use crate::{BackingTree, ElementId, TreeId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single element: name, attributes, optional text and ordered children
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementData {
    /// Qualified name, e.g. `w:p`
    pub name: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    /// Attributes in document order
    pub attributes: Vec<(String, String)>,
    /// Character content, for text-bearing elements such as `w:t`
    pub text: Option<String>,
}

impl ElementData {
    fn new(name: impl Into<String>, parent: Option<ElementId>) -> Self {
        Self {
            name: name.into(),
            parent,
            children: Vec::new(),
            attributes: Vec::new(),
            text: None,
        }
    }

    /// Parent element id
    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    /// Child element ids in order
    pub fn children(&self) -> &[ElementId] {
        &self.children
    }
}

/// The default [`BackingTree`] implementation.
///
/// A clone is a separate tree: it keeps the element ids but gets a fresh
/// [`TreeId`], so cursors taken from one never apply to the other.
#[derive(Debug, Serialize, Deserialize)]
pub struct ElementTree {
    id: TreeId,
    root: ElementId,
    elements: HashMap<ElementId, ElementData>,
    generation: u64,
}

impl Clone for ElementTree {
    fn clone(&self) -> Self {
        Self {
            id: TreeId::new(),
            root: self.root,
            elements: self.elements.clone(),
            generation: self.generation,
        }
    }
}

impl ElementTree {
    /// Create a tree holding a single root element
    pub fn new(root_name: impl Into<String>) -> Self {
        let root = ElementId::new();
        let mut elements = HashMap::new();
        elements.insert(root, ElementData::new(root_name, None));
        Self {
            id: TreeId::new(),
            root,
            elements,
            generation: 0,
        }
    }

    /// Get an element by id
    pub fn get(&self, id: ElementId) -> Option<&ElementData> {
        self.elements.get(&id)
    }

    /// Number of elements in the tree, root included
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// A tree always has its root, so it is never empty
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Append a new element to a parent known to be in the tree.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not an element of this tree.
    pub fn push_element(&mut self, parent: ElementId, name: &str) -> ElementId {
        match self.append_element(parent, name) {
            Some(id) => id,
            None => panic!("element {parent} is not part of this tree"),
        }
    }

    fn bump(&mut self) {
        self.generation += 1;
    }
}

impl BackingTree for ElementTree {
    fn tree_id(&self) -> TreeId {
        self.id
    }

    fn generation(&self) -> u64 {
        self.generation
    }

    fn root(&self) -> ElementId {
        self.root
    }

    fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    fn name(&self, id: ElementId) -> Option<&str> {
        self.elements.get(&id).map(|e| e.name.as_str())
    }

    fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.elements.get(&id).and_then(|e| e.parent)
    }

    fn children(&self, id: ElementId) -> &[ElementId] {
        self.elements
            .get(&id)
            .map(|e| e.children.as_slice())
            .unwrap_or(&[])
    }

    fn attributes(&self, id: ElementId) -> &[(String, String)] {
        self.elements
            .get(&id)
            .map(|e| e.attributes.as_slice())
            .unwrap_or(&[])
    }

    fn text(&self, id: ElementId) -> Option<&str> {
        self.elements.get(&id).and_then(|e| e.text.as_deref())
    }

    fn set_attribute(&mut self, id: ElementId, key: &str, value: &str) -> bool {
        let Some(element) = self.elements.get_mut(&id) else {
            return false;
        };
        match element.attributes.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value.to_string(),
            None => element.attributes.push((key.to_string(), value.to_string())),
        }
        true
    }

    fn remove_attribute(&mut self, id: ElementId, key: &str) -> bool {
        let Some(element) = self.elements.get_mut(&id) else {
            return false;
        };
        let before = element.attributes.len();
        element.attributes.retain(|(k, _)| k != key);
        element.attributes.len() != before
    }

    fn set_text(&mut self, id: ElementId, text: Option<&str>) -> bool {
        match self.elements.get_mut(&id) {
            Some(element) => {
                element.text = text.map(str::to_string);
                true
            }
            None => false,
        }
    }

    fn insert_child(&mut self, parent: ElementId, index: usize, name: &str) -> Option<ElementId> {
        let parent_data = self.elements.get_mut(&parent)?;
        if index > parent_data.children.len() {
            return None;
        }
        let id = ElementId::new();
        parent_data.children.insert(index, id);
        self.elements.insert(id, ElementData::new(name, Some(parent)));
        self.bump();
        tracing::trace!(element = %id, name, index, "inserted element");
        Some(id)
    }

    fn remove_subtree(&mut self, id: ElementId) -> bool {
        if id == self.root || !self.elements.contains_key(&id) {
            return false;
        }
        let doomed = self.descendants(id);
        if let Some(parent) = self.parent(id) {
            if let Some(parent_data) = self.elements.get_mut(&parent) {
                parent_data.children.retain(|&c| c != id);
            }
        }
        for element in &doomed {
            self.elements.remove(element);
        }
        self.bump();
        tracing::trace!(element = %id, removed = doomed.len(), "removed subtree");
        true
    }
}
