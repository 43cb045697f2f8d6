//! Relationships from document content to external targets
//!
//! Hyperlinks do not store their URI inline; they store a relationship id
//! that the package resolves. The containers only ever ask for a new id
//! through [`RelationshipResolver`]; what happens to the table afterwards is
//! the package's business.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Relationship type URI for hyperlinks
pub const HYPERLINK_RELATIONSHIP: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";

/// Hands out relationship ids for external link targets
pub trait RelationshipResolver {
    /// Register an external hyperlink target and return its relationship id
    fn register_external_link(&mut self, uri: &str) -> String;

    /// Resolve a relationship id back to its target
    fn target(&self, id: &str) -> Option<&str>;
}

/// A single relationship
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Unique ID within the part (e.g., "rId1")
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path or URL
    pub target: String,
    /// Target mode (Internal or External)
    pub target_mode: TargetMode,
}

/// Target mode for relationships
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetMode {
    /// Internal target within the package
    #[default]
    Internal,
    /// External target (URL)
    External,
}

/// In-memory relationship table for one document part
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipTable {
    relationships: HashMap<String, Relationship>,
    next_id: u32,
}

impl RelationshipTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            relationships: HashMap::new(),
            next_id: 1,
        }
    }

    /// Add a relationship and return its ID
    pub fn add(&mut self, rel_type: &str, target: &str, target_mode: TargetMode) -> String {
        let id = format!("rId{}", self.next_id);
        self.next_id += 1;

        self.relationships.insert(
            id.clone(),
            Relationship {
                id: id.clone(),
                rel_type: rel_type.to_string(),
                target: target.to_string(),
                target_mode,
            },
        );

        id
    }

    /// Get a relationship by ID
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.relationships.get(id)
    }

    /// Check if a relationship exists
    pub fn contains(&self, id: &str) -> bool {
        self.relationships.contains_key(id)
    }

    /// Get all relationships
    pub fn all(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.values()
    }

    pub fn len(&self) -> usize {
        self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
    }
}

impl Default for RelationshipTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RelationshipResolver for RelationshipTable {
    fn register_external_link(&mut self, uri: &str) -> String {
        self.add(HYPERLINK_RELATIONSHIP, uri, TargetMode::External)
    }

    fn target(&self, id: &str) -> Option<&str> {
        self.relationships.get(id).map(|r| r.target.as_str())
    }
}
