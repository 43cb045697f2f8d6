//! Table node
//!
//! Tables are leaves for the containers that hold them: rows and cells are
//! not tracked as nodes. Each cell is itself block content, so cell text is
//! read by loading a block container over the `w:tc` element. A row may
//! also wrap cells in a content control; its cells are read in place.

use crate::run::set_run_text;
use crate::{markup, BlockContainer, ContainerOwner, Node, NodeKind};
use markup_tree::{BackingTree, ElementId};
use serde::{Deserialize, Serialize};

/// A `w:tbl` element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    element: ElementId,
}

impl Table {
    pub(crate) fn new(element: ElementId) -> Self {
        Self { element }
    }

    /// Row elements in order
    pub fn rows(&self, tree: &dyn BackingTree) -> Vec<ElementId> {
        children_named(tree, self.element, markup::TABLE_ROW)
    }

    /// Cell elements of one row, including cell-level content controls
    pub fn cells(&self, tree: &dyn BackingTree, row: ElementId) -> Vec<ElementId> {
        cell_children(tree, row)
    }

    pub fn row_count(&self, tree: &dyn BackingTree) -> usize {
        self.rows(tree).len()
    }

    /// Text of every cell, row by row
    pub fn cell_texts(&self, tree: &dyn BackingTree) -> Vec<Vec<String>> {
        self.rows(tree)
            .into_iter()
            .map(|row| {
                self.cells(tree, row)
                    .into_iter()
                    .map(|cell| cell_text(tree, cell))
                    .collect()
            })
            .collect()
    }

    /// Append a row with one single-paragraph cell per entry.
    ///
    /// Returns the new `w:tr` element, or None if the table is no longer in
    /// the tree.
    pub fn append_row(&self, tree: &mut dyn BackingTree, cells: &[&str]) -> Option<ElementId> {
        let row = tree.append_element(self.element, markup::TABLE_ROW)?;
        for text in cells {
            let cell = tree.append_element(row, markup::TABLE_CELL)?;
            let paragraph = tree.append_element(cell, markup::PARAGRAPH)?;
            if !text.is_empty() {
                let run = tree.append_element(paragraph, markup::RUN)?;
                set_run_text(tree, run, text);
            }
        }
        Some(row)
    }

    /// Rows joined by newlines, cells by tabs
    pub fn text(&self, tree: &dyn BackingTree) -> String {
        self.cell_texts(tree)
            .into_iter()
            .map(|row| row.join("\t"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Node for Table {
    fn element(&self) -> ElementId {
        self.element
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Table
    }
}

fn children_named(tree: &dyn BackingTree, parent: ElementId, name: &str) -> Vec<ElementId> {
    tree.children(parent)
        .iter()
        .copied()
        .filter(|&c| tree.name(c) == Some(name))
        .collect()
}

fn cell_children(tree: &dyn BackingTree, parent: ElementId) -> Vec<ElementId> {
    tree.children(parent)
        .iter()
        .copied()
        .filter(|&c| matches!(tree.name(c), Some(markup::TABLE_CELL) | Some(markup::SDT)))
        .collect()
}

fn cell_text(tree: &dyn BackingTree, cell: ElementId) -> String {
    if tree.name(cell) != Some(markup::SDT) {
        return BlockContainer::load(tree, cell, ContainerOwner::TableCell(cell)).text(tree);
    }
    // Content control around one or more cells
    match tree.first_child_named(cell, markup::SDT_CONTENT) {
        Some(content) => cell_children(tree, content)
            .into_iter()
            .map(|inner| cell_text(tree, inner))
            .collect::<Vec<_>>()
            .join("\t"),
        None => String::new(),
    }
}
