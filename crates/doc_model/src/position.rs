//! Position Mapper
//!
//! Containers keep one authoritative document-order list; the per-category
//! views are filtered from it on demand. These helpers translate between an
//! index into that unified list and an index into one category's view, and
//! compute where a freshly spliced backing element lands in the unified list.

use crate::classify::{self, ContentFamily};
use markup_tree::{BackingTree, ElementId};
use serde::{Deserialize, Serialize};

/// Something that belongs to exactly one category of its container
pub trait Categorized {
    type Category: Copy + Eq + std::fmt::Debug;

    fn category(&self) -> Self::Category;
}

/// Where a node sits in its container's unified and typed views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub unified: usize,
    pub typed: usize,
}

/// Category and typed index of the entry at `index` in the unified list
pub fn typed_index<T: Categorized>(unified: &[T], index: usize) -> Option<(T::Category, usize)> {
    let category = unified.get(index)?.category();
    let typed = unified[..index]
        .iter()
        .filter(|n| n.category() == category)
        .count();
    Some((category, typed))
}

/// Unified index of the `typed`-th entry of `category`
pub fn unified_index<T: Categorized>(unified: &[T], category: T::Category, typed: usize) -> Option<usize> {
    unified
        .iter()
        .enumerate()
        .filter(|(_, n)| n.category() == category)
        .nth(typed)
        .map(|(i, _)| i)
}

/// Number of entries of `category`
pub fn typed_len<T: Categorized>(unified: &[T], category: T::Category) -> usize {
    unified.iter().filter(|n| n.category() == category).count()
}

/// Entries of one category, in document order
pub fn typed_view<T: Categorized>(unified: &[T], category: T::Category) -> impl Iterator<Item = &T> {
    unified.iter().filter(move |n| n.category() == category)
}

/// Count the nodes contributed by `parent`'s children strictly before `slot`.
///
/// This is the unified index a node spliced in at `slot` receives.
pub fn count_before(tree: &dyn BackingTree, parent: ElementId, slot: usize, family: ContentFamily) -> usize {
    let children = tree.children(parent);
    let end = slot.min(children.len());
    children[..end]
        .iter()
        .map(|&child| classify::contribution(tree, child, family))
        .sum()
}
