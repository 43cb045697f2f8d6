//! Property-based tests for the element tree
//!
//! Random structural edits must leave the arena free of orphans with parent
//! and child links agreeing, and serialization must round-trip whatever
//! shape the edits produced.

use markup_tree::{xml, BackingTree, ElementId, ElementTree};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum TreeOp {
    Insert { parent: usize, slot: usize, name: &'static str },
    Remove(usize),
    Copy { source: usize, parent: usize },
    Attribute { element: usize, value: String },
}

fn name_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("w:p"), Just("w:r"), Just("w:tbl"), Just("w:sdt")]
}

fn tree_op_strategy() -> impl Strategy<Value = TreeOp> {
    prop_oneof![
        3 => (0usize..64, 0usize..8, name_strategy())
            .prop_map(|(parent, slot, name)| TreeOp::Insert { parent, slot, name }),
        1 => (0usize..64).prop_map(TreeOp::Remove),
        1 => (0usize..64, 0usize..64).prop_map(|(source, parent)| TreeOp::Copy { source, parent }),
        1 => (0usize..64, "[a-z0-9 &<\"]{0,8}")
            .prop_map(|(element, value)| TreeOp::Attribute { element, value }),
    ]
}

/// Pick an existing element by wrapping an arbitrary index
fn pick(tree: &ElementTree, index: usize) -> ElementId {
    let all = tree.descendants(tree.root());
    all[index % all.len()]
}

fn check_links(tree: &ElementTree) -> Result<(), TestCaseError> {
    let all = tree.descendants(tree.root());
    prop_assert_eq!(all.len(), tree.len());
    prop_assert_eq!(tree.parent(tree.root()), None);
    for &element in all.iter().filter(|&&e| e != tree.root()) {
        let parent = tree.parent(element);
        prop_assert!(parent.is_some());
        let parent = parent.unwrap();
        let index = tree.index_in_parent(element);
        prop_assert!(index.is_some());
        prop_assert_eq!(tree.children(parent)[index.unwrap()], element);
    }
    Ok(())
}

proptest! {
    #[test]
    fn edits_keep_links_consistent(ops in prop::collection::vec(tree_op_strategy(), 1..32)) {
        let mut tree = ElementTree::new("w:body");
        let generation = tree.generation();

        for op in ops {
            match op {
                TreeOp::Insert { parent, slot, name } => {
                    let parent = pick(&tree, parent);
                    let len = tree.children(parent).len();
                    let inserted = tree.insert_child(parent, slot, name);
                    prop_assert_eq!(inserted.is_some(), slot <= len);
                }
                TreeOp::Remove(index) => {
                    let element = pick(&tree, index);
                    prop_assert_eq!(tree.remove_subtree(element), element != tree.root());
                    prop_assert!(tree.contains(tree.root()));
                }
                TreeOp::Copy { .. } if tree.len() > 256 => {}
                TreeOp::Copy { source, parent } => {
                    let source = pick(&tree, source);
                    let parent = pick(&tree, parent);
                    let before = tree.descendants(source).len();
                    let copy = tree.copy_subtree(source, parent);
                    prop_assert!(copy.is_some());
                    prop_assert_eq!(tree.descendants(copy.unwrap()).len(), before);
                }
                TreeOp::Attribute { element, value } => {
                    let element = pick(&tree, element);
                    prop_assert!(tree.set_attribute(element, "w:val", &value));
                    prop_assert_eq!(tree.attribute(element, "w:val"), Some(value.as_str()));
                }
            }
            check_links(&tree)?;
        }
        prop_assert!(tree.generation() >= generation);

        let written = xml::write(&tree);
        let reparsed = xml::parse(&written).unwrap();
        prop_assert_eq!(reparsed.len(), tree.len());
        prop_assert_eq!(xml::write(&reparsed), written);
    }

    #[test]
    fn chained_cursor_inserts_stay_in_order(
        existing in 0usize..6,
        slot in 0usize..6,
        count in 1usize..6,
    ) {
        let mut tree = ElementTree::new("w:body");
        let root = tree.root();
        for _ in 0..existing {
            tree.append_element(root, "w:p");
        }
        let slot = slot.min(existing);
        let mut cursor = tree.cursor_at(root, slot).unwrap();

        let mut inserted = Vec::new();
        for _ in 0..count {
            let element = tree.insert_element(&mut cursor, "w:tbl");
            prop_assert!(element.is_some());
            inserted.push(element.unwrap());
        }

        prop_assert_eq!(&tree.children(root)[slot..slot + count], inserted.as_slice());
        prop_assert_eq!(cursor.slot(), slot + count);
        prop_assert!(tree.is_current(&cursor));
    }
}
