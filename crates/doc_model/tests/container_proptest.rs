//! Property-based tests for container editing
//!
//! Random edit sequences are applied through the public API. After every
//! step the mirrored node list must equal a fresh walk of the backing tree,
//! and the typed views must partition the unified list in document order.

use doc_model::{BlockKind, Document, InlineCategory, InlineKind, Node, Position, RunContainer};
use markup_tree::BackingTree;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum BlockOp {
    Create(BlockKind),
    InsertAt(usize, BlockKind),
    Remove(usize),
    Duplicate(usize),
}

#[derive(Debug, Clone)]
enum InlineOp {
    Create(InlineKind),
    Insert(usize, InlineKind),
    InsertAt(usize, InlineKind),
    RemoveRun(usize),
    RemoveSdtRun(usize),
    Clone(usize),
}

/// Generate a block node kind
fn block_kind_strategy() -> impl Strategy<Value = BlockKind> {
    prop_oneof![
        Just(BlockKind::Paragraph),
        Just(BlockKind::Table),
        Just(BlockKind::ContentControl),
    ]
}

fn block_op_strategy() -> impl Strategy<Value = BlockOp> {
    prop_oneof![
        block_kind_strategy().prop_map(BlockOp::Create),
        (0usize..8, block_kind_strategy()).prop_map(|(slot, kind)| BlockOp::InsertAt(slot, kind)),
        (0usize..8).prop_map(BlockOp::Remove),
        (0usize..8).prop_map(BlockOp::Duplicate),
    ]
}

/// Generate an inline node kind; hyperlinks point at a small set of hosts
fn inline_kind_strategy() -> impl Strategy<Value = InlineKind> {
    prop_oneof![
        Just(InlineKind::Run),
        "[a-z]{1,6}".prop_map(|host| InlineKind::Hyperlink(format!("https://{}.test", host))),
        Just(InlineKind::Field),
        Just(InlineKind::ContentControl),
    ]
}

fn inline_op_strategy() -> impl Strategy<Value = InlineOp> {
    prop_oneof![
        inline_kind_strategy().prop_map(InlineOp::Create),
        (0usize..8, inline_kind_strategy()).prop_map(|(pos, kind)| InlineOp::Insert(pos, kind)),
        (0usize..8, inline_kind_strategy()).prop_map(|(slot, kind)| InlineOp::InsertAt(slot, kind)),
        (0usize..8).prop_map(InlineOp::RemoveRun),
        (0usize..4).prop_map(InlineOp::RemoveSdtRun),
        (0usize..8).prop_map(InlineOp::Clone),
    ]
}

/// Text with the characters that map onto run structure
fn run_text_strategy() -> impl Strategy<Value = String> {
    "[a-z \t\n]{0,16}"
}

// =============================================================================
// Invariant checks
// =============================================================================

fn check_block_positions(doc: &Document) -> Result<(), TestCaseError> {
    let body = doc.body();
    prop_assert!(body.matches_backing(doc.tree()));
    prop_assert_eq!(
        body.paragraphs().len() + body.tables().len() + body.content_controls().len(),
        body.len()
    );

    let mut seen = [0usize; 3];
    for (unified, node) in body.iter().enumerate() {
        let slot = match node.block_kind() {
            BlockKind::Paragraph => 0,
            BlockKind::Table => 1,
            BlockKind::ContentControl => 2,
        };
        let typed = seen[slot];
        prop_assert_eq!(body.position_of(node.element()), Some(Position { unified, typed }));
        prop_assert_eq!(body.unified_index(node.block_kind(), typed), Some(unified));
        seen[slot] += 1;
    }
    Ok(())
}

fn check_inline_positions(doc: &Document, content: &RunContainer) -> Result<(), TestCaseError> {
    prop_assert!(content.matches_backing(doc.tree()));
    prop_assert_eq!(content.run_count() + content.sdt_runs().len(), content.len());

    let mut runs = 0;
    let mut sdts = 0;
    for (unified, node) in content.iter().enumerate() {
        let typed = match node.category() {
            InlineCategory::Run => {
                prop_assert_eq!(content.run_pos(unified), Some(runs));
                runs += 1;
                runs - 1
            }
            InlineCategory::ContentControl => {
                prop_assert_eq!(content.sdt_run_pos(unified), Some(sdts));
                sdts += 1;
                sdts - 1
            }
        };
        prop_assert_eq!(content.position_of(node.element()), Some(Position { unified, typed }));
        if let Some(wrapper) = node.wrapper() {
            prop_assert!(doc.tree().contains(wrapper));
            prop_assert_eq!(doc.tree().parent(node.element()), Some(wrapper));
        }
    }
    Ok(())
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn block_edits_keep_mirror_in_sync(ops in prop::collection::vec(block_op_strategy(), 1..24)) {
        let mut doc = Document::new();
        let body_element = doc.body().element();

        for op in ops {
            let len = doc.body().len();
            let expected = match op {
                BlockOp::Create(kind) => {
                    let (body, mut session) = doc.edit();
                    prop_assert!(body.create(&mut session, kind).is_ok());
                    len + 1
                }
                BlockOp::InsertAt(slot, kind) => {
                    let children = doc.tree().children(body_element).len();
                    let mut cursor = doc.tree().cursor_at(body_element, slot % (children + 1)).unwrap();
                    let (body, mut session) = doc.edit();
                    prop_assert!(body.insert_at(&mut session, &mut cursor, kind).is_ok());
                    len + 1
                }
                BlockOp::Remove(index) => {
                    let (body, mut session) = doc.edit();
                    let removed = body.remove(&mut session, index);
                    prop_assert_eq!(removed, index < len);
                    if removed { len - 1 } else { len }
                }
                BlockOp::Duplicate(index) => {
                    let (body, mut session) = doc.edit();
                    let copied = body.duplicate(&mut session, index).is_ok();
                    prop_assert_eq!(copied, index < len);
                    if copied { len + 1 } else { len }
                }
            };
            prop_assert_eq!(doc.body().len(), expected);
            check_block_positions(&doc)?;
        }

        let reloaded = Document::from_xml(&doc.to_xml()).unwrap();
        prop_assert_eq!(reloaded.body().len(), doc.body().len());
        prop_assert_eq!(reloaded.text(), doc.text());
    }

    #[test]
    fn inline_edits_keep_mirror_in_sync(ops in prop::collection::vec(inline_op_strategy(), 1..24)) {
        let mut doc = Document::new();
        {
            let (body, mut session) = doc.edit();
            body.create_paragraph(&mut session).unwrap();
        }
        let paragraph = doc.body().paragraph(0).unwrap().element();

        for op in ops {
            let before = doc.body().paragraph(0).unwrap().content().clone();
            let runs = before.run_count();
            let sdts = before.sdt_runs().len();
            let (body, mut session) = doc.edit();
            let content = body.paragraph_mut(0).unwrap().content_mut();

            let len = before.len();
            let expected = match op {
                InlineOp::Create(kind) => {
                    prop_assert!(content.create(&mut session, kind).is_ok());
                    len + 1
                }
                InlineOp::Insert(pos, kind) => {
                    let inserted = content.insert(&mut session, pos, kind).is_ok();
                    prop_assert_eq!(inserted, pos <= runs);
                    if inserted { len + 1 } else { len }
                }
                InlineOp::InsertAt(slot, kind) => {
                    let children = session.tree().children(paragraph).len();
                    let mut cursor = session.tree().cursor_at(paragraph, slot % (children + 1)).unwrap();
                    prop_assert!(content.insert_at(&mut session, &mut cursor, kind).is_ok());
                    len + 1
                }
                InlineOp::RemoveRun(index) => {
                    let removed = content.remove_run(&mut session, index);
                    prop_assert_eq!(removed, index < runs);
                    if removed { len - 1 } else { len }
                }
                InlineOp::RemoveSdtRun(index) => {
                    let removed = content.remove_sdt_run(&mut session, index);
                    prop_assert_eq!(removed, index < sdts);
                    if removed { len - 1 } else { len }
                }
                InlineOp::Clone(index) => match before.get(index) {
                    Some(node) => {
                        prop_assert!(content.clone_node(&mut session, node).is_ok());
                        len + 1
                    }
                    None => len,
                },
            };
            prop_assert_eq!(content.len(), expected);

            let content = content.clone();
            drop(session);
            check_inline_positions(&doc, &content)?;
        }
    }

    #[test]
    fn run_text_round_trips(text in run_text_strategy()) {
        let mut doc = Document::new();
        {
            let (body, mut session) = doc.edit();
            let run = body
                .create_paragraph(&mut session)
                .unwrap()
                .content_mut()
                .create_run(&mut session)
                .unwrap()
                .clone();
            prop_assert!(run.set_text(session.tree_mut(), &text));
        }
        prop_assert_eq!(doc.text(), text.clone());

        // Significant whitespace survives serialization
        let reloaded = Document::from_xml(&doc.to_xml()).unwrap();
        prop_assert_eq!(reloaded.text(), text);
    }
}
