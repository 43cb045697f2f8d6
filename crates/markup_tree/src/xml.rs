//! XML reading and writing for element trees
//!
//! A deliberately small bridge between markup text and [`ElementTree`]:
//! elements, attributes and character data are kept; comments, processing
//! instructions and whitespace-only text between elements are dropped.

use crate::{BackingTree, ElementId, ElementTree, MarkupError, Result};
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Parse markup into a new element tree
pub fn parse(content: &str) -> Result<ElementTree> {
    let mut reader = Reader::from_str(content);
    let mut tree: Option<ElementTree> = None;
    let mut stack: Vec<ElementId> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => {
                let id = open_element(&mut tree, &stack, e)?;
                stack.push(id);
            }
            Event::Empty(ref e) => {
                open_element(&mut tree, &stack, e)?;
            }
            Event::End(ref e) => {
                if stack.pop().is_none() {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    return Err(MarkupError::UnexpectedEnd(name));
                }
            }
            Event::Text(ref t) => {
                let text = t.unescape()?;
                if !text.trim().is_empty() || preserves_space(&tree, &stack) {
                    append_text(&mut tree, &stack, &text);
                }
            }
            Event::CData(c) => {
                let text = String::from_utf8_lossy(&c.into_inner()).to_string();
                append_text(&mut tree, &stack, &text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        let name = tree
            .as_ref()
            .and_then(|t| t.name(*open))
            .unwrap_or_default()
            .to_string();
        return Err(MarkupError::Unclosed(name));
    }

    tree.ok_or(MarkupError::MissingRoot)
}

fn open_element(
    tree: &mut Option<ElementTree>,
    stack: &[ElementId],
    start: &BytesStart<'_>,
) -> Result<ElementId> {
    let name = String::from_utf8_lossy(start.name().as_ref()).to_string();

    let id = if let Some(t) = tree.as_mut() {
        let parent = *stack.last().ok_or(MarkupError::MultipleRoots)?;
        t.append_element(parent, &name)
            .ok_or_else(|| MarkupError::Xml(format!("cannot attach <{}>", name)))?
    } else {
        let new_tree = ElementTree::new(name);
        let root = new_tree.root();
        *tree = Some(new_tree);
        root
    };

    if let Some(t) = tree.as_mut() {
        for attr in start.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            let value = attr.unescape_value()?;
            t.set_attribute(id, &key, &value);
        }
    }

    Ok(id)
}

/// Whitespace-only text is layout noise unless the element asks for it
fn preserves_space(tree: &Option<ElementTree>, stack: &[ElementId]) -> bool {
    match (tree.as_ref(), stack.last()) {
        (Some(t), Some(&current)) => t.attribute(current, "xml:space") == Some("preserve"),
        _ => false,
    }
}

fn append_text(tree: &mut Option<ElementTree>, stack: &[ElementId], text: &str) {
    let (Some(t), Some(&current)) = (tree.as_mut(), stack.last()) else {
        return;
    };
    let combined = match t.text(current) {
        Some(existing) => format!("{}{}", existing, text),
        None => text.to_string(),
    };
    t.set_text(current, Some(&combined));
}

/// Serialize a whole tree, starting at its root
pub fn write<T: BackingTree + ?Sized>(tree: &T) -> String {
    write_element(tree, tree.root())
}

/// Serialize one element and its subtree
pub fn write_element<T: BackingTree + ?Sized>(tree: &T, id: ElementId) -> String {
    let mut out = String::new();
    write_into(tree, id, &mut out);
    out
}

fn write_into<T: BackingTree + ?Sized>(tree: &T, id: ElementId, out: &mut String) {
    let Some(name) = tree.name(id) else {
        return;
    };

    out.push('<');
    out.push_str(name);
    for (key, value) in tree.attributes(id) {
        out.push_str(&format!(" {}=\"{}\"", key, escape(value.as_str())));
    }

    let children = tree.children(id);
    let text = tree.text(id);
    if children.is_empty() && text.is_none() {
        out.push_str("/>");
        return;
    }

    out.push('>');
    if let Some(text) = text {
        out.push_str(&escape(text));
    }
    for &child in children {
        write_into(tree, child, out);
    }
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}
