//! Markup Tree - ordered element tree backing the document model
//!
//! This crate provides the storage layer that the document model mirrors:
//! a format-neutral tree of named elements with attributes and text, plus
//! the structural cursor protocol used to splice elements in at an exact
//! position. It has no knowledge of word-processing semantics; element names
//! are opaque strings to it.

mod backing;
mod cursor;
mod element;
mod error;
mod id;
pub mod xml;

pub use backing::*;
pub use cursor::*;
pub use element::*;
pub use error::*;
pub use id::*;
