//! Document Model - structured content containers over a backing tree
//!
//! This crate mirrors the editable content of a word-processing document:
//! block containers (body, comments, text boxes, table cells, block content
//! controls) holding paragraphs, tables and nested content controls, and run
//! containers (paragraphs, inline content controls) holding text, hyperlink
//! and field runs. The backing element tree stays the source of truth; each
//! container keeps one document-order node list and derives its typed views
//! from it.

mod block;
pub mod classify;
mod comment;
mod content_control;
mod document;
mod error;
mod inline;
pub mod markup;
mod node;
mod paragraph;
pub mod position;
mod relationship;
mod run;
mod session;
mod settings;
mod table;

pub use block::*;
pub use classify::{ContentFamily, TransparentKind, WrapperKind};
pub use comment::*;
pub use content_control::*;
pub use document::*;
pub use error::*;
pub use inline::*;
pub use node::*;
pub use paragraph::*;
pub use position::{Categorized, Position};
pub use relationship::*;
pub use run::*;
pub use session::*;
pub use settings::*;
pub use table::*;
