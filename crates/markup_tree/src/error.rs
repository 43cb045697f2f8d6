//! Error types for markup tree operations

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MarkupError {
    #[error("XML error: {0}")]
    Xml(String),

    #[error("Unexpected end tag: {0}")]
    UnexpectedEnd(String),

    #[error("Unclosed element: {0}")]
    Unclosed(String),

    #[error("Document has no root element")]
    MissingRoot,

    #[error("Document has more than one root element")]
    MultipleRoots,
}

impl From<quick_xml::Error> for MarkupError {
    fn from(err: quick_xml::Error) -> Self {
        MarkupError::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for MarkupError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        MarkupError::Xml(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MarkupError>;
