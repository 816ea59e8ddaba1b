//! Parser error types.
//!
//! Two layers: [`XmlError`] for malformed markup coming out of the event
//! reader, and [`ParseError`] for fatal structural errors in an otherwise
//! well-formed document. Both are unrecoverable: the description format is
//! closed and versioned, so a document this crate cannot read indicates a
//! format change, not a condition to paper over.

use thiserror::Error;

use crate::reader::Position;

/// Errors produced while tokenizing the markup itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum XmlError {
    /// An unexpected character was encountered.
    #[error("unexpected character '{ch}' at {position}")]
    UnexpectedChar { ch: char, position: Position },

    /// The document ended in the middle of a construct.
    #[error("unexpected end of document at {position}")]
    UnexpectedEof { position: Position },

    /// A malformed tag (missing name, `=`, or quote).
    #[error("malformed tag at {position}: {detail}")]
    MalformedTag { detail: String, position: Position },

    /// An entity reference that is not part of the supported set.
    #[error("invalid entity reference '&{entity};' at {position}")]
    InvalidEntity { entity: String, position: Position },

    /// A closing tag that does not match the open element.
    #[error("mismatched closing tag at {position}: expected </{expected}>, found </{found}>")]
    MismatchedEndTag {
        expected: String,
        found: String,
        position: Position,
    },

    /// A comment that never terminates.
    #[error("unterminated comment at {position}")]
    UnterminatedComment { position: Position },
}

/// Fatal errors while building the tree from the event stream.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The markup itself is malformed.
    #[error(transparent)]
    Xml(#[from] XmlError),

    /// An element name outside the closed vocabulary. The format has
    /// diverged from what the model understands.
    #[error("unsupported element <{name}> at {position}")]
    UnsupportedElement { name: String, position: Position },

    /// The document contains no root element.
    #[error("document contains no root element")]
    EmptyDocument,
}
