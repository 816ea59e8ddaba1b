//! Markup events.
//!
//! The reader turns document text into a flat stream of [`XmlEvent`]s;
//! the parser consumes the stream depth-first and builds the tree.

use std::fmt;

/// A position in the source document, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed).
    pub column: u32,
}

impl Position {
    /// Create a position.
    pub fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// An opening tag with its attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct StartTag {
    /// Element name, prefix included (`glib:signal`).
    pub name: String,
    /// Attributes in source order, entity references decoded.
    pub attributes: Vec<(String, String)>,
    /// Whether the tag closed itself (`<type .../>`).
    pub self_closing: bool,
    /// Position of the `<` that opened the tag.
    pub position: Position,
}

impl StartTag {
    /// Value of an attribute on this tag.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// One event of the document stream.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlEvent {
    /// An opening tag (also emitted for self-closing tags, with
    /// `self_closing` set; no matching [`XmlEvent::End`] follows).
    Start(StartTag),
    /// A closing tag.
    End {
        /// Element name.
        name: String,
    },
    /// A run of character content, entity references decoded.
    Text(String),
    /// End of the document.
    Eof,
}
