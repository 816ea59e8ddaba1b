//! Streaming parser for native API description documents.
//!
//! This crate turns one description document per platform into the tree
//! model from `girmodel-core`, merging each pass into the previously
//! merged document as it parses. It includes:
//!
//! - A hand-written markup event reader ([`reader::XmlReader`])
//! - The recursive tree builder with structural tree-walk, patch hook and
//!   merge invocation ([`Parser`])
//! - Fatal error types for malformed markup and unknown elements
//!
//! # Example
//!
//! ```
//! use girmodel_core::Platforms;
//! use girmodel_parser::Parser;
//!
//! let source = r#"<repository version="1.2">
//!   <namespace name="GLib" shared-library="libglib-2.0.so.0">
//!     <class name="MainLoop"/>
//!   </namespace>
//! </repository>"#;
//!
//! let parser = Parser::new();
//! let doc = parser.parse_str(source, Platforms::LINUX, None).unwrap();
//! assert!(doc.namespace("GLib").is_some());
//! ```

mod error;
mod parser;
pub mod reader;

pub use error::{ParseError, XmlError};
pub use parser::Parser;
