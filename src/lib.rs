//! Platform-merged model of native API descriptions.
//!
//! `girmodel` ingests machine-readable interface-description documents,
//! one per supported platform, and builds a single in-memory model of the
//! described library with every declaration tagged with the set of
//! platforms it is available on. A code-emission stage walks the finished
//! model; this workspace stops at the model itself.
//!
//! The work is split across three crates, re-exported here:
//!
//! - `girmodel-core` - the typed tree, the platform bitmask, the per-kind
//!   merge engine and the patch hook
//! - `girmodel-parser` - the streaming document parser that builds the
//!   tree while unifying it with previously parsed platforms
//! - `girmodel-registry` - the cross-document registry and the lazy
//!   type-reference resolver
//!
//! # Example
//!
//! ```
//! use girmodel::prelude::*;
//!
//! let linux = r#"<repository>
//!   <namespace name="Gio" shared-library="libgio-2.0.so.0">
//!     <class name="File"><method name="close"/></class>
//!   </namespace>
//! </repository>"#;
//! let windows = r#"<repository>
//!   <namespace name="Gio" shared-library="libgio-2.0-0.dll">
//!     <class name="File"><method name="delete"/></class>
//!   </namespace>
//! </repository>"#;
//!
//! let parser = Parser::new();
//! let doc = parser.parse_str(linux, Platforms::LINUX, None).unwrap();
//! let doc = parser.parse_str(windows, Platforms::WINDOWS, Some(doc)).unwrap();
//!
//! let library = Library::new();
//! library.put("Gio-2.0", doc);
//!
//! let gio = library.lookup_namespace("Gio").unwrap();
//! let file = library.resolve(&gio, "File").unwrap();
//! assert_eq!(file.to_ref().platforms(), Platforms::LINUX | Platforms::WINDOWS);
//! ```

pub use girmodel_core as core;
pub use girmodel_parser as parser;
pub use girmodel_registry as registry;

/// Commonly used types, re-exported in one place.
pub mod prelude {
    pub use girmodel_core::{
        merge, Document, Element, ElementKind, NodeId, NodeRef, Patch, Platforms, Tree,
    };
    pub use girmodel_parser::{ParseError, Parser, XmlError};
    pub use girmodel_registry::{Library, NodeHandle, RegistryError};
}
