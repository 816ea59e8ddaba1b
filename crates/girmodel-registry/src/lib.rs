//! Document registry and type-reference resolver.
//!
//! This crate provides the process-wide [`Library`]: the table from
//! document identity to parsed tree, queried by namespace name, by native
//! symbol name, and by lazy type-reference resolution. It is populated
//! once per build (write-once per document, read-many) and is the only
//! shared mutable state in the model.

mod library;
mod resolver;

pub use library::{Library, NodeHandle, RegistryError};
