//! Core model for platform-merged native API descriptions.
//!
//! This crate provides the typed tree that the rest of the workspace is
//! built on:
//!
//! - [`ElementKind`] - the closed element vocabulary of the description
//!   format, with its cross-cutting categories as predicates
//! - [`Tree`], [`NodeId`], [`Element`], [`NodeRef`] - the index-arena
//!   tree with attribute access and typed projections
//! - [`Document`] - a sealed tree with its registered-type index
//! - [`Platforms`] - the platform availability bitmask
//! - [`merge`] - the per-kind multi-platform merge engine
//! - [`Patch`] - the rewrite hook applied to freshly parsed nodes
//!
//! Parsing lives in `girmodel-parser`; the cross-document registry and
//! the type-reference resolver live in `girmodel-registry`.

mod document;
mod kind;
mod merge;
mod patch;
mod platform;
mod tree;

pub use document::Document;
pub use kind::ElementKind;
pub use merge::merge;
pub use patch::Patch;
pub use platform::Platforms;
pub use tree::{Element, NodeId, NodeRef, Tree};
