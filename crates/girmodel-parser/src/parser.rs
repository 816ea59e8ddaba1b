//! Streaming description parser with patch hook and platform merging.
//!
//! The parser makes a single depth-first pass over the event stream and
//! builds the tree bottom-up. When a previously merged document is
//! supplied (second and later platform passes), the parser walks that tree
//! in parallel with the events: each new namespace or registered type is
//! matched against its existing counterpart by kind and declared name, and
//! matched pairs are unified by the merge engine before the node is
//! attached to its container.
//!
//! Each freshly constructed node is passed through the caller's ordered
//! patch list before merging, so merge matching sees the corrected shape.

use std::fs;
use std::path::Path;

use rustc_hash::FxHashMap;

use girmodel_core::{merge, Document, Element, ElementKind, NodeId, Patch, Platforms, Tree};

use crate::error::{ParseError, XmlError};
use crate::reader::{StartTag, XmlEvent, XmlReader};

/// Description parser for one or more platform passes.
///
/// The parser is a plain value threaded through calls; the patch list is
/// borrowed for the parser's lifetime and applied in order to every
/// freshly constructed node.
pub struct Parser<'p> {
    patches: &'p [Box<dyn Patch>],
}

impl Default for Parser<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'p> Parser<'p> {
    /// Create a parser with no patches.
    pub fn new() -> Self {
        Parser { patches: &[] }
    }

    /// Create a parser applying the given patch list to every node.
    pub fn with_patches(patches: &'p [Box<dyn Patch>]) -> Self {
        Parser { patches }
    }

    /// Parse one platform's description file, merging into `prior`.
    ///
    /// A missing or unreadable file is not an error: the platform simply
    /// does not ship this part of the API, and the prior document passes
    /// through unchanged.
    pub fn parse_file(
        &self,
        path: &Path,
        platform: Platforms,
        prior: Option<Document>,
    ) -> Result<Option<Document>, ParseError> {
        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(err) => {
                log::debug!("no document at {}: {err}; pass is a no-op", path.display());
                return Ok(prior);
            }
        };
        self.parse_str(&source, platform, prior).map(Some)
    }

    /// Parse one platform's description from a string, merging into
    /// `prior`.
    pub fn parse_str(
        &self,
        source: &str,
        platform: Platforms,
        prior: Option<Document>,
    ) -> Result<Document, ParseError> {
        let mut reader = XmlReader::new(source);
        let mut tree = Tree::new();
        loop {
            match reader.next_event()? {
                XmlEvent::Start(tag) => {
                    let existing = prior.as_ref().map(Document::root_id);
                    let root = self.parse_element(
                        &mut reader,
                        &mut tree,
                        tag,
                        platform,
                        prior.as_ref(),
                        existing,
                        None,
                    )?;
                    return Ok(Document::new(tree, root));
                }
                XmlEvent::Text(_) => continue,
                XmlEvent::Eof => return Err(ParseError::EmptyDocument),
                XmlEvent::End { .. } => continue,
            }
        }
    }

    /// Recursively parse one element and its content into a new node.
    ///
    /// `existing` is the node in the prior merged tree that provides the
    /// match context for this element's children; `namespace` is the
    /// declared name of the enclosing namespace, threaded down for
    /// patches.
    #[allow(clippy::too_many_arguments)]
    fn parse_element(
        &self,
        reader: &mut XmlReader<'_>,
        tree: &mut Tree,
        start: StartTag,
        platform: Platforms,
        prior: Option<&Document>,
        existing: Option<NodeId>,
        namespace: Option<&str>,
    ) -> Result<NodeId, ParseError> {
        let kind = ElementKind::from_name(&start.name).ok_or_else(|| {
            ParseError::UnsupportedElement {
                name: start.name.clone(),
                position: start.position,
            }
        })?;

        let mut ns_name: Option<String> = namespace.map(str::to_owned);
        let mut children: Vec<NodeId> = Vec::new();
        let mut contents = String::new();

        if !start.self_closing {
            loop {
                match reader.next_event()? {
                    XmlEvent::Start(child_tag) => {
                        if ElementKind::from_name(&child_tag.name)
                            .is_some_and(ElementKind::is_skipped)
                        {
                            reader.skip_element(&child_tag)?;
                            continue;
                        }

                        // Children of a namespace are patched and matched
                        // under that namespace's name.
                        if child_tag.name == "namespace" {
                            ns_name = child_tag.attr("name").map(str::to_owned);
                        }

                        let existing_child = walk_tree(prior, existing, &child_tag);
                        let child = self.parse_element(
                            reader,
                            tree,
                            child_tag,
                            platform,
                            prior,
                            existing_child,
                            ns_name.as_deref(),
                        )?;

                        for patch in self.patches {
                            patch.apply(tree, child, ns_name.as_deref());
                        }

                        let unified = match (existing_child, prior) {
                            (Some(ex), Some(prior_doc))
                                if should_merge(tree, child, prior_doc.tree(), ex) =>
                            {
                                merge(tree, child, prior_doc.tree(), ex)
                            }
                            _ => child,
                        };
                        children.push(unified);
                    }
                    XmlEvent::Text(text) => contents.push_str(&text),
                    XmlEvent::End { .. } => break,
                    XmlEvent::Eof => {
                        return Err(ParseError::Xml(XmlError::UnexpectedEof {
                            position: reader.position(),
                        }));
                    }
                }
            }
        }

        let mut attributes: FxHashMap<String, String> = FxHashMap::default();
        for (key, value) in start.attributes {
            attributes.insert(key, value);
        }

        let mut element = Element::new(kind, attributes);
        element.children = children;
        if kind.is_multiplatform() {
            element.platforms = platform;
        }
        if kind == ElementKind::Namespace {
            if let Some(library) = element.attributes.get("shared-library") {
                element.shared_libraries = vec![(platform, library.clone())];
            }
        }
        if kind.has_text() {
            element.text = Some(contents.trim().to_string());
        }
        Ok(tree.push(element))
    }
}

/// Move through the prior merged tree in parallel with the parse.
///
/// Namespaces are matched by declared name within the prior document's
/// namespace list; registered types by declared name through the
/// namespace's materialized table; nested records and unions by kind and
/// name within the current container. Every other element inherits the
/// container's context node unchanged. The first candidate in document
/// order wins when names collide.
fn walk_tree(
    prior: Option<&Document>,
    existing: Option<NodeId>,
    child: &StartTag,
) -> Option<NodeId> {
    let prior = prior?;
    let existing = existing?;
    let kind = ElementKind::from_name(&child.name)?;
    if !kind.is_walk_target() {
        return Some(existing);
    }

    let tree = prior.tree();
    let name = child.attr("name");
    match tree.kind(existing) {
        ElementKind::Repository if kind == ElementKind::Namespace => tree
            .children_of_kind(existing, ElementKind::Namespace)
            .find(|&ns| tree.attr(ns, "name") == name),
        ElementKind::Namespace => name.and_then(|n| prior.registered_type(existing, n)),
        _ if matches!(kind, ElementKind::Record | ElementKind::Union) => tree
            .children(existing)
            .iter()
            .copied()
            .find(|&c| tree.kind(c) == kind && tree.attr(c, "name") == name),
        _ => Some(existing),
    }
}

/// Whether a structural match and a freshly parsed node form a mergeable
/// pair: a namespace or registered type of the same kind and declared
/// name. Inherited context nodes (everything else the walk passes down)
/// never merge.
fn should_merge(tree: &Tree, incoming: NodeId, prior: &Tree, existing: NodeId) -> bool {
    let kind = tree.kind(incoming);
    kind.is_walk_target()
        && prior.kind(existing) == kind
        && prior.attr(existing, "name") == tree.attr(incoming, "name")
}
