//! Lazy type-reference resolution.
//!
//! A type reference in the tree is just a name, optionally qualified with
//! a namespace (`Gio.File`). Nothing is resolved at parse time: documents
//! are not loaded in dependency order and a later platform pass can still
//! extend a namespace, so resolution is recomputed on demand, every time,
//! and never cached on the reference itself.
//!
//! A name that cannot be found is not an error. The caller treats the
//! reference as external/opaque and degrades gracefully, so an
//! otherwise-valid document never fails to parse just because one of its
//! dependencies has not been loaded yet.

use std::sync::Arc;

use crate::library::{Library, NodeHandle};

impl Library {
    /// Resolve a possibly-qualified type name against a context namespace.
    ///
    /// Unqualified names are looked up in the context namespace's
    /// registered-type table. `Foreign.Local` names resolve `Foreign`
    /// through the registry first, then look up `Local` there.
    ///
    /// Returns `None` when no loaded namespace declares the name.
    pub fn resolve(&self, context: &NodeHandle, name: &str) -> Option<NodeHandle> {
        let found = match name.split_once('.') {
            None => self.resolve_in(context, name),
            Some((foreign, local)) => self
                .lookup_namespace(foreign)
                .ok()
                .and_then(|ns| self.resolve_in(&ns, local)),
        };
        if found.is_none() {
            log::debug!("cannot resolve type {name}");
        }
        found
    }

    fn resolve_in(&self, namespace: &NodeHandle, name: &str) -> Option<NodeHandle> {
        let node = namespace.document.registered_type(namespace.node, name)?;
        Some(NodeHandle {
            document: Arc::clone(&namespace.document),
            node,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use girmodel_core::{Document, Element, ElementKind, Tree};
    use rustc_hash::FxHashMap as Map;

    fn attrs(pairs: &[(&str, &str)]) -> Map<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// One namespace holding one class, wrapped in a repository.
    fn document(ns_name: &str, class_name: &str) -> Document {
        let mut tree = Tree::new();
        let class = tree.push(Element::new(
            ElementKind::Class,
            attrs(&[("name", class_name)]),
        ));
        let mut ns = Element::new(ElementKind::Namespace, attrs(&[("name", ns_name)]));
        ns.children.push(class);
        let ns = tree.push(ns);
        let mut repo = Element::new(ElementKind::Repository, attrs(&[]));
        repo.children.push(ns);
        let root = tree.push(repo);
        Document::new(tree, root)
    }

    #[test]
    fn unqualified_resolution() {
        let library = Library::new();
        library.put("Gio-2.0", document("Gio", "File"));
        let context = library.lookup_namespace("Gio").unwrap();

        let file = library.resolve(&context, "File").unwrap();
        assert_eq!(file.to_ref().kind(), ElementKind::Class);
        assert_eq!(file.to_ref().name(), Some("File"));

        assert!(library.resolve(&context, "Missing").is_none());
    }

    #[test]
    fn qualified_resolution_crosses_documents() {
        let library = Library::new();
        library.put("Gio-2.0", document("Gio", "File"));
        library.put("GObject-2.0", document("GObject", "Object"));
        let context = library.lookup_namespace("Gio").unwrap();

        let object = library.resolve(&context, "GObject.Object").unwrap();
        assert_eq!(object.to_ref().name(), Some("Object"));

        // Unknown foreign namespace: absent, not an error.
        assert!(library.resolve(&context, "Gtk.Widget").is_none());
    }

    #[test]
    fn resolution_is_deterministic() {
        let library = Library::new();
        library.put("Gio-2.0", document("Gio", "File"));
        let context = library.lookup_namespace("Gio").unwrap();

        let first = library.resolve(&context, "File").unwrap();
        let second = library.resolve(&context, "File").unwrap();
        assert_eq!(first.node, second.node);
        assert!(Arc::ptr_eq(&first.document, &second.document));
    }

    #[test]
    fn forward_reference_resolves_after_load() {
        let library = Library::new();
        library.put("A-1.0", document("A", "Widget"));
        let context = library.lookup_namespace("A").unwrap();

        // B is not loaded yet: absent, no error raised.
        assert!(library.resolve(&context, "B.Backend").is_none());

        // A fresh resolve with the same arguments succeeds once B is in.
        library.put("B-1.0", document("B", "Backend"));
        let backend = library.resolve(&context, "B.Backend").unwrap();
        assert_eq!(backend.to_ref().name(), Some("Backend"));
    }
}
