//! Process-wide table of loaded documents.
//!
//! The [`Library`] is the only shared mutable state in the model: each
//! document is parsed exactly once, inserted under its identity, and read
//! many times afterwards. Inserts are safe under concurrent
//! compute-if-absent semantics so parallel platform passes racing to load
//! the same document converge on one retained result.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;

use girmodel_core::{Document, NodeId};

/// Registry lookup errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No loaded document declares the requested namespace.
    #[error("no namespace with name {0}")]
    NamespaceNotFound(String),
}

/// An owned handle to one node of one loaded document.
///
/// Registry queries cross document boundaries, so the handle keeps the
/// owning document alive alongside the node id.
#[derive(Debug, Clone)]
pub struct NodeHandle {
    /// The document the node lives in.
    pub document: Arc<Document>,
    /// The node itself.
    pub node: NodeId,
}

impl NodeHandle {
    /// Borrowing view of the node.
    pub fn to_ref(&self) -> girmodel_core::NodeRef<'_> {
        self.document.node(self.node)
    }
}

/// Table from document identity to its parsed tree.
#[derive(Debug, Default)]
pub struct Library {
    documents: RwLock<FxHashMap<String, Arc<Document>>>,
    exported: RwLock<FxHashSet<String>>,
}

impl Library {
    /// Create an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parsed document under its identity, replacing any earlier
    /// document with the same identity. Returns the retained document.
    pub fn put(&self, name: impl Into<String>, document: Document) -> Arc<Document> {
        let document = Arc::new(document);
        self.documents
            .write()
            .insert(name.into(), Arc::clone(&document));
        document
    }

    /// The document with the given identity.
    pub fn get(&self, name: &str) -> Option<Arc<Document>> {
        self.documents.read().get(name).cloned()
    }

    /// Whether a document with the given identity is loaded.
    pub fn contains(&self, name: &str) -> bool {
        self.documents.read().contains_key(name)
    }

    /// Compute-if-absent insert: return the already-loaded document, or
    /// parse and insert one.
    ///
    /// Two threads racing for the same identity may both run `parse`, but
    /// exactly one result is retained and both callers receive it.
    pub fn get_or_insert_with<E, F>(&self, name: &str, parse: F) -> Result<Arc<Document>, E>
    where
        F: FnOnce() -> Result<Document, E>,
    {
        if let Some(found) = self.get(name) {
            return Ok(found);
        }
        let parsed = Arc::new(parse()?);
        let mut documents = self.documents.write();
        Ok(Arc::clone(
            documents
                .entry(name.to_string())
                .or_insert_with(|| parsed),
        ))
    }

    /// Identities of all loaded documents.
    pub fn document_names(&self) -> Vec<String> {
        self.documents.read().keys().cloned().collect()
    }

    /// Every namespace of every loaded document.
    pub fn namespaces(&self) -> Vec<NodeHandle> {
        let documents = self.documents.read();
        let mut result = Vec::new();
        for document in documents.values() {
            for ns in document.namespaces() {
                result.push(NodeHandle {
                    document: Arc::clone(document),
                    node: ns.id(),
                });
            }
        }
        result
    }

    /// The namespace with the given declared name, searching every loaded
    /// document.
    ///
    /// This is an error (rather than an absence) because callers invoke it
    /// after all documents are loaded, when a missing namespace means the
    /// build is incomplete.
    pub fn lookup_namespace(&self, name: &str) -> Result<NodeHandle, RegistryError> {
        let documents = self.documents.read();
        for document in documents.values() {
            if let Some(ns) = document.namespace(name) {
                return Ok(NodeHandle {
                    document: Arc::clone(document),
                    node: ns.id(),
                });
            }
        }
        Err(RegistryError::NamespaceNotFound(name.to_string()))
    }

    /// The callable or member with the given native symbol name, anywhere
    /// in any loaded document.
    pub fn lookup_c_identifier(&self, identifier: &str) -> Option<NodeHandle> {
        let documents = self.documents.read();
        for document in documents.values() {
            if let Some(node) = document.lookup_c_identifier(identifier) {
                return Some(NodeHandle {
                    document: Arc::clone(document),
                    node,
                });
            }
        }
        None
    }

    /// Mark a namespace as exported.
    pub fn set_exported(&self, name: impl Into<String>) {
        self.exported.write().insert(name.into());
    }

    /// Names marked as exported.
    pub fn exported(&self) -> Vec<String> {
        self.exported.read().iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use girmodel_core::{Element, ElementKind, Tree};
    use rustc_hash::FxHashMap as Map;

    fn attrs(pairs: &[(&str, &str)]) -> Map<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn document_with_namespace(ns_name: &str, symbol: Option<&str>) -> Document {
        let mut tree = Tree::new();
        let mut ns_children = Vec::new();
        if let Some(symbol) = symbol {
            let func = tree.push(Element::new(
                ElementKind::Function,
                attrs(&[("name", "f"), ("c:identifier", symbol)]),
            ));
            ns_children.push(func);
        }
        let mut ns = Element::new(ElementKind::Namespace, attrs(&[("name", ns_name)]));
        ns.children = ns_children;
        let ns = tree.push(ns);
        let mut repo = Element::new(ElementKind::Repository, attrs(&[]));
        repo.children.push(ns);
        let root = tree.push(repo);
        Document::new(tree, root)
    }

    #[test]
    fn put_get_contains() {
        let library = Library::new();
        assert!(!library.contains("GLib-2.0"));
        library.put("GLib-2.0", document_with_namespace("GLib", None));
        assert!(library.contains("GLib-2.0"));
        assert!(library.get("GLib-2.0").is_some());
        assert!(library.get("Gtk-4.0").is_none());
    }

    #[test]
    fn get_or_insert_with_parses_once() {
        let library = Library::new();
        let first = library
            .get_or_insert_with("GLib-2.0", || {
                Ok::<_, ()>(document_with_namespace("GLib", None))
            })
            .unwrap();
        // Second call must reuse the retained document, not re-parse.
        let second = library
            .get_or_insert_with::<(), _>("GLib-2.0", || panic!("already loaded"))
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn get_or_insert_with_propagates_errors() {
        let library = Library::new();
        let result = library.get_or_insert_with("Broken-1.0", || Err("boom"));
        assert_eq!(result.unwrap_err(), "boom");
        assert!(!library.contains("Broken-1.0"));
    }

    #[test]
    fn lookup_namespace_across_documents() {
        let library = Library::new();
        library.put("GLib-2.0", document_with_namespace("GLib", None));
        library.put("Gtk-4.0", document_with_namespace("Gtk", None));

        let gtk = library.lookup_namespace("Gtk").unwrap();
        assert_eq!(gtk.to_ref().name(), Some("Gtk"));

        let missing = library.lookup_namespace("Gdk");
        assert_eq!(
            missing.unwrap_err(),
            RegistryError::NamespaceNotFound("Gdk".to_string())
        );
    }

    #[test]
    fn lookup_c_identifier_across_documents() {
        let library = Library::new();
        library.put(
            "GLib-2.0",
            document_with_namespace("GLib", Some("g_main_loop_new")),
        );
        library.put("Gtk-4.0", document_with_namespace("Gtk", None));

        let found = library.lookup_c_identifier("g_main_loop_new").unwrap();
        assert_eq!(found.to_ref().name(), Some("f"));
        assert!(library.lookup_c_identifier("g_nothing").is_none());
    }

    #[test]
    fn exported_set() {
        let library = Library::new();
        library.set_exported("GLib");
        library.set_exported("GLib");
        library.set_exported("Gtk");
        let mut exported = library.exported();
        exported.sort();
        assert_eq!(exported, vec!["GLib", "Gtk"]);
    }

    #[test]
    fn concurrent_inserts_converge() {
        let library = Arc::new(Library::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let library = Arc::clone(&library);
                std::thread::spawn(move || {
                    library
                        .get_or_insert_with("GLib-2.0", || {
                            Ok::<_, ()>(document_with_namespace("GLib", None))
                        })
                        .unwrap()
                })
            })
            .collect();
        let docs: Vec<Arc<Document>> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();
        for doc in &docs[1..] {
            assert!(Arc::ptr_eq(&docs[0], doc));
        }
    }
}
