//! A parsed description document.
//!
//! A [`Document`] owns the tree produced by one parse pass (or by a chain
//! of per-platform passes merged together) and is sealed at construction:
//! the per-namespace registered-type index is materialized once, and the
//! tree is read-only from then on.

use rustc_hash::FxHashMap;

use crate::{ElementKind, NodeId, NodeRef, Tree};

/// One parsed description document, sealed and indexed.
#[derive(Debug, Clone)]
pub struct Document {
    tree: Tree,
    root: NodeId,
    /// Registered types per namespace node, keyed by declared name.
    types: FxHashMap<NodeId, FxHashMap<String, NodeId>>,
}

impl Document {
    /// Seal a tree into a document. Builds the registered-type index for
    /// every namespace under the root.
    pub fn new(tree: Tree, root: NodeId) -> Self {
        let mut types = FxHashMap::default();
        for ns in tree.children_of_kind(root, ElementKind::Namespace) {
            let mut table: FxHashMap<String, NodeId> = FxHashMap::default();
            for child in tree.children(ns) {
                if !tree.kind(*child).is_registered_type() {
                    continue;
                }
                if let Some(name) = tree.attr(*child, "name") {
                    // First declaration with a name wins.
                    table.entry(name.to_string()).or_insert(*child);
                }
            }
            types.insert(ns, table);
        }
        Document { tree, root, types }
    }

    /// The underlying tree.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Root node (the repository element).
    pub fn root(&self) -> NodeRef<'_> {
        self.tree.get(self.root)
    }

    /// Id of the root node.
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// Borrowing handle for any node in this document.
    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        self.tree.get(id)
    }

    /// Namespaces declared by this document, in source order.
    pub fn namespaces(&self) -> impl Iterator<Item = NodeRef<'_>> {
        self.tree
            .children_of_kind(self.root, ElementKind::Namespace)
            .map(|id| self.tree.get(id))
    }

    /// Namespace with the given declared name.
    pub fn namespace(&self, name: &str) -> Option<NodeRef<'_>> {
        self.namespaces().find(|ns| ns.name() == Some(name))
    }

    /// Registered type declared directly in a namespace of this document.
    ///
    /// Uses the index materialized at seal time; `None` when the node is
    /// not a namespace of this document or the name is not declared in it.
    pub fn registered_type(&self, namespace: NodeId, name: &str) -> Option<NodeId> {
        self.types.get(&namespace)?.get(name).copied()
    }

    /// Registered-type names declared in a namespace, for diagnostics.
    pub fn registered_type_count(&self, namespace: NodeId) -> usize {
        self.types.get(&namespace).map_or(0, FxHashMap::len)
    }

    /// Callable or member with the given native symbol name, anywhere in
    /// this document: directly under a namespace, or under one of its
    /// registered types.
    pub fn lookup_c_identifier(&self, identifier: &str) -> Option<NodeId> {
        for ns in self.tree.children_of_kind(self.root, ElementKind::Namespace) {
            if let Some(found) = self.c_identifier_in(ns, identifier) {
                return Some(found);
            }
            for child in self.tree.children(ns) {
                if !self.tree.kind(*child).is_registered_type() {
                    continue;
                }
                if let Some(found) = self.c_identifier_in(*child, identifier) {
                    return Some(found);
                }
            }
        }
        None
    }

    fn c_identifier_in(&self, container: NodeId, identifier: &str) -> Option<NodeId> {
        self.tree.children(container).iter().copied().find(|&child| {
            let kind = self.tree.kind(child);
            (kind.is_callable() || kind == ElementKind::Member)
                && self.tree.attr(child, "c:identifier") == Some(identifier)
        })
    }
}
