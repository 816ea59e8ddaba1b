//! Index-arena tree of description elements.
//!
//! Nodes live in a [`Tree`] (an append-only `Vec`) and refer to each other
//! by [`NodeId`]. Children point back to their container through an index
//! instead of a raw pointer, so merging can freely build replacement nodes
//! in the same arena without dangling references.
//!
//! A node is effectively immutable once attached: the only sanctioned
//! mutations are the patch surface ([`Tree::set_attr`],
//! [`Tree::retain_children`], ...) applied before a node is merged or
//! attached, and parent-link fixup at attach time.

use rustc_hash::FxHashMap;

use crate::{ElementKind, Platforms};

/// Index of a node in its [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Raw index value.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One element of a description document.
///
/// Holds the kind tag, the attribute map, the ordered child list and the
/// parent back-reference. Multiplatform kinds additionally carry the
/// platform bitmask; namespaces carry the per-platform shared-library
/// table; documentation kinds carry their character content.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Kind tag.
    pub kind: ElementKind,
    /// Attribute key/value pairs, exactly as written in the document.
    pub attributes: FxHashMap<String, String>,
    /// Ordered child list, in source order.
    pub children: Vec<NodeId>,
    /// Container back-reference. `None` for the root and for nodes not
    /// yet attached.
    pub parent: Option<NodeId>,
    /// Platforms this declaration was observed on.
    pub platforms: Platforms,
    /// Trimmed character content, for documentation elements.
    pub text: Option<String>,
    /// Per-platform native shared-library names, for namespaces.
    pub shared_libraries: Vec<(Platforms, String)>,
}

impl Element {
    /// Create an element with no children.
    pub fn new(kind: ElementKind, attributes: FxHashMap<String, String>) -> Self {
        Element {
            kind,
            attributes,
            children: Vec::new(),
            parent: None,
            platforms: Platforms::empty(),
            text: None,
            shared_libraries: Vec::new(),
        }
    }
}

/// Append-only arena holding every node of one document tree.
#[derive(Debug, Default, Clone)]
pub struct Tree {
    nodes: Vec<Element>,
}

impl Tree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes allocated in the arena, including nodes replaced
    /// by merged counterparts.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a node and return its id. The node's children must already
    /// be in this tree; their parent links are pointed at the new node.
    pub fn push(&mut self, element: Element) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let children = element.children.clone();
        self.nodes.push(element);
        for child in children {
            self.nodes[child.index()].parent = Some(id);
        }
        id
    }

    fn node(&self, id: NodeId) -> &Element {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Element {
        &mut self.nodes[id.index()]
    }

    /// Kind tag of a node.
    pub fn kind(&self, id: NodeId) -> ElementKind {
        self.node(id).kind
    }

    /// Ordered child list of a node.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Container of a node, `None` for the root.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Platform bitmask of a node.
    pub fn platforms(&self, id: NodeId) -> Platforms {
        self.node(id).platforms
    }

    /// Character content of a documentation node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.node(id).text.as_deref()
    }

    /// Per-platform shared-library table of a namespace node.
    pub fn shared_libraries(&self, id: NodeId) -> &[(Platforms, String)] {
        &self.node(id).shared_libraries
    }

    // === Attribute access ===

    /// Look up an attribute value. Unknown and missing keys are both
    /// simply absent; no validation happens at this layer.
    pub fn attr<'t>(&'t self, id: NodeId, key: &str) -> Option<&'t str> {
        self.node(id).attributes.get(key).map(String::as_str)
    }

    /// Full attribute map of a node.
    pub fn attributes(&self, id: NodeId) -> &FxHashMap<String, String> {
        &self.node(id).attributes
    }

    /// Look up an attribute as an integer.
    pub fn attr_int(&self, id: NodeId, key: &str) -> Option<i64> {
        self.attr(id, key).and_then(|v| v.parse().ok())
    }

    /// Look up a boolean attribute encoded as the sentinel string `"1"`.
    pub fn attr_bool(&self, id: NodeId, key: &str, default: bool) -> bool {
        match self.attr(id, key) {
            Some(value) => value == "1",
            None => default,
        }
    }

    // === Typed projections ===

    /// Children of a node with the given kind, in source order.
    pub fn children_of_kind(&self, id: NodeId, kind: ElementKind) -> impl Iterator<Item = NodeId> {
        self.node(id)
            .children
            .iter()
            .copied()
            .filter(move |&c| self.kind(c) == kind)
    }

    /// First child of a node with the given kind.
    pub fn find_child(&self, id: NodeId, kind: ElementKind) -> Option<NodeId> {
        self.children_of_kind(id, kind).next()
    }

    /// Nearest enclosing namespace node, including the node itself.
    pub fn namespace(&self, id: NodeId) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(node) = current {
            if self.kind(node) == ElementKind::Namespace {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }

    /// Borrowing handle for a node.
    pub fn get(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { tree: self, id }
    }

    // === Patch surface ===

    /// Set or replace an attribute.
    pub fn set_attr(&mut self, id: NodeId, key: impl Into<String>, value: impl Into<String>) {
        self.node_mut(id).attributes.insert(key.into(), value.into());
    }

    /// Remove an attribute.
    pub fn remove_attr(&mut self, id: NodeId, key: &str) {
        self.node_mut(id).attributes.remove(key);
    }

    /// Replace the platform bitmask of a node.
    pub fn set_platforms(&mut self, id: NodeId, platforms: Platforms) {
        self.node_mut(id).platforms = platforms;
    }

    /// Append a child node, fixing up its parent link.
    pub fn push_child(&mut self, parent: NodeId, child: NodeId) {
        self.node_mut(parent).children.push(child);
        self.node_mut(child).parent = Some(parent);
    }

    /// Keep only the children for which the predicate holds.
    pub fn retain_children(&mut self, id: NodeId, mut keep: impl FnMut(NodeRef<'_>) -> bool) {
        let children = std::mem::take(&mut self.node_mut(id).children);
        let kept: Vec<NodeId> = children
            .into_iter()
            .filter(|&c| keep(NodeRef { tree: self, id: c }))
            .collect();
        self.node_mut(id).children = kept;
    }

    // === Cross-tree operations ===

    /// Deep-copy a subtree from another tree into this one. The copy is
    /// returned unattached (no parent link).
    pub fn copy_from(&mut self, src: &Tree, id: NodeId) -> NodeId {
        let node = src.node(id);
        let children: Vec<NodeId> = node
            .children
            .iter()
            .map(|&c| self.copy_from(src, c))
            .collect();
        let mut copy = node.clone();
        copy.children = children;
        copy.parent = None;
        self.push(copy)
    }

    /// Whether two nodes, possibly in different trees, represent the same
    /// declaration for merge-matching purposes.
    ///
    /// Kinds must agree. Kinds that participate in merging compare by
    /// declared name alone; everything else compares identifying
    /// attributes and, recursively, the non-documentation children.
    pub fn same_declaration(&self, id: NodeId, other_tree: &Tree, other: NodeId) -> bool {
        let a = self.node(id);
        let b = other_tree.node(other);
        if a.kind != b.kind {
            return false;
        }
        if a.kind.merges_by_name() {
            return a.attributes.get("name") == b.attributes.get("name");
        }
        if !IDENTIFYING_ATTRS
            .iter()
            .all(|key| a.attributes.get(*key) == b.attributes.get(*key))
        {
            return false;
        }
        let ours: Vec<NodeId> = self.structural_children(id).collect();
        let theirs: Vec<NodeId> = other_tree.structural_children(other).collect();
        ours.len() == theirs.len()
            && ours
                .iter()
                .zip(&theirs)
                .all(|(&x, &y)| self.same_declaration(x, other_tree, y))
    }

    /// Children that count for structural comparison (documentation
    /// elements excluded).
    fn structural_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> {
        self.node(id)
            .children
            .iter()
            .copied()
            .filter(move |&c| !self.kind(c).is_documentation())
    }
}

/// Attributes that identify a declaration when comparing elements whose
/// identity is structural.
const IDENTIFYING_ATTRS: [&str; 4] = ["name", "type", "c:identifier", "c:type"];

/// Borrowing read-only handle for one node of a [`Tree`].
#[derive(Clone, Copy)]
pub struct NodeRef<'t> {
    tree: &'t Tree,
    id: NodeId,
}

impl<'t> NodeRef<'t> {
    /// Create a handle from a tree and node id.
    pub fn new(tree: &'t Tree, id: NodeId) -> Self {
        NodeRef { tree, id }
    }

    /// Id of this node.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The tree this node lives in.
    pub fn tree(&self) -> &'t Tree {
        self.tree
    }

    /// Kind tag.
    pub fn kind(&self) -> ElementKind {
        self.tree.kind(self.id)
    }

    /// Attribute lookup.
    pub fn attr(&self, key: &str) -> Option<&'t str> {
        self.tree.attr(self.id, key)
    }

    /// Integer attribute lookup.
    pub fn attr_int(&self, key: &str) -> Option<i64> {
        self.tree.attr_int(self.id, key)
    }

    /// Boolean attribute lookup (sentinel string `"1"`).
    pub fn attr_bool(&self, key: &str, default: bool) -> bool {
        self.tree.attr_bool(self.id, key, default)
    }

    /// Ordered children.
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'t>> {
        let tree = self.tree;
        tree.children(self.id)
            .iter()
            .map(move |&id| NodeRef { tree, id })
    }

    /// Children of one kind.
    pub fn children_of_kind(&self, kind: ElementKind) -> impl Iterator<Item = NodeRef<'t>> {
        let tree = self.tree;
        tree.children_of_kind(self.id, kind)
            .map(move |id| NodeRef { tree, id })
    }

    /// First child of one kind.
    pub fn find_child(&self, kind: ElementKind) -> Option<NodeRef<'t>> {
        let tree = self.tree;
        tree.find_child(self.id, kind).map(|id| NodeRef { tree, id })
    }

    /// Containing node.
    pub fn parent(&self) -> Option<NodeRef<'t>> {
        let tree = self.tree;
        tree.parent(self.id).map(|id| NodeRef { tree, id })
    }

    /// Nearest enclosing namespace.
    pub fn namespace(&self) -> Option<NodeRef<'t>> {
        let tree = self.tree;
        tree.namespace(self.id).map(|id| NodeRef { tree, id })
    }

    /// Platform bitmask.
    pub fn platforms(&self) -> Platforms {
        self.tree.platforms(self.id)
    }

    /// Character content of a documentation node.
    pub fn text(&self) -> Option<&'t str> {
        self.tree.text(self.id)
    }

    // === Domain accessors ===

    /// Declared name.
    pub fn name(&self) -> Option<&'t str> {
        self.attr("name")
    }

    /// Native type name.
    pub fn c_type(&self) -> Option<&'t str> {
        self.attr("c:type")
    }

    /// Native symbol name of a callable or member.
    pub fn c_identifier(&self) -> Option<&'t str> {
        self.attr("c:identifier")
    }

    /// Version the declaration was introduced in.
    pub fn version(&self) -> Option<&'t str> {
        self.attr("version")
    }

    /// Whether the declaration is marked deprecated.
    pub fn deprecated(&self) -> bool {
        self.attr_bool("deprecated", false)
    }

    /// Whether a callable can raise a native error.
    pub fn throws(&self) -> bool {
        self.attr_bool("throws", false)
    }

    /// Whether the declaration is introspectable (defaults to true).
    pub fn introspectable(&self) -> bool {
        self.attr_bool("introspectable", true)
    }

    /// Native identifier prefixes of a namespace (`c:identifier-prefixes`).
    pub fn c_identifier_prefixes(&self) -> Option<&'t str> {
        self.attr("c:identifier-prefixes")
    }

    /// Native symbol prefixes of a namespace (`c:symbol-prefixes`).
    pub fn c_symbol_prefixes(&self) -> Option<&'t str> {
        self.attr("c:symbol-prefixes")
    }

    /// Shared library name for one platform, for namespace nodes.
    pub fn shared_library(&self, platform: Platforms) -> Option<&'t str> {
        self.tree
            .shared_libraries(self.id)
            .iter()
            .find(|(p, _)| *p == platform)
            .map(|(_, lib)| lib.as_str())
    }

    /// Whether a record is layout-opaque: an explicit `opaque` attribute,
    /// or no fields and no nested unions at all.
    pub fn is_opaque(&self) -> bool {
        if self.attr("opaque").is_some() {
            return self.attr_bool("opaque", false);
        }
        self.find_child(ElementKind::Field).is_none()
            && self.find_child(ElementKind::Union).is_none()
    }
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("kind", &self.kind())
            .field("name", &self.name())
            .finish()
    }
}
