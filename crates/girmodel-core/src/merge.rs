//! Multi-platform merge engine.
//!
//! When a parse pass encounters a declaration that already exists in the
//! previously merged tree, the two are combined into one node carrying the
//! union of both sides. The policy is defined per kind and is total: every
//! mergeable pair produces a result, conflicts are resolved by the rules
//! below rather than reported.
//!
//! Merging never mutates either input. The unified node is freshly
//! allocated in the tree under construction, so the incoming node and the
//! (copied) existing node both remain valid.

use crate::{Element, ElementKind, NodeId, Platforms, Tree};

/// Combine an existing node (in the prior merged tree) with an incoming
/// node (freshly parsed into `tree`) that represent the same declaration.
///
/// Returns the id of the unified node in `tree`. Callers are expected to
/// pass a namespace or registered-type pair of the same kind; a kind
/// mismatch (malformed input) returns the incoming node unchanged.
pub fn merge(tree: &mut Tree, incoming: NodeId, prior: &Tree, existing: NodeId) -> NodeId {
    let kind = tree.kind(incoming);
    if prior.kind(existing) != kind {
        return incoming;
    }
    match kind {
        // Callbacks are not platform-sensitive: the existing declaration
        // stands.
        ElementKind::Callback => tree.copy_from(prior, existing),
        ElementKind::Record => merge_record(tree, incoming, prior, existing),
        ElementKind::Namespace => merge_namespace(tree, incoming, prior, existing),
        _ if kind.is_registered_type() => merge_union(tree, incoming, prior, existing),
        _ => incoming,
    }
}

/// Generic policy: union of children, OR of platform bitmasks, incoming
/// (last-parsed) attributes win.
fn merge_union(tree: &mut Tree, incoming: NodeId, prior: &Tree, existing: NodeId) -> NodeId {
    let children = union_children(tree, incoming, prior, existing);
    let shared = tree.shared_libraries(incoming).to_vec();
    build_merged(tree, incoming, prior, existing, children, shared)
}

/// Namespace policy: the generic union plus the per-platform
/// shared-library table union.
fn merge_namespace(tree: &mut Tree, incoming: NodeId, prior: &Tree, existing: NodeId) -> NodeId {
    let children = union_children(tree, incoming, prior, existing);

    let mut shared: Vec<(Platforms, String)> = prior.shared_libraries(existing).to_vec();
    for (platform, library) in tree.shared_libraries(incoming).to_vec() {
        match shared.iter_mut().find(|(p, _)| *p == platform) {
            Some(entry) => entry.1 = library,
            None => shared.push((platform, library)),
        }
    }

    build_merged(tree, incoming, prior, existing, children, shared)
}

/// Record policy: if the two field lists are not element-wise equal, the
/// merged record keeps no fields at all, so no per-field accessor can be
/// generated against a layout that differs between platforms.
fn merge_record(tree: &mut Tree, incoming: NodeId, prior: &Tree, existing: NodeId) -> NodeId {
    let incoming_fields: Vec<NodeId> = tree
        .children_of_kind(incoming, ElementKind::Field)
        .collect();
    let existing_fields: Vec<NodeId> = prior
        .children_of_kind(existing, ElementKind::Field)
        .collect();

    let fields_equal = incoming_fields.len() == existing_fields.len()
        && incoming_fields
            .iter()
            .zip(&existing_fields)
            .all(|(&inc, &ex)| tree.same_declaration(inc, prior, ex));

    let mut children = union_children(tree, incoming, prior, existing);
    if !fields_equal {
        children.retain(|&c| tree.kind(c) != ElementKind::Field);
    }
    let shared = tree.shared_libraries(incoming).to_vec();
    build_merged(tree, incoming, prior, existing, children, shared)
}

/// Allocate the unified node: incoming attributes, OR'd platform bitmask,
/// the given child list.
fn build_merged(
    tree: &mut Tree,
    incoming: NodeId,
    prior: &Tree,
    existing: NodeId,
    children: Vec<NodeId>,
    shared_libraries: Vec<(Platforms, String)>,
) -> NodeId {
    let kind = tree.kind(incoming);
    let mut element = Element::new(kind, tree.attributes(incoming).clone());
    element.platforms = tree.platforms(incoming) | prior.platforms(existing);
    element.text = tree.text(incoming).map(str::to_owned);
    element.shared_libraries = shared_libraries;
    element.children = children;
    tree.push(element)
}

/// Union of the two child lists.
///
/// The existing side's order is preserved; an incoming child matching an
/// existing one takes that child's position (the incoming side has already
/// been merged node-by-node during parsing, so it is the one to keep), and
/// genuinely new incoming children are appended after, in source order.
fn union_children(tree: &mut Tree, incoming: NodeId, prior: &Tree, existing: NodeId) -> Vec<NodeId> {
    let incoming_children: Vec<NodeId> = tree.children(incoming).to_vec();
    let existing_children: Vec<NodeId> = prior.children(existing).to_vec();

    let mut used = vec![false; incoming_children.len()];
    let mut result = Vec::with_capacity(existing_children.len() + incoming_children.len());

    for &ex in &existing_children {
        let matched = incoming_children.iter().enumerate().find(|&(i, &inc)| {
            !used[i] && tree.same_declaration(inc, prior, ex)
        });
        match matched {
            Some((i, &inc)) => {
                used[i] = true;
                result.push(inc);
            }
            None => result.push(tree.copy_from(prior, ex)),
        }
    }
    for (i, &inc) in incoming_children.iter().enumerate() {
        if !used[i] {
            result.push(inc);
        }
    }
    result
}
