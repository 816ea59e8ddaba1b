//! Tree patches.
//!
//! Patches are externally supplied rewrite rules applied to every freshly
//! parsed node before it is merged or attached, so that merge matching
//! sees the corrected shape. A patch receives the enclosing namespace name
//! and is expected to use it to scope itself; most patches do nothing for
//! most nodes.

use crate::{NodeId, Tree};

/// A single rewrite rule over freshly constructed nodes.
pub trait Patch {
    /// Rewrite one node in place. `namespace` is the declared name of the
    /// enclosing namespace, when one has been entered.
    fn apply(&self, tree: &mut Tree, node: NodeId, namespace: Option<&str>);
}

impl<F> Patch for F
where
    F: Fn(&mut Tree, NodeId, Option<&str>),
{
    fn apply(&self, tree: &mut Tree, node: NodeId, namespace: Option<&str>) {
        self(tree, node, namespace)
    }
}
