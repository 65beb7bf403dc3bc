//! Auto-expansion of the section containing the active route.
//!
//! This is a pure UI-state concern layered after visibility resolution: it
//! is always computed on the already-pruned tree and never influences which
//! nodes are visible.

use super::tree::{NavigationTree, NodeId};

/// Returns the ancestor chain (root first, active node last) of the first
/// node in declaration order whose target matches `active_target`.
///
/// Call this with the output of
/// [`resolve_visible_navigation`](super::resolve_visible_navigation); the
/// caller expands the non-leaf entries of the returned path. Returns an
/// empty path when no visible node targets the active route.
pub fn expanded_section_for(tree: &NavigationTree, active_target: &str) -> Vec<NodeId> {
    let mut path = Vec::new();
    for &root in tree.roots() {
        if find_path(tree, root, active_target, &mut path) {
            return path;
        }
    }
    Vec::new()
}

fn find_path(
    tree: &NavigationTree,
    id: NodeId,
    active_target: &str,
    path: &mut Vec<NodeId>,
) -> bool {
    let Some(node) = tree.node(id) else {
        return false;
    };
    path.push(id);
    if node.target.as_deref() == Some(active_target) {
        return true;
    }
    for &child in &node.children {
        if find_path(tree, child, active_target, path) {
            return true;
        }
    }
    path.pop();
    false
}
