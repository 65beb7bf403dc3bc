//! Visibility resolution: deriving the visible subset of a navigation tree.

use crate::evaluator::PermissionEvaluator;

use super::tree::{NavigationItem, NavigationTree, NodeId};

/// Derives the visible subset of a static navigation tree.
///
/// Visibility is computed post-order: a node's children are resolved first,
/// then the node itself is visible iff
///
/// - its requirement is satisfied, or
/// - it declares no requirement and is a leaf (navigation is "show unless
///   restricted"), or
/// - at least one of its children is visible.
///
/// A grouping section with no requirement of its own and no visible children
/// is pruned: it has nothing to offer and would otherwise leak the existence
/// of restricted destinations.
///
/// Invisible nodes are removed from the output arena entirely, not flagged,
/// so hidden targets cannot be discovered by inspecting the result. Output
/// order matches declaration order, and repeated calls with an unchanged
/// `(tree, evaluator)` pair produce identical output.
pub fn resolve_visible_navigation(
    tree: &NavigationTree,
    evaluator: &PermissionEvaluator,
) -> NavigationTree {
    let mut memo = vec![None; tree.len()];
    for &root in tree.roots() {
        compute_visibility(tree, root, evaluator, &mut memo);
    }

    let mut out = NavigationTree::new();
    for &root in tree.roots() {
        if memo[root.index()] == Some(true) {
            copy_visible(tree, root, &memo, &mut out, None);
        }
    }
    out
}

/// Post-order visibility computation. Evaluates all children (no
/// short-circuit) so the memo is complete for the copy pass.
fn compute_visibility(
    tree: &NavigationTree,
    id: NodeId,
    evaluator: &PermissionEvaluator,
    memo: &mut Vec<Option<bool>>,
) -> bool {
    // Node ids are produced by the arena, so out-of-range ids cannot occur
    // here; resolve them to invisible rather than panicking.
    if id.index() >= tree.len() {
        return false;
    }
    if let Some(known) = memo[id.index()] {
        return known;
    }
    let Some(node) = tree.node(id) else {
        return false;
    };

    let mut any_child_visible = false;
    for &child in &node.children {
        if compute_visibility(tree, child, evaluator, memo) {
            any_child_visible = true;
        }
    }

    let own = match &node.requirement {
        Some(requirement) => evaluator.satisfies(requirement),
        // Unrestricted leaves show by default; unrestricted sections derive
        // visibility from their children.
        None => node.children.is_empty(),
    };

    let visible = own || any_child_visible;
    memo[id.index()] = Some(visible);
    visible
}

/// Copies a visible node (and its visible descendants) into the output
/// arena, preserving declaration order.
fn copy_visible(
    tree: &NavigationTree,
    id: NodeId,
    memo: &[Option<bool>],
    out: &mut NavigationTree,
    parent: Option<NodeId>,
) {
    let Some(node) = tree.node(id) else {
        return;
    };

    let mut item = NavigationItem::new(node.id.clone(), node.label.clone());
    item.target = node.target.clone();
    item.requirement = node.requirement.clone();

    let copied = match parent {
        None => out.add_root(item),
        // The parent id was just produced by `out`, so this cannot fail.
        Some(parent) => match out.add_child(parent, item) {
            Ok(copied) => copied,
            Err(_) => return,
        },
    };

    for &child in &node.children {
        if memo[child.index()] == Some(true) {
            copy_visible(tree, child, memo, out, Some(copied));
        }
    }
}
