//! Arena-backed navigation tree.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::requirement::CapabilityRequirement;

/// Index of a node within its [`NavigationTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    /// Returns the raw arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A single entry in the navigation tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationNode {
    /// Stable identifier (e.g. "billing", "platform-admin").
    pub id: String,
    /// Display label.
    pub label: String,
    /// Route target, if this entry navigates somewhere. Grouping sections
    /// may have none.
    pub target: Option<String>,
    /// Capability requirement gating this entry. `None` means unrestricted.
    pub requirement: Option<CapabilityRequirement>,
    /// Child node indices, in declaration order.
    pub children: Vec<NodeId>,
}

/// Declaration of a navigation entry, used when building a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationItem {
    pub id: String,
    pub label: String,
    pub target: Option<String>,
    pub requirement: Option<CapabilityRequirement>,
}

impl NavigationItem {
    /// Creates an unrestricted item with no route target.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            target: None,
            requirement: None,
        }
    }

    /// Sets the route target.
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Sets the capability requirement.
    pub fn with_requirement(mut self, requirement: CapabilityRequirement) -> Self {
        self.requirement = Some(requirement);
        self
    }
}

/// A static, pre-declared navigation tree.
///
/// Nodes are stored in a flat arena and addressed by [`NodeId`]; parent and
/// child relationships are integer indices rather than object references.
/// The tree is built once at declaration time and is not user-editable at
/// runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationTree {
    nodes: Vec<NavigationNode>,
    roots: Vec<NodeId>,
}

impl NavigationTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a top-level entry, returning its id.
    pub fn add_root(&mut self, item: NavigationItem) -> NodeId {
        let id = self.push(item);
        self.roots.push(id);
        id
    }

    /// Appends a child under `parent`, returning the child's id.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnknownNode`] if `parent` does not belong to
    /// this tree.
    pub fn add_child(&mut self, parent: NodeId, item: NavigationItem) -> DomainResult<NodeId> {
        if parent.0 >= self.nodes.len() {
            return Err(DomainError::UnknownNode { index: parent.0 });
        }
        let id = self.push(item);
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    fn push(&mut self, item: NavigationItem) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NavigationNode {
            id: item.id,
            label: item.label,
            target: item.target,
            requirement: item.requirement,
            children: Vec::new(),
        });
        id
    }

    /// Returns the node for an id, or `None` if the id is out of range.
    pub fn node(&self, id: NodeId) -> Option<&NavigationNode> {
        self.nodes.get(id.0)
    }

    /// Top-level entries in declaration order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Total number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True iff the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Stable node identifiers in depth-first declaration order.
    ///
    /// Useful for comparing trees structurally in tests.
    pub fn ids_in_order(&self) -> Vec<&str> {
        let mut out = Vec::with_capacity(self.nodes.len());
        for &root in &self.roots {
            self.collect_ids(root, &mut out);
        }
        out
    }

    fn collect_ids<'a>(&'a self, id: NodeId, out: &mut Vec<&'a str>) {
        let node = &self.nodes[id.0];
        out.push(node.id.as_str());
        for &child in &node.children {
            self.collect_ids(child, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permission::Permission;

    #[test]
    fn test_build_and_look_up_nodes() {
        let mut tree = NavigationTree::new();
        let billing = tree.add_root(NavigationItem::new("billing", "Billing"));
        let invoices = tree
            .add_child(
                billing,
                NavigationItem::new("invoices", "Invoices").with_target("/billing/invoices"),
            )
            .unwrap();

        assert_eq!(tree.len(), 2);
        assert_eq!(tree.roots(), &[billing]);
        assert_eq!(tree.node(billing).unwrap().children, vec![invoices]);
        assert_eq!(
            tree.node(invoices).unwrap().target.as_deref(),
            Some("/billing/invoices")
        );
    }

    #[test]
    fn test_add_child_rejects_foreign_node_id() {
        let mut other = NavigationTree::new();
        other.add_root(NavigationItem::new("a", "A"));
        let foreign = other.add_root(NavigationItem::new("b", "B"));

        let mut tree = NavigationTree::new();
        tree.add_root(NavigationItem::new("only", "Only"));
        let err = tree
            .add_child(foreign, NavigationItem::new("c", "C"))
            .unwrap_err();
        assert!(matches!(err, crate::DomainError::UnknownNode { index: 1 }));
    }

    #[test]
    fn test_declaration_order_is_preserved() {
        let mut tree = NavigationTree::new();
        let a = tree.add_root(NavigationItem::new("a", "A"));
        tree.add_child(a, NavigationItem::new("a1", "A1")).unwrap();
        tree.add_child(a, NavigationItem::new("a2", "A2")).unwrap();
        tree.add_root(NavigationItem::new("b", "B"));

        assert_eq!(tree.ids_in_order(), vec!["a", "a1", "a2", "b"]);
    }

    #[test]
    fn test_item_builder() {
        let item = NavigationItem::new("tickets", "Tickets")
            .with_target("/tickets")
            .with_requirement(CapabilityRequirement::Single(
                Permission::new("tickets.read").unwrap(),
            ));
        assert_eq!(item.target.as_deref(), Some("/tickets"));
        assert!(item.requirement.is_some());
    }
}
