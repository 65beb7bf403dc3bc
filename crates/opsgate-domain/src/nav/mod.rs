//! Navigation tree, visibility resolution, and active-route expansion.
//!
//! The tree is an arena: nodes live in a flat `Vec` and refer to each other
//! by index, so there are no back-references, no incidental cycles, and the
//! visibility pass is trivially serializable for testing.
//!
//! Visibility ([`resolve_visible_navigation`]) and active-route expansion
//! ([`expanded_section_for`]) are deliberately separate functions: expansion
//! is pure UI state computed on the already-pruned tree, so a bug in it can
//! never widen what is rendered.

mod expansion;
mod tree;
mod visibility;

#[cfg(test)]
mod visibility_proptest;

pub use expansion::expanded_section_for;
pub use tree::{NavigationItem, NavigationNode, NavigationTree, NodeId};
pub use visibility::resolve_visible_navigation;
