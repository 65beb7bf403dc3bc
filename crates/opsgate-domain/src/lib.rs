//! opsgate-domain: Pure permission evaluation and navigation visibility core
//!
//! This crate contains the synchronous, I/O-free half of the access-control
//! core:
//! - Permission tokens and the effective grant set
//! - Capability requirements (single / any-of / all-of)
//! - The permission evaluator
//! - The navigation arena and visibility resolution
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               opsgate-domain                │
//! ├─────────────────────────────────────────────┤
//! │  permission/  - Tokens & effective grants   │
//! │  requirement/ - Capability expressions      │
//! │  evaluator/   - Snapshot-based checks       │
//! │  nav/         - Arena, visibility, expand   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Everything here is pure: readers never mutate the grant set, and the
//! visibility pass is deterministic for a fixed `(tree, evaluator)` pair.

pub mod error;
pub mod evaluator;
pub mod nav;
pub mod permission;
pub mod requirement;

// Re-export commonly used types at the crate root
pub use error::{DomainError, DomainResult};
pub use evaluator::PermissionEvaluator;
pub use nav::{
    expanded_section_for, resolve_visible_navigation, NavigationItem, NavigationNode,
    NavigationTree, NodeId,
};
pub use permission::{EffectivePermissionSet, Permission};
pub use requirement::CapabilityRequirement;
