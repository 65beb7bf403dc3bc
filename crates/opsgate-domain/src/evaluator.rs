//! Snapshot-based permission evaluator.
//!
//! The evaluator is pure and synchronous: it holds an `Arc` snapshot of the
//! grant set taken when it was created and answers capability questions
//! against that snapshot. It never performs I/O and never mutates the set,
//! so every guard reading the same evaluator during one render pass observes
//! identical answers (no tearing between two guards on the same screen).

use std::sync::Arc;

use crate::permission::{EffectivePermissionSet, Permission};
use crate::requirement::CapabilityRequirement;

/// Pure, synchronous capability checks over a grant-set snapshot.
///
/// Cheap to clone; clones share the same snapshot.
#[derive(Debug, Clone)]
pub struct PermissionEvaluator {
    grants: Arc<EffectivePermissionSet>,
}

impl PermissionEvaluator {
    /// Creates an evaluator over a grant-set snapshot.
    pub fn new(grants: Arc<EffectivePermissionSet>) -> Self {
        Self { grants }
    }

    /// Returns the snapshot this evaluator answers against.
    pub fn grants(&self) -> &EffectivePermissionSet {
        &self.grants
    }

    /// True iff the permission is a member of the snapshot.
    pub fn has_permission(&self, permission: &Permission) -> bool {
        self.grants.contains(permission)
    }

    /// True iff the intersection of `list` and the snapshot is non-empty.
    ///
    /// An empty list evaluates to true (a vacuous "no restriction").
    pub fn has_any_permission(&self, list: &[Permission]) -> bool {
        list.is_empty() || list.iter().any(|p| self.grants.contains(p))
    }

    /// True iff `list` is a subset of the snapshot.
    ///
    /// An empty list evaluates to true.
    pub fn has_all_permissions(&self, list: &[Permission]) -> bool {
        list.iter().all(|p| self.grants.contains(p))
    }

    /// Evaluates a capability requirement against the snapshot.
    pub fn satisfies(&self, requirement: &CapabilityRequirement) -> bool {
        requirement.is_satisfied_by(&self.grants)
    }
}
