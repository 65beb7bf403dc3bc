//! Capability requirements: boolean expressions over permission names.

use serde::{Deserialize, Serialize};

use crate::permission::{EffectivePermissionSet, Permission};

/// The expression a caller must satisfy to see a gated feature.
///
/// Empty `AnyOf`/`AllOf` lists are vacuously true: they express "no
/// restriction", matching the navigation default-show rule for nodes that
/// declare no requirement at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapabilityRequirement {
    /// Satisfied iff the single permission is granted.
    Single(Permission),
    /// Satisfied iff at least one listed permission is granted.
    AnyOf(Vec<Permission>),
    /// Satisfied iff every listed permission is granted.
    AllOf(Vec<Permission>),
}

impl CapabilityRequirement {
    /// Evaluates the requirement against a grant set.
    pub fn is_satisfied_by(&self, grants: &EffectivePermissionSet) -> bool {
        match self {
            Self::Single(permission) => grants.contains(permission),
            Self::AnyOf(list) => list.is_empty() || list.iter().any(|p| grants.contains(p)),
            Self::AllOf(list) => list.iter().all(|p| grants.contains(p)),
        }
    }
}
