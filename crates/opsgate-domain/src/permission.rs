//! Permission tokens and the effective grant set.
//!
//! Permissions are opaque, case-sensitive string identifiers (e.g.
//! `billing.read`, `platform:admin`) matched exactly - no wildcard or
//! hierarchical interpretation. Validation happens once at construction;
//! everything downstream can treat a [`Permission`] as well-formed.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// An opaque, case-sensitive permission token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(String);

impl Permission {
    /// Creates a new permission token, validating the format.
    ///
    /// Tokens must be non-empty and contain no whitespace or control
    /// characters. No pattern interpretation is applied beyond that.
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(DomainError::InvalidPermission {
                value,
                reason: "permission cannot be empty",
            });
        }
        if value.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidPermission {
                value,
                reason: "permission cannot contain whitespace",
            });
        }
        if value.chars().any(char::is_control) {
            return Err(DomainError::InvalidPermission {
                value,
                reason: "permission cannot contain control characters",
            });
        }
        Ok(Self(value))
    }

    /// Returns the permission token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The flattened set of permissions held by a principal at a point in time.
///
/// The set is immutable once built: readers only test membership, and the
/// owning store replaces the whole set atomically (never patches it), so no
/// reader can observe a partially updated set.
///
/// # Performance
///
/// Backed by a `HashSet`, so membership checks are O(1) amortized - never a
/// linear scan per check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectivePermissionSet {
    grants: HashSet<Permission>,
}

impl EffectivePermissionSet {
    /// Creates an empty grant set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a set from already-validated permissions.
    pub fn from_permissions(permissions: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            grants: permissions.into_iter().collect(),
        }
    }

    /// Builds a set from raw grant names, validating every record.
    ///
    /// The whole payload is rejected if any record is malformed: silently
    /// dropping a record would be indistinguishable from a revocation.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MalformedGrant`] naming the offending record's
    /// index.
    pub fn from_names<I, S>(names: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut grants = HashSet::new();
        for (index, name) in names.into_iter().enumerate() {
            let permission =
                Permission::new(name).map_err(|e| DomainError::MalformedGrant {
                    index,
                    reason: e.to_string(),
                })?;
            grants.insert(permission);
        }
        Ok(Self { grants })
    }

    /// Returns true iff the permission is a member of the set.
    pub fn contains(&self, permission: &Permission) -> bool {
        self.grants.contains(permission)
    }

    /// Returns the number of distinct grants in the set.
    pub fn len(&self) -> usize {
        self.grants.len()
    }

    /// Returns true iff the principal holds no grants at all.
    ///
    /// Distinct from a failed or missing fetch: an empty set is a loaded,
    /// authoritative answer.
    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }

    /// Iterates over the grants in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.grants.iter()
    }
}
