//! Element-level guard: show content, a fallback, or nothing.

use opsgate_domain::{CapabilityRequirement, Permission};
use opsgate_store::GrantSource;

use crate::authorization::Authorization;

/// Wraps a piece of content behind a capability requirement.
///
/// `render` yields the content only when the requirement is satisfied by a
/// loaded grant set. In every other case - including `Loading` and fetch
/// failures - it yields the fallback, or nothing when no fallback was set.
/// There is no loading variant at the element level: a button that flickers
/// in and out during load is worse than one that appears once.
#[derive(Debug, Clone)]
pub struct Can<T> {
    requirement: CapabilityRequirement,
    content: T,
    fallback: Option<T>,
}

impl<T> Can<T> {
    /// Guards `content` behind `requirement`.
    pub fn new(requirement: CapabilityRequirement, content: T) -> Self {
        Self {
            requirement,
            content,
            fallback: None,
        }
    }

    /// Guards `content` behind a single permission.
    pub fn single(permission: Permission, content: T) -> Self {
        Self::new(CapabilityRequirement::Single(permission), content)
    }

    /// Sets what to show when the requirement is not satisfied, such as a
    /// disabled control or an upsell notice.
    pub fn with_fallback(mut self, fallback: T) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// The requirement this guard enforces.
    pub fn requirement(&self) -> &CapabilityRequirement {
        &self.requirement
    }

    /// Resolves the guard against the current authorization state.
    pub fn render<S: GrantSource>(&self, authz: &Authorization<S>) -> Option<&T> {
        if authz.satisfies(&self.requirement) {
            Some(&self.content)
        } else {
            self.fallback.as_ref()
        }
    }
}
