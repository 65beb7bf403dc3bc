//! The authorization facade consumed by guards and navigation.

use std::sync::Arc;

use opsgate_domain::{CapabilityRequirement, Permission, PermissionEvaluator};
use opsgate_store::{GrantSource, LoadState, PermissionStore};

/// Per-consumer handle bundling capability checks with the store's load
/// state.
///
/// Every check evaluates against the store's current snapshot and returns
/// `false` unless the state is `Loaded` - `NotLoaded`, `Loading`,
/// `FetchFailed`, and `Unauthorized` all fail closed.
pub struct Authorization<S: GrantSource> {
    store: Arc<PermissionStore<S>>,
}

impl<S: GrantSource> Clone for Authorization<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: GrantSource> Authorization<S> {
    /// Creates a handle over a shared store.
    pub fn new(store: Arc<PermissionStore<S>>) -> Self {
        Self { store }
    }

    /// The underlying store, for load and invalidation flows.
    pub fn store(&self) -> &Arc<PermissionStore<S>> {
        &self.store
    }

    /// The store's current load state.
    pub fn load_state(&self) -> LoadState {
        self.store.state()
    }

    /// The failure message when the state is `FetchFailed`, for UI
    /// messaging. `None` in every other state.
    pub fn error(&self) -> Option<String> {
        match self.store.state() {
            LoadState::FetchFailed { message } => Some(message),
            _ => None,
        }
    }

    /// An evaluator over the loaded snapshot, or `None` while unloaded.
    pub fn evaluator(&self) -> Option<PermissionEvaluator> {
        self.store.evaluator()
    }

    /// True iff the set is loaded and contains the permission.
    pub fn has_permission(&self, permission: &Permission) -> bool {
        self.evaluator()
            .is_some_and(|e| e.has_permission(permission))
    }

    /// True iff the set is loaded and intersects the list (empty list:
    /// true once loaded).
    pub fn has_any_permission(&self, list: &[Permission]) -> bool {
        self.evaluator().is_some_and(|e| e.has_any_permission(list))
    }

    /// True iff the set is loaded and contains every listed permission
    /// (empty list: true once loaded).
    pub fn has_all_permissions(&self, list: &[Permission]) -> bool {
        self.evaluator()
            .is_some_and(|e| e.has_all_permissions(list))
    }

    /// True iff the set is loaded and the requirement is satisfied.
    pub fn satisfies(&self, requirement: &CapabilityRequirement) -> bool {
        self.evaluator().is_some_and(|e| e.satisfies(requirement))
    }
}
