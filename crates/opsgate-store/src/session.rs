//! Principal session lifecycle.
//!
//! A session ties the authenticated principal to its own permission store:
//! login constructs the pair, tenant switches and role edits invalidate the
//! store, and logout tears it down. The store is injected rather than
//! ambient, so multiple simulated principals can coexist in one process.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use crate::store::{LoadState, PermissionStore};
use crate::traits::GrantSource;

/// The authenticated actor plus the generation-tracked store for its
/// effective permission set.
///
/// Lifecycle: `login` → (fetch) → \[invalidate → refetch\]* → `logout`.
pub struct PrincipalSession<S: GrantSource> {
    principal: String,
    tenant: RwLock<Option<String>>,
    store: Arc<PermissionStore<S>>,
}

impl<S: GrantSource> PrincipalSession<S> {
    /// Starts a session for a principal, with a fresh store over the given
    /// grant source.
    pub fn login(principal: impl Into<String>, source: S) -> Self {
        let principal = principal.into();
        info!(principal = %principal, "session started");
        Self {
            principal,
            tenant: RwLock::new(None),
            store: PermissionStore::new_shared(source),
        }
    }

    /// The authenticated principal this session belongs to.
    pub fn principal(&self) -> &str {
        &self.principal
    }

    /// The tenant currently being operated on, if any.
    pub fn tenant(&self) -> Option<String> {
        self.tenant
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The session's permission store, shareable with guards and other
    /// consumers. Teardown lives in the store itself (`close()`), so a
    /// guard driving this handle directly cannot fetch past logout.
    pub fn store(&self) -> &Arc<PermissionStore<S>> {
        &self.store
    }

    /// Loads the grant set, refusing with `Unauthorized` once the session
    /// has ended (no network call is made in that case).
    pub async fn load(&self) -> LoadState {
        self.store.load().await
    }

    /// Switches the active tenant and invalidates the store so subsequent
    /// checks reflect the new tenant's grants.
    pub fn switch_tenant(&self, tenant: impl Into<String>) {
        let tenant = tenant.into();
        info!(principal = %self.principal, tenant = %tenant, "tenant switch");
        *self
            .tenant
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(tenant);
        self.store.invalidate();
    }

    /// Signals that an admin edited this principal's roles; invalidates the
    /// store so the next check refetches instead of trusting the cache.
    pub fn role_changed(&self) {
        info!(principal = %self.principal, "role change signalled");
        self.store.invalidate();
    }

    /// Ends the session: the store is closed, the cached set is cleared,
    /// and further loads refuse with `Unauthorized` - including loads via
    /// guards holding the store handle directly.
    pub fn logout(&self) {
        info!(principal = %self.principal, "session ended");
        self.store.close();
    }

    /// True once `logout` has been called.
    pub fn is_ended(&self) -> bool {
        self.store.is_closed()
    }
}
