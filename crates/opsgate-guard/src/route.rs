//! Page-level route guard with an explicit decision state machine.

use opsgate_domain::{CapabilityRequirement, Permission};
use opsgate_store::{GrantSource, LoadState, PermissionStore};
use tracing::debug;

use crate::authorization::Authorization;

/// Why a route was denied, for user-facing treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    /// The grant set is loaded and does not satisfy the requirement.
    NotPermitted,
    /// The session is expired or absent.
    Unauthorized,
    /// The grant fetch failed; the grants are unknown, not absent.
    FetchFailed,
}

/// Where to send the user on denial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectTarget {
    /// Re-authentication flow.
    Login,
    /// Access-denied page.
    AccessDenied,
    /// Stay in place and offer a retry.
    Retry,
}

/// Outcome of a route check.
///
/// `Allowed` carries the store generation it was decided at, so a router
/// can tell a decision predating an invalidation from a current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// The grant set is not known yet; render a loading surface, never the
    /// protected page.
    Loading,
    /// The route may render. Valid only while the store stays at
    /// `generation`.
    Allowed { generation: u64 },
    /// The route must not render.
    Denied {
        reason: DenialReason,
        redirect: RedirectTarget,
    },
}

impl RouteDecision {
    /// True iff the route may render right now.
    pub fn allows(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// True iff this decision is still valid against the store.
    ///
    /// Only `Allowed` at the store's current generation counts: a decision
    /// taken before an `invalidate()` must be re-evaluated, never trusted.
    pub fn is_current<S: GrantSource>(&self, store: &PermissionStore<S>) -> bool {
        match self {
            Self::Allowed { generation } => *generation == store.generation(),
            _ => false,
        }
    }
}

/// Gates an entire route behind a capability requirement.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    requirement: CapabilityRequirement,
}

impl RouteGuard {
    /// Guards a route behind `requirement`.
    pub fn new(requirement: CapabilityRequirement) -> Self {
        Self { requirement }
    }

    /// Guards a route behind a single permission.
    pub fn single(permission: Permission) -> Self {
        Self::new(CapabilityRequirement::Single(permission))
    }

    /// The requirement this guard enforces.
    pub fn requirement(&self) -> &CapabilityRequirement {
        &self.requirement
    }

    /// Decides the route against the store's current snapshot.
    ///
    /// The snapshot pairs state and generation atomically, so an `Allowed`
    /// decision is pinned to the generation its grant set belonged to.
    pub fn check<S: GrantSource>(&self, authz: &Authorization<S>) -> RouteDecision {
        let snapshot = authz.store().snapshot();
        let decision = match snapshot.state {
            LoadState::NotLoaded | LoadState::Loading => RouteDecision::Loading,
            LoadState::Unauthorized => RouteDecision::Denied {
                reason: DenialReason::Unauthorized,
                redirect: RedirectTarget::Login,
            },
            LoadState::FetchFailed { .. } => RouteDecision::Denied {
                reason: DenialReason::FetchFailed,
                redirect: RedirectTarget::Retry,
            },
            LoadState::Loaded(set) => {
                if self.requirement.is_satisfied_by(&set) {
                    RouteDecision::Allowed {
                        generation: snapshot.generation,
                    }
                } else {
                    RouteDecision::Denied {
                        reason: DenialReason::NotPermitted,
                        redirect: RedirectTarget::AccessDenied,
                    }
                }
            }
        };
        debug!(?decision, "route checked");
        decision
    }

    /// Triggers a load when nothing has been fetched yet, then decides.
    ///
    /// Concurrent route entries coalesce onto one fetch; a previously
    /// failed fetch is not retried here.
    pub async fn check_and_load<S: GrantSource>(&self, authz: &Authorization<S>) -> RouteDecision {
        authz.store().load_if_needed().await;
        self.check(authz)
    }
}
