//! The permission store: load-state machine, coalescing, and invalidation.
//!
//! # State machine
//!
//! ```text
//! NotLoaded ──load()──► Loading ──► Loaded(set)
//!     ▲                    │    ├──► FetchFailed
//!     │                    │    └──► Unauthorized
//!     └──── invalidate() ──┴──────────────┘
//!
//! `close()` (logout) is terminal: the state becomes `Unauthorized` and no
//! entry point issues a fetch again.
//! ```
//!
//! # Staleness
//!
//! Every `invalidate()` bumps a monotone generation counter. A fetch
//! snapshots the generation when it starts; if the counter has moved by the
//! time the response arrives, the response is discarded - a logout or role
//! edit mid-request can never resurrect the old grants.
//!
//! # Metrics
//!
//! - `opsgate_grants_fetch_total` - fetches actually issued to the source
//! - `opsgate_grants_fetch_coalesced_total` - callers served by an
//!   already-in-flight fetch
//! - `opsgate_grants_stale_discarded_total` - responses discarded by the
//!   generation guard
//! - `opsgate_store_invalidations_total` - explicit invalidations

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use opsgate_domain::{EffectivePermissionSet, PermissionEvaluator};
use tracing::{debug, info, warn};

use crate::error::FetchError;
use crate::singleflight::{FlightGuard, FlightSlot, Singleflight};
use crate::traits::GrantSource;

/// Load state of the principal's grant set.
///
/// `NotLoaded`, `FetchFailed`, and `Unauthorized` are all fail-closed: no
/// protected content may render while in any of them. They differ only in
/// user-facing treatment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// Fetch not yet attempted.
    NotLoaded,
    /// A fetch is in flight.
    Loading,
    /// The grant set is loaded and authoritative.
    Loaded(Arc<EffectivePermissionSet>),
    /// Transport or server error; a retry affordance should be shown.
    FetchFailed { message: String },
    /// The session is expired or absent; re-authentication is required.
    Unauthorized,
}

impl LoadState {
    /// True iff a loaded, authoritative grant set is available.
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    /// True for every state in which guards must refuse to render
    /// protected content. Unknown is never allowed.
    pub fn is_fail_closed(&self) -> bool {
        !self.is_loaded()
    }
}

/// A consistent view of the store: the state together with the generation
/// it was observed at.
#[derive(Debug, Clone)]
pub struct StoreSnapshot {
    pub generation: u64,
    pub state: LoadState,
}

/// Single source of truth for "what can this principal currently do".
///
/// The store is an explicit, injectable object: each principal session owns
/// its own instance, so tests can run multiple simulated principals
/// concurrently without cross-contamination.
pub struct PermissionStore<S: GrantSource> {
    source: Arc<S>,
    state: RwLock<LoadState>,
    /// Bumped by every invalidation; distinguishes successive fetches.
    generation: AtomicU64,
    /// Set by [`close`](Self::close); a closed store never fetches again.
    closed: AtomicBool,
    flight: Singleflight<LoadState>,
}

impl<S: GrantSource> std::fmt::Debug for PermissionStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionStore")
            .field("state", &self.state())
            .field("generation", &self.generation())
            .finish()
    }
}

impl<S: GrantSource> PermissionStore<S> {
    /// Creates a store over a grant source.
    pub fn new(source: S) -> Self {
        Self {
            source: Arc::new(source),
            state: RwLock::new(LoadState::NotLoaded),
            generation: AtomicU64::new(0),
            closed: AtomicBool::new(false),
            flight: Singleflight::new(),
        }
    }

    /// Creates a store wrapped in `Arc`, the usual sharing shape.
    pub fn new_shared(source: S) -> Arc<Self> {
        Arc::new(Self::new(source))
    }

    /// Returns the current load state.
    ///
    /// All readers between two store mutations observe the same `Arc`
    /// snapshot; the set itself is never patched in place.
    pub fn state(&self) -> LoadState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the current generation.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Returns the state together with the generation it was observed at.
    pub fn snapshot(&self) -> StoreSnapshot {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        StoreSnapshot {
            generation: self.generation.load(Ordering::Acquire),
            state: state.clone(),
        }
    }

    /// Returns an evaluator over the loaded grant set, or `None` while the
    /// state is anything other than `Loaded`.
    pub fn evaluator(&self) -> Option<PermissionEvaluator> {
        match self.state() {
            LoadState::Loaded(set) => Some(PermissionEvaluator::new(set)),
            _ => None,
        }
    }

    /// Fetches the grant set, coalescing concurrent callers onto one
    /// in-flight request.
    ///
    /// The returned state is also the store's new state, unless an
    /// `invalidate()` raced the fetch - then the response is discarded and
    /// the post-invalidation state is returned instead.
    #[tracing::instrument(skip_all)]
    pub async fn load(&self) -> LoadState {
        if self.is_closed() {
            return LoadState::Unauthorized;
        }
        match self.flight.acquire() {
            FlightSlot::Follower(mut rx) => {
                metrics::counter!("opsgate_grants_fetch_coalesced_total").increment(1);
                match rx.recv().await {
                    Ok(state) => state,
                    // Leader dropped without sending; report whatever the
                    // store holds now.
                    Err(_) => self.state(),
                }
            }
            FlightSlot::Leader(tx) => {
                let guard = FlightGuard::new(&self.flight);
                let state = self.load_as_leader().await;
                let _ = tx.send(state.clone());
                guard.complete();
                state
            }
        }
    }

    /// Fetches only when the state is `NotLoaded`; otherwise returns the
    /// current state. Failed fetches are not retried here - retry is an
    /// explicit user action via [`load`](Self::load).
    pub async fn load_if_needed(&self) -> LoadState {
        match self.state() {
            LoadState::NotLoaded => self.load().await,
            other => other,
        }
    }

    /// Clears the cached set and resets the state to `NotLoaded`.
    ///
    /// To be called on logout, tenant switch, impersonation, or an admin
    /// role edit affecting the current principal. Any fetch in flight is
    /// invalidated: its response will be discarded on arrival.
    pub fn invalidate(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        // A closed store stays terminal; NotLoaded would read as "retryable".
        *state = if self.is_closed() {
            LoadState::Unauthorized
        } else {
            LoadState::NotLoaded
        };
        drop(state);

        metrics::counter!("opsgate_store_invalidations_total").increment(1);
        info!(generation, "permission store invalidated");
    }

    /// Permanently closes the store: the cached set is cleared, the state
    /// becomes `Unauthorized`, and no further fetches are issued from any
    /// entry point. Any response still in flight is discarded on arrival.
    ///
    /// To be called on logout. Unlike [`invalidate`](Self::invalidate),
    /// closing is terminal: the store cannot be reopened.
    pub fn close(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        self.closed.store(true, Ordering::Release);
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        *state = LoadState::Unauthorized;
        drop(state);

        info!(generation, "permission store closed");
    }

    /// True once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    async fn load_as_leader(&self) -> LoadState {
        let generation = self.begin_load();
        metrics::counter!("opsgate_grants_fetch_total").increment(1);

        let fetched = self.source.fetch_grants().await;

        let next = match fetched {
            Ok(records) => {
                let names = records.into_iter().map(|r| r.name);
                match EffectivePermissionSet::from_names(names) {
                    Ok(set) => {
                        debug!(grants = set.len(), "grant set loaded");
                        LoadState::Loaded(Arc::new(set))
                    }
                    Err(e) => {
                        // A malformed record rejects the whole payload:
                        // silently shrinking the set would be
                        // indistinguishable from a revocation.
                        warn!(error = %e, "rejecting malformed grant payload");
                        LoadState::FetchFailed {
                            message: e.to_string(),
                        }
                    }
                }
            }
            Err(FetchError::Unauthorized) => LoadState::Unauthorized,
            Err(e) => {
                warn!(error = %e, "grant fetch failed");
                LoadState::FetchFailed {
                    message: e.to_string(),
                }
            }
        };

        if self.set_state_if_current(generation, next.clone()) {
            next
        } else {
            metrics::counter!("opsgate_grants_stale_discarded_total").increment(1);
            debug!(generation, "discarding stale grant response");
            self.state()
        }
    }

    /// Atomically snapshots the generation and marks the store `Loading`.
    fn begin_load(&self) -> u64 {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let generation = self.generation.load(Ordering::Acquire);
        *state = LoadState::Loading;
        generation
    }

    /// Applies `next` only if no invalidation happened since `generation`
    /// was snapshotted. The generation check runs under the state lock, so
    /// it cannot race `invalidate()`.
    fn set_state_if_current(&self, generation: u64, next: LoadState) -> bool {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if self.generation.load(Ordering::Acquire) != generation {
            return false;
        }
        *state = next;
        true
    }
}

/// Registers store metrics descriptions.
///
/// Call once during application startup; optional, but gives the counters
/// documentation in the metrics backend.
pub fn register_store_metrics() {
    metrics::describe_counter!(
        "opsgate_grants_fetch_total",
        "Grant fetches issued to the grant source"
    );
    metrics::describe_counter!(
        "opsgate_grants_fetch_coalesced_total",
        "Load callers coalesced onto an already in-flight fetch"
    );
    metrics::describe_counter!(
        "opsgate_grants_stale_discarded_total",
        "Grant responses discarded because the store was invalidated mid-fetch"
    );
    metrics::describe_counter!(
        "opsgate_store_invalidations_total",
        "Explicit permission store invalidations"
    );
}
