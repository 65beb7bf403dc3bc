//! opsgate-store: Permission grant fetching, caching, and invalidation
//!
//! This crate is the single source of truth for "what can this principal
//! currently do":
//! - [`GrantSource`] - async seam in front of the session permission endpoint
//! - [`PermissionStore`] - load-state machine with request coalescing and
//!   generation-based stale-response discard
//! - [`HttpGrantSource`] - reqwest-backed source for the real endpoint
//! - [`StaticGrantSource`] - in-memory source for tests
//! - [`PrincipalSession`] - principal lifecycle owning an injectable store
//!
//! # Concurrency model
//!
//! The grant set is single-writer, many-reader: only the store mutates it,
//! and only by replacing the whole `Arc` snapshot. Concurrent `load()`
//! callers are coalesced onto one in-flight fetch, and a response arriving
//! after `invalidate()` is discarded by generation comparison rather than
//! resurrecting stale grants.

pub mod error;
pub mod http;
pub mod memory;
pub mod session;
mod singleflight;
pub mod store;
pub mod traits;

// Re-export commonly used types at the crate root
pub use error::{FetchError, FetchResult};
pub use http::{HttpGrantSource, HttpGrantSourceConfig};
pub use memory::StaticGrantSource;
pub use session::PrincipalSession;
pub use store::{register_store_metrics, LoadState, PermissionStore, StoreSnapshot};
pub use traits::{GrantRecord, GrantSource, GrantsPayload};
