//! The async seam in front of the session permission endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::FetchResult;

/// One granted permission as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantRecord {
    /// The raw permission name. Validated by the store at load time.
    pub name: String,
}

impl GrantRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Wire shape of the session permission endpoint response:
/// `{ "effective_permissions": [ { "name": "billing.read" }, ... ] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantsPayload {
    pub effective_permissions: Vec<GrantRecord>,
}

/// Trait for fetching the principal's effective grants.
///
/// Implementations perform the I/O only; validation, caching, coalescing,
/// and staleness handling belong to the
/// [`PermissionStore`](crate::store::PermissionStore).
#[async_trait]
pub trait GrantSource: Send + Sync {
    /// Fetches the flat list of granted permission names.
    async fn fetch_grants(&self) -> FetchResult<Vec<GrantRecord>>;
}

#[async_trait]
impl<T: GrantSource + ?Sized> GrantSource for std::sync::Arc<T> {
    async fn fetch_grants(&self) -> FetchResult<Vec<GrantRecord>> {
        (**self).fetch_grants().await
    }
}
