//! Integration tests for invalidation and stale-response discard.
//!
//! An invalidation racing an outstanding fetch must win: the late response
//! is discarded rather than resurrecting grants that a logout or role edit
//! already revoked.

use std::sync::Arc;
use std::time::Duration;

use opsgate_domain::Permission;
use opsgate_store::{LoadState, PermissionStore, StaticGrantSource};

fn perm(name: &str) -> Permission {
    Permission::new(name).unwrap()
}

#[tokio::test]
async fn test_response_arriving_after_invalidate_is_discarded() {
    // Arrange - a slow fetch
    let source = Arc::new(StaticGrantSource::new(["billing.read"]));
    source.set_delay(Duration::from_millis(100));
    let store = PermissionStore::new_shared(Arc::clone(&source));

    // Act - start the load, then invalidate while it is in flight
    let load = {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.load().await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(store.state(), LoadState::Loading);
    store.invalidate();

    // Assert - the stale response never lands
    let returned = load.await.unwrap();
    assert_eq!(returned, LoadState::NotLoaded);
    assert_eq!(store.state(), LoadState::NotLoaded);
    assert_eq!(store.generation(), 1);

    // A fresh load works normally afterwards.
    assert!(store.load().await.is_loaded());
}

#[tokio::test]
async fn test_refetch_after_revocation_reflects_smaller_set() {
    // Scenario: an admin revokes a role, the console calls invalidate(),
    // and the next check reflects the smaller set - never the old cache.
    let source = Arc::new(StaticGrantSource::new(["billing.read", "billing.write"]));
    let store = PermissionStore::new_shared(Arc::clone(&source));

    store.load().await;
    let evaluator = store.evaluator().unwrap();
    assert!(evaluator.has_permission(&perm("billing.write")));

    // Role edit lands on the backend; the frontend is told to invalidate.
    source.set_grants(["billing.read"]);
    store.invalidate();

    // Before the refetch resolves, nothing is allowed (fail-closed).
    assert!(store.evaluator().is_none());

    store.load().await;
    let evaluator = store.evaluator().unwrap();
    assert!(evaluator.has_permission(&perm("billing.read")));
    assert!(!evaluator.has_permission(&perm("billing.write")));
}

#[tokio::test]
async fn test_each_invalidation_bumps_the_generation() {
    let store = PermissionStore::new(StaticGrantSource::new(["billing.read"]));
    assert_eq!(store.generation(), 0);
    store.invalidate();
    store.invalidate();
    store.invalidate();
    assert_eq!(store.generation(), 3);
}

#[tokio::test]
async fn test_invalidate_while_idle_is_harmless() {
    let store = PermissionStore::new(StaticGrantSource::new(["billing.read"]));
    store.invalidate();
    assert_eq!(store.state(), LoadState::NotLoaded);
    assert!(store.load().await.is_loaded());
}
