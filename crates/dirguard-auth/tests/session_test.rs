//! Integration tests for session cap enforcement, evictions, and sweeps.

mod helpers;

use chrono::Utc;

use dirguard_core::config::{OverflowStrategy, SessionConfig};
use dirguard_core::error::ErrorKind;
use dirguard_core::types::UserId;
use dirguard_entity::{DeviceKey, SessionStatus};

use helpers::{SessionHarness, at};

#[tokio::test]
async fn test_login_at_cap_evicts_least_recently_active() {
    let app = SessionHarness::new(2, OverflowStrategy::EvictOldest);
    let user = UserId::new();
    app.seed(user, "D1", 100).await;
    app.seed(user, "D2", 200).await;

    app.evictor
        .login(user, DeviceKey::from("D3"), "browser", "10.0.0.3")
        .await
        .unwrap();

    let d1 = app.store.get_session(user, &"D1".into()).await.unwrap();
    assert_eq!(d1.status, SessionStatus::Inactive);
    assert_eq!(app.active_keys(user).await, vec!["D2", "D3"]);
}

#[tokio::test]
async fn test_login_below_cap_keeps_existing_sessions() {
    let app = SessionHarness::new(3, OverflowStrategy::EvictOldest);
    let user = UserId::new();
    app.seed(user, "D1", 100).await;

    app.evictor
        .login(user, "D2".into(), "browser", "10.0.0.2")
        .await
        .unwrap();

    assert_eq!(app.active_keys(user).await, vec!["D1", "D2"]);
}

#[tokio::test]
async fn test_relogin_from_active_device_does_not_evict() {
    let app = SessionHarness::new(2, OverflowStrategy::EvictOldest);
    let user = UserId::new();
    app.seed(user, "D1", 100).await;
    app.seed(user, "D2", 200).await;

    let session = app
        .evictor
        .login(user, "D1".into(), "new-browser", "10.0.0.9")
        .await
        .unwrap();

    assert_eq!(session.user_agent, "new-browser");
    assert_eq!(app.active_keys(user).await, vec!["D1", "D2"]);
}

#[tokio::test]
async fn test_cap_is_per_user() {
    let app = SessionHarness::new(1, OverflowStrategy::EvictOldest);
    let alice = UserId::new();
    let bob = UserId::new();
    app.seed(alice, "A1", 100).await;

    app.evictor
        .login(bob, "B1".into(), "browser", "10.0.0.2")
        .await
        .unwrap();

    assert_eq!(app.active_keys(alice).await, vec!["A1"]);
    assert_eq!(app.active_keys(bob).await, vec!["B1"]);
}

#[tokio::test]
async fn test_deny_strategy_rejects_login_over_cap() {
    let app = SessionHarness::new(1, OverflowStrategy::Deny);
    let user = UserId::new();
    app.seed(user, "D1", 100).await;

    let err = app
        .evictor
        .login(user, "D2".into(), "browser", "10.0.0.2")
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Conflict);
    assert_eq!(app.active_keys(user).await, vec!["D1"]);
}

#[tokio::test]
async fn test_unlimited_cap_never_evicts() {
    let app = SessionHarness::new(0, OverflowStrategy::EvictOldest);
    let user = UserId::new();
    for (i, key) in ["D1", "D2", "D3", "D4"].iter().enumerate() {
        app.seed(user, key, 100 * i as i64).await;
    }

    app.evictor
        .login(user, "D5".into(), "browser", "10.0.0.5")
        .await
        .unwrap();

    assert_eq!(app.active_keys(user).await.len(), 5);
}

#[tokio::test]
async fn test_sweep_removes_stale_sessions_of_any_status() {
    let app = SessionHarness::new(0, OverflowStrategy::EvictOldest);
    let user = UserId::new();
    app.seed(user, "old-active", 100).await;
    app.seed(user, "old-inactive", 150).await;
    app.seed(user, "fresh", 500).await;
    app.store.mark_inactive(&"old-inactive".into()).await.unwrap();

    let removed = app.cleanup.sweep_before(at(300)).await.unwrap();

    assert_eq!(removed, 2);
    assert_eq!(app.repo.len().await, 1);
    assert!(app.store.find_session(user, &"fresh".into()).await.unwrap().is_some());
}

#[tokio::test]
async fn test_sweep_uses_configured_staleness_window() {
    let app = SessionHarness::new(0, OverflowStrategy::EvictOldest);
    let user = UserId::new();
    let now = Utc::now();
    app.seed(user, "ancient", 0).await;
    app.evictor
        .login(user, "recent".into(), "browser", "10.0.0.1")
        .await
        .unwrap();

    let removed = app.cleanup.sweep(now).await.unwrap();

    assert_eq!(removed, 1);
    assert_eq!(app.active_keys(user).await, vec!["recent"]);
}

#[tokio::test]
async fn test_purge_inactive_is_scoped_to_user() {
    let app = SessionHarness::new(0, OverflowStrategy::EvictOldest);
    let alice = UserId::new();
    let bob = UserId::new();
    app.seed(alice, "A1", 100).await;
    app.seed(bob, "B1", 100).await;
    app.store.mark_inactive(&"A1".into()).await.unwrap();
    app.store.mark_inactive(&"B1".into()).await.unwrap();

    assert_eq!(app.cleanup.purge_inactive(Some(alice)).await.unwrap(), 1);
    assert_eq!(app.repo.len().await, 1);
    assert_eq!(app.cleanup.purge_inactive(None).await.unwrap(), 1);
    assert!(app.repo.is_empty().await);
}

#[tokio::test]
async fn test_evict_own_rejects_current_and_foreign_sessions() {
    let app = SessionHarness::new(0, OverflowStrategy::EvictOldest);
    let alice = UserId::new();
    let bob = UserId::new();
    app.seed(alice, "A1", 100).await;
    app.seed(alice, "A2", 200).await;
    app.seed(bob, "B1", 100).await;

    let current = DeviceKey::from("A2");
    let err = app
        .evictor
        .evict_own(alice, &current, &current)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = app
        .evictor
        .evict_own(alice, &current, &"B1".into())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(app.active_keys(bob).await, vec!["B1"]);

    app.evictor
        .evict_own(alice, &current, &"A1".into())
        .await
        .unwrap();
    assert_eq!(app.active_keys(alice).await, vec!["A2"]);
}

#[tokio::test]
async fn test_admin_eviction_of_unknown_device_is_not_found() {
    let app = SessionHarness::new(0, OverflowStrategy::EvictOldest);

    let err = app.evictor.evict_any(&"ghost".into()).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_heartbeat_refreshes_active_and_rejects_inactive() {
    let app = SessionHarness::new(0, OverflowStrategy::EvictOldest);
    let user = UserId::new();
    app.seed(user, "D1", 100).await;

    let refreshed = app.evictor.heartbeat(user, &"D1".into()).await.unwrap();
    assert!(refreshed.last_active > at(100));

    app.evictor.logout(user, &"D1".into()).await.unwrap();
    let err = app.evictor.heartbeat(user, &"D1".into()).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authentication);

    let err = app.evictor.heartbeat(user, &"nope".into()).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authentication);
}

#[tokio::test]
async fn test_inactive_session_can_log_in_again() {
    let app = SessionHarness::new(1, OverflowStrategy::EvictOldest);
    let user = UserId::new();
    app.seed(user, "D1", 100).await;
    app.seed(user, "D2", 200).await;
    app.store.mark_inactive(&"D1".into()).await.unwrap();

    app.evictor
        .login(user, "D1".into(), "browser", "10.0.0.1")
        .await
        .unwrap();

    assert_eq!(app.active_keys(user).await, vec!["D1"]);
}

#[tokio::test]
async fn test_shared_device_key_is_isolated_between_users() {
    let app = SessionHarness::new(1, OverflowStrategy::EvictOldest);
    let alice = UserId::new();
    let bob = UserId::new();
    app.seed(alice, "laptop", 100).await;
    app.seed(bob, "laptop", 100).await;

    // Alice hits her cap: only her own laptop session is evicted.
    app.evictor
        .login(alice, "phone".into(), "browser", "10.0.0.1")
        .await
        .unwrap();
    assert_eq!(app.active_keys(alice).await, vec!["phone"]);
    assert_eq!(app.active_keys(bob).await, vec!["laptop"]);

    // Logout and self-eviction by Alice never reach Bob's row.
    app.evictor.logout(alice, &"phone".into()).await.unwrap();
    assert_eq!(app.active_keys(bob).await, vec!["laptop"]);

    let err = app
        .evictor
        .evict_own(alice, &"phone".into(), &"tablet".into())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    app.evictor
        .evict_own(alice, &"phone".into(), &"laptop".into())
        .await
        .unwrap();
    let bob_laptop = app.store.get_session(bob, &"laptop".into()).await.unwrap();
    assert_eq!(bob_laptop.status, SessionStatus::Active);
}

#[tokio::test]
async fn test_logout_leaves_other_users_same_device_active() {
    let app = SessionHarness::new(0, OverflowStrategy::EvictOldest);
    let alice = UserId::new();
    let bob = UserId::new();
    app.seed(alice, "laptop", 100).await;
    app.seed(bob, "laptop", 100).await;

    app.evictor.logout(alice, &"laptop".into()).await.unwrap();

    let alice_laptop = app.store.get_session(alice, &"laptop".into()).await.unwrap();
    assert_eq!(alice_laptop.status, SessionStatus::Inactive);
    assert_eq!(app.active_keys(bob).await, vec!["laptop"]);
}

#[tokio::test]
async fn test_admin_eviction_reaches_every_owner_of_a_device_key() {
    let app = SessionHarness::new(0, OverflowStrategy::EvictOldest);
    let alice = UserId::new();
    let bob = UserId::new();
    app.seed(alice, "kiosk", 100).await;
    app.seed(bob, "kiosk", 100).await;

    app.evictor.evict_any(&"kiosk".into()).await.unwrap();

    assert!(app.active_keys(alice).await.is_empty());
    assert!(app.active_keys(bob).await.is_empty());
}

#[tokio::test]
async fn test_out_of_range_stale_window_sweeps_nothing() {
    let app = SessionHarness::with_config(SessionConfig {
        stale_after_hours: 10_000_000_000_000,
        sweep_on_login: true,
        ..SessionConfig::default()
    });
    let user = UserId::new();
    app.seed(user, "ancient", 0).await;

    assert_eq!(app.cleanup.sweep(Utc::now()).await.unwrap(), 0);

    app.evictor
        .login(user, "fresh".into(), "browser", "10.0.0.1")
        .await
        .unwrap();
    assert_eq!(app.active_keys(user).await, vec!["ancient", "fresh"]);
}
