//! Integration tests for the alert monitor driven by a notification hub.
//!
//! Covers:
//! - snapshots published on the hub reach the rendered view
//! - dismissal and minimize commands re-render the panel
//! - offline snapshots keep the last alerts visible
//! - the refresh timer updates relative ages while the stream is quiet
//! - shutdown releases the hub subscription

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use washline_alerts::{
    render_text, AlertMonitor, ConnectionStatus, MonitorConfig, PanelBody, PanelView,
};
use washline_core::{FixedClock, NotificationHub, NotificationRecord, Priority, PriorityCounts};

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn start_time() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 8, 0, 0).unwrap()
}

fn record(id: &str, priority: Priority) -> NotificationRecord {
    NotificationRecord::new(id, format!("Alert {}", id), priority, Some(start_time()))
        .with_event_type("system_health")
}

fn counts() -> PriorityCounts {
    PriorityCounts {
        p0: 2,
        p1: 2,
        p2: 1,
        p3: 1,
        p4: 1,
    }
}

fn row_ids(view: &PanelView) -> Vec<String> {
    view.body.rows().iter().map(|r| r.id.clone()).collect()
}

fn seven_records() -> Vec<NotificationRecord> {
    [
        Priority::P0,
        Priority::P3,
        Priority::P1,
        Priority::P0,
        Priority::P4,
        Priority::P2,
        Priority::P1,
    ]
    .iter()
    .enumerate()
    .map(|(i, p)| record(&format!("n{}", i), *p))
    .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[tokio::test]
async fn test_initial_view_waits_for_feed() {
    let hub = NotificationHub::new();
    let clock = Arc::new(FixedClock::new(start_time()));
    let handle = AlertMonitor::new(&hub, clock, MonitorConfig::default()).start();

    let view = handle.current();
    assert_eq!(view.body, PanelBody::AllClear);
    assert_eq!(view.status, ConnectionStatus::Waiting);
    let text = render_text(&view);
    assert!(text.contains("Waiting for notification feed"));
    assert!(!text.contains("All systems operational"));

    hub.mark_disconnected();
    assert_eq!(handle.current().status, ConnectionStatus::Waiting);

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_snapshot_then_dismiss_scenario() {
    let hub = NotificationHub::new();
    let clock = Arc::new(FixedClock::new(start_time()));
    let handle = AlertMonitor::new(&hub, clock, MonitorConfig::default()).start();
    let mut views = handle.views();

    hub.publish(seven_records(), counts(), start_time());
    views.changed().await.unwrap();
    let view = views.borrow_and_update().clone();
    assert_eq!(row_ids(&view), vec!["n0", "n2", "n3", "n5", "n6"]);
    assert_eq!(view.status, ConnectionStatus::Online);
    assert_eq!(view.counts, counts());

    handle.dismiss("n0").await.unwrap();
    views.changed().await.unwrap();
    let view = views.borrow_and_update().clone();
    assert_eq!(row_ids(&view), vec!["n2", "n3", "n5", "n6"]);

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_duplicate_dismiss_does_not_rerender() {
    let hub = NotificationHub::new();
    hub.publish(seven_records(), counts(), start_time());
    let clock = Arc::new(FixedClock::new(start_time()));
    let handle = AlertMonitor::new(&hub, clock, MonitorConfig::default()).start();
    let mut views = handle.views();

    handle.dismiss("n2").await.unwrap();
    views.changed().await.unwrap();
    views.borrow_and_update();

    handle.dismiss("n2").await.unwrap();
    handle.toggle_minimized().await.unwrap();
    views.changed().await.unwrap();
    let view = views.borrow_and_update().clone();
    assert!(view.minimized);
    assert_eq!(row_ids(&view), vec!["n0", "n3", "n5", "n6"]);

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_offline_keeps_last_alerts() {
    let hub = NotificationHub::new();
    let clock = Arc::new(FixedClock::new(start_time()));
    let handle = AlertMonitor::new(&hub, clock, MonitorConfig::default()).start();
    let mut views = handle.views();

    hub.publish(vec![record("a", Priority::P0)], counts(), start_time());
    views.changed().await.unwrap();
    views.borrow_and_update();

    hub.mark_disconnected();
    views.changed().await.unwrap();
    let view = views.borrow_and_update().clone();
    assert_eq!(view.status, ConnectionStatus::Offline);
    assert_eq!(row_ids(&view), vec!["a"]);
    assert!(render_text(&view).contains("Offline"));

    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_refresh_timer_updates_relative_age() {
    let hub = NotificationHub::new();
    hub.publish(vec![record("a", Priority::P1)], counts(), start_time());
    let clock = Arc::new(FixedClock::new(start_time()));
    let config = MonitorConfig::default().with_refresh_interval(Duration::from_secs(60));
    let handle = AlertMonitor::new(&hub, clock.clone(), config).start();
    let mut views = handle.views();
    assert_eq!(handle.current().body.rows()[0].age, "just now");

    clock.advance(chrono::Duration::minutes(5));
    tokio::time::advance(Duration::from_secs(61)).await;

    views.changed().await.unwrap();
    let view = views.borrow_and_update().clone();
    assert_eq!(view.body.rows()[0].age, "5m ago");

    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_refresh_timer_expires_stale_alerts() {
    let hub = NotificationHub::new();
    hub.publish(vec![record("a", Priority::P0)], counts(), start_time());
    let clock = Arc::new(FixedClock::new(start_time()));
    let handle = AlertMonitor::new(&hub, clock.clone(), MonitorConfig::default()).start();
    let mut views = handle.views();

    clock.advance(chrono::Duration::hours(25));
    views.changed().await.unwrap();
    assert_eq!(views.borrow_and_update().body, PanelBody::AllClear);

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_shutdown_releases_subscription() {
    let hub = NotificationHub::new();
    let clock = Arc::new(FixedClock::new(start_time()));
    let handle = AlertMonitor::new(&hub, clock, MonitorConfig::default()).start();
    assert_eq!(hub.subscriber_count(), 1);

    handle.shutdown().await.unwrap();
    assert_eq!(hub.subscriber_count(), 0);
}

#[tokio::test]
async fn test_hub_dropped_keeps_last_view() {
    let hub = NotificationHub::new();
    hub.publish(vec![record("a", Priority::P0)], counts(), start_time());
    let clock = Arc::new(FixedClock::new(start_time()));
    let handle = AlertMonitor::new(&hub, clock, MonitorConfig::default()).start();
    drop(hub);

    handle.toggle_minimized().await.unwrap();
    let mut views = handle.views();
    views.changed().await.unwrap();
    let view = views.borrow_and_update().clone();
    assert!(view.minimized);
    assert_eq!(row_ids(&view), vec!["a"]);

    handle.shutdown().await.unwrap();
}
