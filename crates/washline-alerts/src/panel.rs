//! Alert presentation state.
//!
//! [`AlertPanel`] owns everything local to one alert surface: the dismissed
//! ids, the minimized flag, and the last snapshot it received. Rendering is a
//! pure function of that state plus the current time, producing a
//! [`PanelView`].

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use washline_core::{NotificationRecord, Priority, PriorityCounts, StreamSnapshot};

use crate::category::{classify, AlertCategory};
use crate::dismissed::DismissedSet;
use crate::format::{metadata_details, relative_age};
use crate::window::AlertWindow;

/// Stream connectivity as shown on the panel badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    /// No snapshot has ever arrived.
    Waiting,
    Online,
    Offline,
}

impl ConnectionStatus {
    pub fn from_connected(is_connected: bool) -> Self {
        if is_connected {
            ConnectionStatus::Online
        } else {
            ConnectionStatus::Offline
        }
    }

    /// Status for a snapshot. A stream that never delivered is `Waiting`,
    /// not `Offline`.
    pub fn from_snapshot(snapshot: &StreamSnapshot) -> Self {
        if snapshot.updated_at.is_none() && !snapshot.is_connected {
            ConnectionStatus::Waiting
        } else {
            ConnectionStatus::from_connected(snapshot.is_connected)
        }
    }
}

/// One visible alert, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertRow {
    pub id: String,
    pub title: String,
    pub message: String,
    pub priority: Priority,
    pub category: AlertCategory,
    /// Relative age label, e.g. `"5m ago"`.
    pub age: String,
    /// Metadata details; empty when the record carries none.
    pub details: Vec<String>,
}

impl AlertRow {
    fn from_record(record: &NotificationRecord, now: DateTime<Utc>) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            message: record.message.clone(),
            priority: record.priority,
            category: classify(&record.event_type),
            age: relative_age(record.created_at, now),
            details: metadata_details(&record.metadata),
        }
    }
}

/// Panel body: either the healthy state or a non-empty list of alerts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PanelBody {
    /// Nothing to show: all systems operational.
    AllClear,
    /// At least one alert. `hidden` counts matches cut by truncation.
    Alerts { rows: Vec<AlertRow>, hidden: usize },
}

impl PanelBody {
    /// Build a body from rows; an empty list becomes [`PanelBody::AllClear`].
    pub fn from_rows(rows: Vec<AlertRow>, hidden: usize) -> Self {
        if rows.is_empty() {
            PanelBody::AllClear
        } else {
            PanelBody::Alerts { rows, hidden }
        }
    }

    /// Number of alerts shown.
    pub fn len(&self) -> usize {
        match self {
            PanelBody::AllClear => 0,
            PanelBody::Alerts { rows, .. } => rows.len(),
        }
    }

    pub fn is_all_clear(&self) -> bool {
        matches!(self, PanelBody::AllClear)
    }

    pub fn rows(&self) -> &[AlertRow] {
        match self {
            PanelBody::AllClear => &[],
            PanelBody::Alerts { rows, .. } => rows,
        }
    }
}

/// Everything the surface needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelView {
    pub status: ConnectionStatus,
    /// Stream-supplied totals, verbatim.
    pub counts: PriorityCounts,
    pub minimized: bool,
    pub body: PanelBody,
    pub rendered_at: DateTime<Utc>,
}

/// Local state of one alert surface.
#[derive(Debug, Clone, Default)]
pub struct AlertPanel {
    window: AlertWindow,
    dismissed: DismissedSet,
    minimized: bool,
    snapshot: StreamSnapshot,
}

impl AlertPanel {
    pub fn new(window: AlertWindow) -> Self {
        Self {
            window,
            ..Default::default()
        }
    }

    /// Store the latest snapshot.
    ///
    /// A disconnected snapshot still carries the last-known notifications,
    /// so the panel keeps showing them, labeled offline.
    pub fn apply_snapshot(&mut self, snapshot: StreamSnapshot) {
        debug!(
            record_count = snapshot.notifications.len(),
            connected = snapshot.is_connected,
            "Alert panel received snapshot"
        );
        self.snapshot = snapshot;
    }

    /// Hide an alert. Returns `true` if it was newly dismissed.
    pub fn dismiss(&mut self, id: &str) -> bool {
        let added = self.dismissed.dismiss(id);
        if added {
            debug!(
                notification_id = id,
                dismissed_count = self.dismissed.len(),
                "Alert dismissed"
            );
        }
        added
    }

    pub fn toggle_minimized(&mut self) -> bool {
        self.minimized = !self.minimized;
        self.minimized
    }

    pub fn set_minimized(&mut self, minimized: bool) {
        self.minimized = minimized;
    }

    pub fn is_minimized(&self) -> bool {
        self.minimized
    }

    pub fn dismissed_count(&self) -> usize {
        self.dismissed.len()
    }

    pub fn snapshot(&self) -> &StreamSnapshot {
        &self.snapshot
    }

    /// Render the current state at time `now`.
    pub fn view(&self, now: DateTime<Utc>) -> PanelView {
        let notifications = &self.snapshot.notifications;
        let visible = self.window.derive(notifications, &self.dismissed, now);
        let matching = self
            .window
            .matching_count(notifications, &self.dismissed, now);
        let hidden = matching.saturating_sub(visible.len());
        let rows = visible
            .into_iter()
            .map(|record| AlertRow::from_record(record, now))
            .collect();

        PanelView {
            status: ConnectionStatus::from_snapshot(&self.snapshot),
            counts: self.snapshot.counts,
            minimized: self.minimized,
            body: PanelBody::from_rows(rows, hidden),
            rendered_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use washline_core::NotificationMetadata;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
    }

    fn snapshot(records: Vec<NotificationRecord>, connected: bool) -> StreamSnapshot {
        StreamSnapshot {
            notifications: records,
            counts: PriorityCounts {
                p0: 40,
                p1: 12,
                p2: 3,
                ..Default::default()
            },
            is_connected: connected,
            updated_at: Some(now()),
        }
    }

    fn record(id: &str, priority: Priority) -> NotificationRecord {
        NotificationRecord::new(id, format!("alert {}", id), priority, Some(now()))
    }

    #[test]
    fn test_empty_snapshot_is_all_clear() {
        let panel = AlertPanel::default();
        let view = panel.view(now());
        assert_eq!(view.body, PanelBody::AllClear);
        assert_eq!(view.status, ConnectionStatus::Waiting);
    }

    #[test]
    fn test_status_waiting_until_first_snapshot() {
        let never = StreamSnapshot::default();
        assert_eq!(ConnectionStatus::from_snapshot(&never), ConnectionStatus::Waiting);

        let failed_after_data = StreamSnapshot {
            updated_at: Some(now()),
            is_connected: false,
            ..Default::default()
        };
        assert_eq!(
            ConnectionStatus::from_snapshot(&failed_after_data),
            ConnectionStatus::Offline
        );

        let live = snapshot(Vec::new(), true);
        assert_eq!(ConnectionStatus::from_snapshot(&live), ConnectionStatus::Online);
    }

    #[test]
    fn test_only_low_priority_is_all_clear() {
        let mut panel = AlertPanel::default();
        panel.apply_snapshot(snapshot(
            vec![record("a", Priority::P3), record("b", Priority::P4)],
            true,
        ));
        let view = panel.view(now());
        assert!(view.body.is_all_clear());
        assert_eq!(view.status, ConnectionStatus::Online);
    }

    #[test]
    fn test_dismissing_last_alert_switches_to_all_clear() {
        let mut panel = AlertPanel::default();
        panel.apply_snapshot(snapshot(vec![record("a", Priority::P0)], true));
        assert_eq!(panel.view(now()).body.len(), 1);

        assert!(panel.dismiss("a"));
        assert!(!panel.dismiss("a"));
        assert_eq!(panel.dismissed_count(), 1);
        assert_eq!(panel.view(now()).body, PanelBody::AllClear);
    }

    #[test]
    fn test_counts_pass_through_verbatim() {
        let mut panel = AlertPanel::default();
        panel.apply_snapshot(snapshot(vec![record("a", Priority::P0)], true));
        let view = panel.view(now());
        assert_eq!(view.counts.p0, 40);
        assert_eq!(view.body.len(), 1);
    }

    #[test]
    fn test_offline_keeps_last_alerts() {
        let mut panel = AlertPanel::default();
        panel.apply_snapshot(snapshot(
            vec![record("a", Priority::P0), record("b", Priority::P1)],
            true,
        ));
        let online = panel.view(now());

        panel.apply_snapshot(snapshot(
            vec![record("a", Priority::P0), record("b", Priority::P1)],
            false,
        ));
        let offline = panel.view(now());

        assert_eq!(offline.status, ConnectionStatus::Offline);
        assert_eq!(offline.body, online.body);
    }

    #[test]
    fn test_hidden_count_reports_truncated_matches() {
        let mut panel = AlertPanel::default();
        let records = (0..8).map(|i| record(&format!("n{}", i), Priority::P1)).collect();
        panel.apply_snapshot(snapshot(records, true));
        match panel.view(now()).body {
            PanelBody::Alerts { rows, hidden } => {
                assert_eq!(rows.len(), 5);
                assert_eq!(hidden, 3);
            }
            PanelBody::AllClear => panic!("expected alerts"),
        }
    }

    #[test]
    fn test_row_fields() {
        let mut panel = AlertPanel::default();
        let record = NotificationRecord::new(
            "pay-1",
            "Refund spike",
            Priority::P2,
            Some(now() - Duration::minutes(7)),
        )
        .with_message("Refunds up 300%")
        .with_event_type("billing_anomaly")
        .with_metadata(NotificationMetadata {
            amount: Some(1250.0),
            ..Default::default()
        });
        panel.apply_snapshot(snapshot(vec![record], true));

        let view = panel.view(now());
        let row = &view.body.rows()[0];
        assert_eq!(row.id, "pay-1");
        assert_eq!(row.category, AlertCategory::Payment);
        assert_eq!(row.age, "7m ago");
        assert_eq!(row.details, vec!["amount 1,250.00"]);
        assert_eq!(row.message, "Refunds up 300%");
    }

    #[test]
    fn test_minimize_toggle_does_not_touch_body() {
        let mut panel = AlertPanel::default();
        panel.apply_snapshot(snapshot(vec![record("a", Priority::P0)], true));
        assert!(panel.toggle_minimized());
        let view = panel.view(now());
        assert!(view.minimized);
        assert_eq!(view.body.len(), 1);
        assert!(!panel.toggle_minimized());
        panel.set_minimized(true);
        assert!(panel.is_minimized());
    }

    #[test]
    fn test_view_serializes_tagged_body() {
        let panel = AlertPanel::default();
        let value = serde_json::to_value(panel.view(now())).unwrap();
        assert_eq!(value["body"]["state"], "all_clear");
        assert_eq!(value["status"], "waiting");
    }
}
