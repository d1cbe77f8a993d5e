//! Notification hub: the shared, latest-value snapshot of the notification stream.
//!
//! A single writer (the stream client) replaces the snapshot; any number of
//! consumers subscribe and read it. Consumers only ever see the most recent
//! snapshot, which is what a live alert view needs: intermediate states that
//! were superseded before a consumer woke up are irrelevant.
//!
//! When the stream goes offline the hub keeps the last notifications and
//! counts and only flips `is_connected`, so consumers can keep rendering
//! stale-but-available data.

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::models::{NotificationRecord, PriorityCounts, StreamSnapshot};

/// Latest-value broadcast of [`StreamSnapshot`]s.
///
/// Uses `tokio::sync::watch`, so a slow subscriber never lags: it simply
/// observes the newest snapshot on its next `changed()`.
pub struct NotificationHub {
    tx: watch::Sender<StreamSnapshot>,
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationHub {
    /// Create a hub holding an empty, disconnected snapshot.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(StreamSnapshot::default());
        Self { tx }
    }

    /// Replace the snapshot with fresh data and mark the stream connected.
    pub fn publish(
        &self,
        notifications: Vec<NotificationRecord>,
        counts: PriorityCounts,
        at: DateTime<Utc>,
    ) {
        let record_count = notifications.len();
        let was_connected = self.tx.borrow().is_connected;
        self.tx.send_replace(StreamSnapshot {
            notifications,
            counts,
            is_connected: true,
            updated_at: Some(at),
        });
        if !was_connected {
            tracing::info!(record_count, "Notification stream connected");
        }
        tracing::debug!(
            record_count,
            subscriber_count = self.tx.receiver_count(),
            "NotificationHub publish"
        );
    }

    /// Flag the stream offline, keeping the last-known notifications.
    ///
    /// Subscribers are only woken if the flag actually changed.
    pub fn mark_disconnected(&self) {
        let changed = self.tx.send_if_modified(|snapshot| {
            let changed = snapshot.is_connected;
            snapshot.is_connected = false;
            changed
        });
        if changed {
            tracing::warn!(
                retained = self.tx.borrow().notifications.len(),
                "Notification stream disconnected, keeping last snapshot"
            );
        }
    }

    /// Flag the stream online without replacing its data.
    pub fn mark_connected(&self) {
        self.tx.send_if_modified(|snapshot| {
            let changed = !snapshot.is_connected;
            snapshot.is_connected = true;
            changed
        });
    }

    /// Subscribe to snapshot updates. Each subscriber is independent.
    ///
    /// The returned receiver considers the current value already seen.
    pub fn subscribe(&self) -> watch::Receiver<StreamSnapshot> {
        self.tx.subscribe()
    }

    /// Clone of the current snapshot.
    pub fn snapshot(&self) -> StreamSnapshot {
        self.tx.borrow().clone()
    }

    pub fn is_connected(&self) -> bool {
        self.tx.borrow().is_connected
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
