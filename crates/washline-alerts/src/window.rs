//! The alert window filter.
//!
//! Narrows the full notification stream to the small set an operator should
//! see: actionable priority, younger than the age limit, not dismissed, each
//! id at most once, first `max_visible` in stream order.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};

use washline_core::defaults;
use washline_core::NotificationRecord;

use crate::dismissed::DismissedSet;

/// Filter parameters. Evaluation is pure: the same inputs always produce the
/// same output in the same order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertWindow {
    /// Maximum number of alerts returned.
    pub max_visible: usize,
    /// Alerts at least this old are hidden.
    pub max_age: Duration,
}

impl Default for AlertWindow {
    fn default() -> Self {
        Self {
            max_visible: defaults::ALERT_MAX_VISIBLE,
            max_age: Duration::hours(defaults::ALERT_MAX_AGE_HOURS),
        }
    }
}

impl AlertWindow {
    pub fn with_max_visible(mut self, max_visible: usize) -> Self {
        self.max_visible = max_visible;
        self
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    /// Whether the record is too old to show.
    ///
    /// Missing timestamps and timestamps in the future are never expired.
    pub fn is_expired(&self, record: &NotificationRecord, now: DateTime<Utc>) -> bool {
        match record.created_at {
            Some(created_at) => now.signed_duration_since(created_at) >= self.max_age,
            None => false,
        }
    }

    fn admits(
        &self,
        record: &NotificationRecord,
        dismissed: &DismissedSet,
        now: DateTime<Utc>,
    ) -> bool {
        record.priority.is_actionable()
            && !self.is_expired(record, now)
            && !dismissed.contains(&record.id)
    }

    /// Every matching record in stream order.
    ///
    /// An id is claimed by its first occurrence even when that copy is
    /// filtered out, so a later duplicate never surfaces.
    pub fn matching<'s, 'a: 's>(
        &'s self,
        notifications: &'a [NotificationRecord],
        dismissed: &'s DismissedSet,
        now: DateTime<Utc>,
    ) -> impl Iterator<Item = &'a NotificationRecord> + 's {
        let mut seen: HashSet<&'a str> = HashSet::new();
        notifications.iter().filter(move |record| {
            let record: &'a NotificationRecord = *record;
            seen.insert(record.id.as_str()) && self.admits(record, dismissed, now)
        })
    }

    /// The visible alerts: matching records truncated to `max_visible`.
    pub fn derive<'a>(
        &self,
        notifications: &'a [NotificationRecord],
        dismissed: &DismissedSet,
        now: DateTime<Utc>,
    ) -> Vec<&'a NotificationRecord> {
        self.matching(notifications, dismissed, now)
            .take(self.max_visible)
            .collect()
    }

    /// Number of matching records before truncation.
    pub fn matching_count(
        &self,
        notifications: &[NotificationRecord],
        dismissed: &DismissedSet,
        now: DateTime<Utc>,
    ) -> usize {
        self.matching(notifications, dismissed, now).count()
    }
}
