//! Notification data model shared by the stream client and alert consumers.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

// =============================================================================
// PRIORITY
// =============================================================================

/// Severity ranking of a notification. `P0` is the most severe.
///
/// The derived ordering follows severity: `P0 < P1 < ... < P4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Priority {
    P0,
    P1,
    P2,
    P3,
    P4,
}

impl Priority {
    /// All priorities, most severe first.
    pub const ALL: [Priority; 5] = [
        Priority::P0,
        Priority::P1,
        Priority::P2,
        Priority::P3,
        Priority::P4,
    ];

    /// Whether alerts of this priority are surfaced to operators (P0-P2).
    pub fn is_actionable(self) -> bool {
        self <= Priority::P2
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::P0 => "P0",
            Priority::P1 => "P1",
            Priority::P2 => "P2",
            Priority::P3 => "P3",
            Priority::P4 => "P4",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Error;

    /// Accepts `"P0"`..`"P4"` in any case, or the bare digit.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix('P')
            .or_else(|| trimmed.strip_prefix('p'))
            .unwrap_or(trimmed);
        match digits {
            "0" => Ok(Priority::P0),
            "1" => Ok(Priority::P1),
            "2" => Ok(Priority::P2),
            "3" => Ok(Priority::P3),
            "4" => Ok(Priority::P4),
            _ => Err(Error::InvalidInput(format!("unknown priority: {}", s))),
        }
    }
}

impl Serialize for Priority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// NOTIFICATION RECORD
// =============================================================================

/// Optional attribute bag attached to a notification.
///
/// Known keys are parsed leniently: a malformed value becomes `None` rather
/// than rejecting the record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationMetadata {
    /// Number of tenants affected by the event.
    #[serde(
        default,
        deserialize_with = "lenient_u64",
        skip_serializing_if = "Option::is_none"
    )]
    pub tenant_count: Option<u64>,
    /// Monetary amount involved (payments, refunds).
    #[serde(
        default,
        deserialize_with = "lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount: Option<f64>,
    /// Any other keys sent by the backend.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl NotificationMetadata {
    pub fn is_empty(&self) -> bool {
        self.tenant_count.is_none() && self.amount.is_none() && self.extra.is_empty()
    }
}

/// A single notification as delivered by the stream. Read-only to consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    /// Unique identifier, stable across refreshes.
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    pub priority: Priority,
    /// Free-text category used for icon selection.
    #[serde(default)]
    pub event_type: String,
    /// When the event occurred. `None` when missing or unparseable.
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "lenient_metadata",
        skip_serializing_if = "NotificationMetadata::is_empty"
    )]
    pub metadata: NotificationMetadata,
}

impl NotificationRecord {
    /// Create a record with empty metadata.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        priority: Priority,
        created_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            message: String::new(),
            priority,
            event_type: String::new(),
            created_at,
            metadata: NotificationMetadata::default(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = event_type.into();
        self
    }

    pub fn with_metadata(mut self, metadata: NotificationMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

// =============================================================================
// AGGREGATES & SNAPSHOT
// =============================================================================

/// Totals per priority as reported by the stream. Never recomputed locally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityCounts {
    #[serde(default)]
    pub p0: u64,
    #[serde(default)]
    pub p1: u64,
    #[serde(default)]
    pub p2: u64,
    #[serde(default)]
    pub p3: u64,
    #[serde(default)]
    pub p4: u64,
}

impl PriorityCounts {
    pub fn get(&self, priority: Priority) -> u64 {
        match priority {
            Priority::P0 => self.p0,
            Priority::P1 => self.p1,
            Priority::P2 => self.p2,
            Priority::P3 => self.p3,
            Priority::P4 => self.p4,
        }
    }

    /// Sum of P0-P2.
    pub fn actionable_total(&self) -> u64 {
        self.p0 + self.p1 + self.p2
    }
}

/// The stream client's current view of all known notifications.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StreamSnapshot {
    /// Notifications in delivery order.
    pub notifications: Vec<NotificationRecord>,
    pub counts: PriorityCounts,
    pub is_connected: bool,
    /// Time of the last successful refresh. `None` until the first one.
    pub updated_at: Option<DateTime<Utc>>,
}

// =============================================================================
// LENIENT DESERIALIZERS
// =============================================================================

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(parse_timestamp))
}

/// Parse an RFC 3339 string or epoch milliseconds.
pub fn parse_timestamp(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    match value {
        serde_json::Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        serde_json::Value::Number(n) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    }
}

fn lenient_metadata<'de, D>(deserializer: D) -> Result<NotificationMetadata, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default())
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_u64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite()))
}
