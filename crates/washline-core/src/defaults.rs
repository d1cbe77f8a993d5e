//! Centralized default constants for washline.
//!
//! All crates reference these constants instead of defining their own magic
//! numbers. Organized by domain area.

// =============================================================================
// ALERT WINDOW
// =============================================================================

/// Maximum number of alerts surfaced by the alert panel.
pub const ALERT_MAX_VISIBLE: usize = 5;

/// Alerts older than this are considered stale and hidden.
pub const ALERT_MAX_AGE_HOURS: i64 = 24;

/// Interval at which relative ages ("5m ago") are re-rendered.
pub const ALERT_REFRESH_SECS: u64 = 60;

// =============================================================================
// NOTIFICATION STREAM
// =============================================================================

/// Default backend base URL.
pub const API_URL: &str = "http://127.0.0.1:8080";

/// Default path of the live notification feed.
pub const NOTIFICATIONS_PATH: &str = "/api/v1/notifications/live";

/// Default poll interval for the notification feed in seconds.
pub const STREAM_POLL_INTERVAL_SECS: u64 = 15;

/// Default HTTP request timeout in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 10;

/// Environment variable holding the bearer token for the feed.
pub const TOKEN_ENV: &str = "WASHLINE_API_TOKEN";

/// Capacity of the operator command channel of the alert monitor.
pub const MONITOR_COMMAND_CAPACITY: usize = 32;
