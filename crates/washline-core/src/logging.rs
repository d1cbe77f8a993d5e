//! Structured logging field name constants for washline.
//!
//! All crates use these constants for consistent structured logging fields
//! so log aggregation can query by the same names across subsystems.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue (stream offline, skipped record) |
//! | INFO  | Lifecycle events (startup, shutdown, reconnect) |
//! | DEBUG | Decision points, snapshot and view sizes |
//! | TRACE | Per-record iteration |

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of records in a snapshot.
pub const RECORD_COUNT: &str = "record_count";

/// Number of alerts shown after filtering.
pub const VISIBLE_COUNT: &str = "visible_count";

/// Number of dismissed ids.
pub const DISMISSED_COUNT: &str = "dismissed_count";

/// Consecutive failed fetches.
pub const FAILURES: &str = "consecutive_failures";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Whether the stream is connected.
pub const CONNECTED: &str = "connected";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
