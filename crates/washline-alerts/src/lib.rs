//! # washline-alerts
//!
//! Derives the operator-facing alert view from the live notification stream.
//!
//! - [`window`]: the pure filter (actionable priority, not stale, not
//!   dismissed, deduplicated, first N in stream order)
//! - [`dismissed`]: the insert-only set of ids hidden by the operator
//! - [`category`]: event-type to icon category classification
//! - [`panel`]: presentation state and the rendered [`PanelView`]
//! - [`format`]: relative ages, metadata details and text rendering
//! - [`monitor`]: the task that re-renders on snapshots, commands and a timer

pub mod category;
pub mod dismissed;
pub mod format;
pub mod monitor;
pub mod panel;
pub mod window;

pub use category::{classify, AlertCategory};
pub use dismissed::DismissedSet;
pub use format::render_text;
pub use monitor::{AlertMonitor, MonitorConfig, MonitorHandle, PanelCommand};
pub use panel::{AlertPanel, AlertRow, ConnectionStatus, PanelBody, PanelView};
pub use window::AlertWindow;
