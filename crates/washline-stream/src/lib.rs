//! # washline-stream
//!
//! Client side of the live notification feed. A [`NotificationSource`]
//! fetches the backend's current notifications and priority totals; the
//! [`StreamPoller`] drives a source on an interval and writes the results
//! into a [`washline_core::NotificationHub`], turning failures into the
//! hub's disconnected flag.

pub mod config;
pub mod poller;
pub mod source;

pub use config::{ConfigError, ConfigResult, StreamConfig};
pub use poller::{PollerHandle, StreamPoller};
pub use source::{HttpNotificationSource, NotificationSource, SourceSnapshot};
