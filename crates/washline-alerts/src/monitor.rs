//! Alert monitor task.
//!
//! Owns one [`AlertPanel`] and re-renders it whenever a snapshot arrives from
//! the hub, an operator command arrives, or the refresh timer ticks (so
//! relative ages stay current while the stream is quiet). Rendered views are
//! published on a watch channel.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, instrument};

use washline_core::defaults;
use washline_core::logging::{DISMISSED_COUNT, VISIBLE_COUNT};
use washline_core::{Clock, Error, NotificationHub, Result, StreamSnapshot};

use crate::panel::{AlertPanel, PanelView};
use crate::window::AlertWindow;

/// Configuration for the alert monitor.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub window: AlertWindow,
    /// Re-render interval while nothing else happens.
    pub refresh_interval: Duration,
    /// Capacity of the operator command channel.
    pub command_capacity: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            window: AlertWindow::default(),
            refresh_interval: Duration::from_secs(defaults::ALERT_REFRESH_SECS),
            command_capacity: defaults::MONITOR_COMMAND_CAPACITY,
        }
    }
}

impl MonitorConfig {
    /// Create config from environment variables (with defaults).
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `WASHLINE_ALERT_MAX_VISIBLE` | `5` | Alerts shown at once |
    /// | `WASHLINE_ALERT_MAX_AGE_HOURS` | `24` | Hide alerts older than this |
    /// | `WASHLINE_ALERT_REFRESH_SECS` | `60` | Relative-age refresh interval |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Zero, negative, or
    /// unparseable values fall back to the defaults.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let max_visible = lookup("WASHLINE_ALERT_MAX_VISIBLE")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(defaults::ALERT_MAX_VISIBLE);

        let max_age_hours = lookup("WASHLINE_ALERT_MAX_AGE_HOURS")
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|h| *h > 0)
            .unwrap_or(defaults::ALERT_MAX_AGE_HOURS);

        let refresh_secs = lookup("WASHLINE_ALERT_REFRESH_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(defaults::ALERT_REFRESH_SECS)
            .max(1);

        Self {
            window: AlertWindow::default()
                .with_max_visible(max_visible)
                .with_max_age(chrono::Duration::hours(max_age_hours)),
            refresh_interval: Duration::from_secs(refresh_secs),
            command_capacity: defaults::MONITOR_COMMAND_CAPACITY,
        }
    }

    pub fn with_window(mut self, window: AlertWindow) -> Self {
        self.window = window;
        self
    }

    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }
}

/// Operator actions on the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelCommand {
    Dismiss(String),
    ToggleMinimized,
    SetMinimized(bool),
}

/// Handle for controlling a running monitor.
///
/// Dropping the handle (or calling [`MonitorHandle::shutdown`]) stops the
/// task, releases its hub subscription, and discards its dismissals.
pub struct MonitorHandle {
    commands: mpsc::Sender<PanelCommand>,
    views: watch::Receiver<PanelView>,
    task: JoinHandle<()>,
}

impl MonitorHandle {
    /// Send a command to the panel.
    pub async fn send(&self, command: PanelCommand) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| Error::StreamClosed("alert monitor is not running".into()))
    }

    pub async fn dismiss(&self, id: impl Into<String>) -> Result<()> {
        self.send(PanelCommand::Dismiss(id.into())).await
    }

    pub async fn toggle_minimized(&self) -> Result<()> {
        self.send(PanelCommand::ToggleMinimized).await
    }

    /// Receiver of rendered views. The current view is available immediately.
    pub fn views(&self) -> watch::Receiver<PanelView> {
        self.views.clone()
    }

    /// The most recently rendered view.
    pub fn current(&self) -> PanelView {
        self.views.borrow().clone()
    }

    /// Stop the monitor and wait for it to finish.
    pub async fn shutdown(self) -> Result<()> {
        let MonitorHandle { commands, task, .. } = self;
        drop(commands);
        task.await
            .map_err(|e| Error::Internal(format!("alert monitor task failed: {}", e)))
    }
}

/// Drives one [`AlertPanel`] from a hub subscription.
pub struct AlertMonitor {
    panel: AlertPanel,
    snapshots: watch::Receiver<StreamSnapshot>,
    clock: Arc<dyn Clock>,
    config: MonitorConfig,
}

impl AlertMonitor {
    /// Subscribe to `hub` and create a monitor with a fresh panel.
    pub fn new(hub: &NotificationHub, clock: Arc<dyn Clock>, config: MonitorConfig) -> Self {
        Self::from_receiver(hub.subscribe(), clock, config)
    }

    pub fn from_receiver(
        snapshots: watch::Receiver<StreamSnapshot>,
        clock: Arc<dyn Clock>,
        config: MonitorConfig,
    ) -> Self {
        Self {
            panel: AlertPanel::new(config.window),
            snapshots,
            clock,
            config,
        }
    }

    /// Start the monitor and return a handle for control.
    pub fn start(mut self) -> MonitorHandle {
        let initial = self.snapshots.borrow_and_update().clone();
        self.panel.apply_snapshot(initial);
        let (views_tx, views_rx) = watch::channel(self.panel.view(self.clock.now()));
        let (commands_tx, commands_rx) = mpsc::channel(self.config.command_capacity.max(1));

        let task = tokio::spawn(async move {
            self.run(commands_rx, views_tx).await;
        });

        MonitorHandle {
            commands: commands_tx,
            views: views_rx,
            task,
        }
    }

    fn handle_command(&mut self, command: PanelCommand) {
        match command {
            PanelCommand::Dismiss(id) => {
                self.panel.dismiss(&id);
            }
            PanelCommand::ToggleMinimized => {
                let minimized = self.panel.toggle_minimized();
                debug!(minimized, "Alert panel toggled");
            }
            PanelCommand::SetMinimized(minimized) => self.panel.set_minimized(minimized),
        }
    }

    /// Publish the current view if anything but its timestamp changed.
    fn publish(&self, views: &watch::Sender<PanelView>) {
        let next = self.panel.view(self.clock.now());
        views.send_if_modified(|current| {
            let changed = current.status != next.status
                || current.counts != next.counts
                || current.minimized != next.minimized
                || current.body != next.body;
            if changed {
                let span = tracing::Span::current();
                span.record(VISIBLE_COUNT, next.body.len());
                span.record(DISMISSED_COUNT, self.panel.dismissed_count());
                debug!("Alert view updated");
                *current = next;
            }
            changed
        });
    }

    #[instrument(
        skip_all,
        fields(
            subsystem = "alerts",
            component = "monitor",
            visible_count = tracing::field::Empty,
            dismissed_count = tracing::field::Empty,
        )
    )]
    async fn run(
        mut self,
        mut commands: mpsc::Receiver<PanelCommand>,
        views: watch::Sender<PanelView>,
    ) {
        info!(
            refresh_secs = self.config.refresh_interval.as_secs(),
            max_visible = self.config.window.max_visible,
            "Alert monitor started"
        );

        let mut ticker = tokio::time::interval(self.config.refresh_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        let mut stream_open = true;
        loop {
            tokio::select! {
                changed = self.snapshots.changed(), if stream_open => {
                    match changed {
                        Ok(()) => {
                            let snapshot = self.snapshots.borrow_and_update().clone();
                            self.panel.apply_snapshot(snapshot);
                        }
                        Err(_) => {
                            // Keep rendering the last snapshot.
                            info!("Notification hub closed, alert monitor keeps last snapshot");
                            stream_open = false;
                        }
                    }
                }
                command = commands.recv() => {
                    match command {
                        Some(command) => self.handle_command(command),
                        None => break,
                    }
                }
                _ = ticker.tick() => {}
            }
            self.publish(&views);
        }

        info!(
            dismissed_count = self.panel.dismissed_count(),
            "Alert monitor stopped"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitor_config_default() {
        let config = MonitorConfig::default();
        assert_eq!(config.window.max_visible, 5);
        assert_eq!(config.refresh_interval, Duration::from_secs(60));
        assert_eq!(config.command_capacity, defaults::MONITOR_COMMAND_CAPACITY);
    }

    #[test]
    fn test_monitor_config_builder() {
        let config = MonitorConfig::default()
            .with_refresh_interval(Duration::from_secs(5))
            .with_window(AlertWindow::default().with_max_visible(3));
        assert_eq!(config.refresh_interval, Duration::from_secs(5));
        assert_eq!(config.window.max_visible, 3);
    }

    #[test]
    fn test_monitor_config_rejects_zero_and_garbage() {
        let config = MonitorConfig::from_lookup(|key| match key {
            "WASHLINE_ALERT_MAX_VISIBLE" => Some("0".to_string()),
            "WASHLINE_ALERT_MAX_AGE_HOURS" => Some("-4".to_string()),
            "WASHLINE_ALERT_REFRESH_SECS" => Some("soon".to_string()),
            _ => None,
        });
        assert_eq!(config.window, AlertWindow::default());
        assert_eq!(
            config.refresh_interval,
            Duration::from_secs(defaults::ALERT_REFRESH_SECS)
        );
    }

    #[test]
    fn test_monitor_config_from_lookup_overrides() {
        let config = MonitorConfig::from_lookup(|key| match key {
            "WASHLINE_ALERT_MAX_VISIBLE" => Some(" 3 ".to_string()),
            "WASHLINE_ALERT_MAX_AGE_HOURS" => Some("6".to_string()),
            "WASHLINE_ALERT_REFRESH_SECS" => Some("0".to_string()),
            _ => None,
        });
        assert_eq!(config.window.max_visible, 3);
        assert_eq!(config.window.max_age, chrono::Duration::hours(6));
        assert_eq!(config.refresh_interval, Duration::from_secs(1));
    }

    #[test]
    fn test_panel_command_equality() {
        assert_eq!(
            PanelCommand::Dismiss("a".into()),
            PanelCommand::Dismiss("a".into())
        );
        assert_ne!(PanelCommand::ToggleMinimized, PanelCommand::SetMinimized(true));
    }
}
