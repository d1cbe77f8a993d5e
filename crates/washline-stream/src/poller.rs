//! Stream poller: drives a [`NotificationSource`] and feeds the hub.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, instrument, warn};

use washline_core::logging::{CONNECTED, ERROR_MSG, FAILURES};
use washline_core::{Clock, Error, NotificationHub, Result};

use crate::source::NotificationSource;

/// Handle for controlling a running poller.
pub struct PollerHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Signal the poller to stop and wait for it.
    pub async fn shutdown(self) -> Result<()> {
        // The task may already be gone; a closed channel is fine.
        let _ = self.shutdown_tx.send(()).await;
        self.task
            .await
            .map_err(|e| Error::Internal(format!("stream poller task failed: {}", e)))
    }
}

/// Polls a source on a fixed interval and publishes into a hub.
pub struct StreamPoller {
    source: Arc<dyn NotificationSource>,
    hub: Arc<NotificationHub>,
    clock: Arc<dyn Clock>,
    interval: Duration,
    consecutive_failures: u32,
}

impl StreamPoller {
    pub fn new(
        source: Arc<dyn NotificationSource>,
        hub: Arc<NotificationHub>,
        clock: Arc<dyn Clock>,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            hub,
            clock,
            interval,
            consecutive_failures: 0,
        }
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Fetch once and update the hub.
    ///
    /// Success publishes a connected snapshot. Failure marks the hub
    /// disconnected, keeps its last data, and returns the error.
    pub async fn poll_once(&mut self) -> Result<()> {
        match self.source.fetch().await {
            Ok(snapshot) => {
                if self.consecutive_failures > 0 {
                    info!(
                        failures = self.consecutive_failures,
                        "Notification feed recovered"
                    );
                    tracing::Span::current().record(FAILURES, 0u32);
                }
                self.consecutive_failures = 0;
                self.hub
                    .publish(snapshot.notifications, snapshot.counts, self.clock.now());
                tracing::Span::current().record(CONNECTED, true);
                Ok(())
            }
            Err(e) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                let span = tracing::Span::current();
                span.record(CONNECTED, false);
                span.record(FAILURES, self.consecutive_failures);
                span.record(ERROR_MSG, tracing::field::display(&e));
                warn!("Notification feed fetch failed");
                self.hub.mark_disconnected();
                Err(e)
            }
        }
    }

    /// Start polling and return a handle for control.
    pub fn start(self) -> PollerHandle {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel(1);
        let task = tokio::spawn(async move {
            self.run(&mut shutdown_rx).await;
        });
        PollerHandle { shutdown_tx, task }
    }

    #[instrument(
        skip_all,
        fields(
            subsystem = "stream",
            component = "poller",
            connected = tracing::field::Empty,
            consecutive_failures = tracing::field::Empty,
            error = tracing::field::Empty,
        )
    )]
    async fn run(mut self, shutdown_rx: &mut mpsc::Receiver<()>) {
        info!(
            interval_secs = self.interval.as_secs(),
            "Notification stream poller started"
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!("Notification stream poller received shutdown signal");
                    break;
                }
                _ = ticker.tick() => {
                    // Errors are already reflected in the hub's connected flag.
                    let _ = self.poll_once().await;
                }
            }
        }

        info!("Notification stream poller stopped");
    }
}
