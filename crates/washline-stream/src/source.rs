//! Notification sources.
//!
//! A source returns the backend's current notification list and priority
//! totals, or an explicit error. There is no fallback data: callers decide
//! what a failure means (the poller marks the hub offline).

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use washline_core::logging::{DURATION_MS, RECORD_COUNT};
use washline_core::{CredentialProvider, Error, NotificationRecord, PriorityCounts, Result};

use crate::config::StreamConfig;

/// One successful fetch from a source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceSnapshot {
    /// Notifications in delivery order.
    pub notifications: Vec<NotificationRecord>,
    pub counts: PriorityCounts,
}

/// Anything that can produce the current notification list.
#[async_trait]
pub trait NotificationSource: Send + Sync {
    async fn fetch(&self) -> Result<SourceSnapshot>;
}

/// Wire shape of the live notification endpoint.
#[derive(Debug, Deserialize)]
struct FeedResponse {
    #[serde(default)]
    notifications: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    stats: Option<serde_json::Value>,
}

/// Decode a feed body, skipping records that do not parse.
pub fn decode_feed(body: &[u8]) -> Result<SourceSnapshot> {
    let response: FeedResponse = serde_json::from_slice(body)?;
    let raw = response.notifications.unwrap_or_default();
    let total = raw.len();

    let notifications: Vec<NotificationRecord> = raw
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            match serde_json::from_value::<NotificationRecord>(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(index, error = %e, "Skipping malformed notification record");
                    None
                }
            }
        })
        .collect();

    if notifications.len() < total {
        debug!(
            total,
            kept = notifications.len(),
            "Feed contained malformed records"
        );
    }

    let counts = match response.stats {
        Some(stats) => serde_json::from_value::<PriorityCounts>(stats).unwrap_or_else(|e| {
            warn!(error = %e, "Ignoring malformed feed stats");
            PriorityCounts::default()
        }),
        None => PriorityCounts::default(),
    };

    Ok(SourceSnapshot {
        notifications,
        counts,
    })
}

/// Fetches the feed over HTTP with an injected credential provider.
pub struct HttpNotificationSource {
    client: Client,
    endpoint: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl HttpNotificationSource {
    pub fn new(config: &StreamConfig, credentials: Arc<dyn CredentialProvider>) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            endpoint: config.endpoint(),
            credentials,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl NotificationSource for HttpNotificationSource {
    #[instrument(
        skip(self),
        fields(
            subsystem = "stream",
            component = "http_source",
            record_count = tracing::field::Empty,
            duration_ms = tracing::field::Empty,
        )
    )]
    async fn fetch(&self) -> Result<SourceSnapshot> {
        let start = Instant::now();
        let mut request = self.client.get(&self.endpoint);
        if let Some(token) = self.credentials.bearer_token() {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Request(format!("GET {} failed: {}", self.endpoint, e)))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(Error::Unauthorized(format!(
                "notification feed returned {}",
                status
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Request(format!(
                "notification feed returned {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Request(format!("failed to read feed body: {}", e)))?;
        let snapshot = decode_feed(&body)?;

        let span = tracing::Span::current();
        span.record(RECORD_COUNT, snapshot.notifications.len());
        span.record(DURATION_MS, start.elapsed().as_millis() as u64);
        debug!("Fetched notification feed");
        Ok(snapshot)
    }
}
