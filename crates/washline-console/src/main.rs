//! washline-console: live alert panel for platform operators.
//!
//! Polls the backend's live notification feed, keeps the latest snapshot in
//! a [`NotificationHub`], and renders the alert panel to stdout whenever it
//! changes. Operator commands are read from stdin.

mod commands;

use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use washline_alerts::{render_text, AlertMonitor, MonitorConfig};
use washline_core::{Clock, CredentialProvider, EnvCredentials, NotificationHub, SystemClock};
use washline_stream::{HttpNotificationSource, NotificationSource, StreamConfig, StreamPoller};

use crate::commands::{OperatorInput, HELP};

/// Initialize tracing with configurable output.
///
/// Environment variables:
///   LOG_FORMAT  - "json" or "text" (default: "text")
///   LOG_FILE    - path to log file (optional, enables file logging)
///   LOG_ANSI    - "true"/"false" override ANSI colors (auto-detected by default)
///   RUST_LOG    - standard env filter (default: "washline=info")
///
/// Console output goes to stderr so stdout stays reserved for the panel.
fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "washline_console=info,washline_stream=info,washline_alerts=info,washline_core=info".into()
    });

    let registry = tracing_subscriber::registry().with(env_filter);

    let guard = if let Some(ref path) = log_file {
        let path = std::path::Path::new(path);
        let file_dir = path.parent().unwrap_or(std::path::Path::new("."));
        let file_name = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("washline-console.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(log_ansi.unwrap_or(false));
            registry.with(layer).init();
        }
        Some(guard)
    } else {
        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stderr)"),
        "Logging initialized"
    );
    guard
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();
    let _log_guard = init_logging();

    let stream_config = StreamConfig::load().context("invalid notification stream config")?;
    let monitor_config = MonitorConfig::from_env();
    info!(
        endpoint = %stream_config.endpoint(),
        poll_interval_secs = stream_config.poll_interval_secs,
        max_visible = monitor_config.window.max_visible,
        "Starting washline console"
    );

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let credentials: Arc<dyn CredentialProvider> =
        Arc::new(EnvCredentials::new(stream_config.token_env.clone()));
    if credentials.bearer_token().is_none() {
        warn!(
            token_env = %stream_config.token_env,
            "No API token found, requests will be unauthenticated"
        );
    }

    let hub = Arc::new(NotificationHub::new());
    let source: Arc<dyn NotificationSource> = Arc::new(
        HttpNotificationSource::new(&stream_config, credentials)
            .context("failed to create notification source")?,
    );

    let monitor = AlertMonitor::new(&hub, clock.clone(), monitor_config).start();
    let poller = StreamPoller::new(
        source,
        hub.clone(),
        clock,
        stream_config.poll_interval(),
    )
    .start();

    let mut views = monitor.views();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    println!("{}", HELP);
    print!("{}", render_text(&views.borrow_and_update()));

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl-C, shutting down");
                break;
            }
            changed = views.changed() => {
                if changed.is_err() {
                    warn!("Alert monitor stopped unexpectedly");
                    break;
                }
                let view = views.borrow_and_update().clone();
                print!("{}", render_text(&view));
            }
            line = lines.next_line(), if stdin_open => {
                match line {
                    Ok(Some(line)) => match commands::parse(&line) {
                        Some(OperatorInput::Panel(command)) => {
                            monitor.send(command).await?;
                        }
                        Some(OperatorInput::Help) => println!("{}", HELP),
                        Some(OperatorInput::Quit) => break,
                        None if line.trim().is_empty() => {}
                        None => println!("unrecognized input; {}", HELP),
                    },
                    Ok(None) => stdin_open = false,
                    Err(e) => {
                        warn!(error = %e, "Failed to read stdin, ignoring further input");
                        stdin_open = false;
                    }
                }
            }
        }
    }

    poller.shutdown().await?;
    monitor.shutdown().await?;
    info!("washline console stopped");
    Ok(())
}
