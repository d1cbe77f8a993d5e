//! Display formatting: relative ages, metadata details, and the plain-text
//! rendering of a [`PanelView`] used by the console.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use washline_core::{NotificationMetadata, Priority};

use crate::panel::{ConnectionStatus, PanelBody, PanelView};

/// Human relative age, e.g. `"just now"`, `"12m ago"`, `"3h ago"`.
///
/// Timestamps in the future read as `"just now"`; a missing timestamp reads
/// as `"unknown time"`.
pub fn relative_age(created_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(created_at) = created_at else {
        return "unknown time".to_string();
    };
    let age = now.signed_duration_since(created_at);
    if age.num_minutes() < 1 {
        "just now".to_string()
    } else if age.num_hours() < 1 {
        format!("{}m ago", age.num_minutes())
    } else if age.num_days() < 1 {
        format!("{}h ago", age.num_hours())
    } else {
        format!("{}d ago", age.num_days())
    }
}

/// Display lines for the known metadata keys. Absent keys produce nothing.
pub fn metadata_details(metadata: &NotificationMetadata) -> Vec<String> {
    let mut details = Vec::new();
    if let Some(count) = metadata.tenant_count {
        let noun = if count == 1 { "tenant" } else { "tenants" };
        details.push(format!("{} {} affected", count, noun));
    }
    if let Some(amount) = metadata.amount {
        details.push(format!("amount {}", format_amount(amount)));
    }
    details
}

/// Two decimals with thousands separators: `1234567.5` → `"1,234,567.50"`.
pub fn format_amount(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, fraction)
}

fn status_badge(status: ConnectionStatus) -> &'static str {
    match status {
        ConnectionStatus::Waiting => "◌ Connecting",
        ConnectionStatus::Online => "● Live",
        ConnectionStatus::Offline => "○ Offline",
    }
}

/// Render a panel view as terminal text.
pub fn render_text(view: &PanelView) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "Live Alerts [{}]  P0:{} P1:{} P2:{}",
        status_badge(view.status),
        view.counts.get(Priority::P0),
        view.counts.get(Priority::P1),
        view.counts.get(Priority::P2),
    );

    if view.minimized {
        let _ = write!(out, "  ({} shown, minimized)", view.body.len());
        out.push('\n');
        return out;
    }
    out.push('\n');

    match &view.body {
        PanelBody::AllClear if view.status == ConnectionStatus::Waiting => {
            out.push_str("  … Waiting for notification feed\n");
        }
        PanelBody::AllClear => {
            out.push_str("  ✓ All systems operational\n");
        }
        PanelBody::Alerts { rows, hidden } => {
            for row in rows {
                let _ = writeln!(
                    out,
                    "  {} [{}] {} · {}",
                    row.category.icon(),
                    row.priority,
                    row.title,
                    row.age
                );
                if !row.message.is_empty() {
                    let _ = writeln!(out, "      {}", row.message);
                }
                for detail in &row.details {
                    let _ = writeln!(out, "      - {}", detail);
                }
                let _ = writeln!(out, "      id: {}", row.id);
            }
            if *hidden > 0 {
                let _ = writeln!(out, "  … {} more", hidden);
            }
        }
    }
    out
}
