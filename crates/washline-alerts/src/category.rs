//! Event-type classification into icon categories.

use std::fmt;

use serde::Serialize;

/// Visual category of an alert, chosen from its `event_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertCategory {
    Security,
    Payment,
    Tenant,
    System,
    Generic,
}

/// Keyword rules, tested in order. First match wins.
const RULES: &[(&[&str], AlertCategory)] = &[
    (&["security", "breach"], AlertCategory::Security),
    (&["payment", "billing"], AlertCategory::Payment),
    (&["tenant", "user"], AlertCategory::Tenant),
    (&["system", "performance"], AlertCategory::System),
];

/// Classify an event type by case-insensitive substring match.
///
/// `"tenant_payment_security_alert"` is [`AlertCategory::Security`] because
/// security keywords are checked first.
pub fn classify(event_type: &str) -> AlertCategory {
    let lowered = event_type.to_lowercase();
    RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(_, category)| *category)
        .unwrap_or(AlertCategory::Generic)
}

impl AlertCategory {
    pub fn label(self) -> &'static str {
        match self {
            AlertCategory::Security => "security",
            AlertCategory::Payment => "payment",
            AlertCategory::Tenant => "tenant",
            AlertCategory::System => "system",
            AlertCategory::Generic => "alert",
        }
    }

    /// Terminal glyph shown next to the alert.
    pub fn icon(self) -> &'static str {
        match self {
            AlertCategory::Security => "🛡",
            AlertCategory::Payment => "💳",
            AlertCategory::Tenant => "👥",
            AlertCategory::System => "⚙",
            AlertCategory::Generic => "⚠",
        }
    }
}

impl fmt::Display for AlertCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
