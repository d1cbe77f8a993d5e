//! Collaborator traits injected into the stream client and alert monitor.
//!
//! Credentials and wall-clock time come in through these traits so that no
//! business logic reads ambient process state directly.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

// =============================================================================
// CREDENTIALS
// =============================================================================

/// Capability that yields the bearer token for backend calls.
pub trait CredentialProvider: Send + Sync {
    /// Current token, or `None` to send the request unauthenticated.
    fn bearer_token(&self) -> Option<String>;
}

/// Fixed token, or no token at all.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    token: Option<String>,
}

impl StaticCredentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self { token: None }
    }
}

impl CredentialProvider for StaticCredentials {
    fn bearer_token(&self) -> Option<String> {
        self.token.clone()
    }
}

/// Reads the token from an environment variable on every call, so a rotated
/// token is picked up without a restart.
#[derive(Debug, Clone)]
pub struct EnvCredentials {
    var: String,
}

impl EnvCredentials {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    pub fn var(&self) -> &str {
        &self.var
    }
}

impl CredentialProvider for EnvCredentials {
    fn bearer_token(&self) -> Option<String> {
        std::env::var(&self.var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

impl<T: CredentialProvider + ?Sized> CredentialProvider for Arc<T> {
    fn bearer_token(&self) -> Option<String> {
        (**self).bearer_token()
    }
}

// =============================================================================
// CLOCK
// =============================================================================

/// Source of wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually controlled clock for tests and replays.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Arc<RwLock<DateTime<Utc>>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(RwLock::new(now)),
        }
    }

    /// Move the clock to `now`. Clones share the same time.
    pub fn set(&self, now: DateTime<Utc>) {
        match self.now.write() {
            Ok(mut guard) => *guard = now,
            Err(poisoned) => *poisoned.into_inner() = now,
        }
    }

    pub fn advance(&self, by: chrono::Duration) {
        let next = self.now() + by;
        self.set(next);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        match self.now.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

impl<T: Clock + ?Sized> Clock for Arc<T> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}
