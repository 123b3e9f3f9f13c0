//! Session timing configuration.
//!
//! Defaults: a 30-minute activity window, a 5-minute expiry warning, a
//! 60-second evaluation tick, and a 24-hour access-token lifetime. The
//! token lifetime and the session timeout are deliberately independent
//! knobs; see DESIGN.md.

use chrono::Duration;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Inactivity window after which the session expires.
    pub session_timeout: Duration,
    /// Remaining-time boundary below which the renew prompt is raised.
    pub warning_threshold: Duration,
    /// Period of the session clock's evaluation tick.
    pub tick_interval: Duration,
    /// Lifetime of the lightweight access token read by the route guard.
    pub token_ttl: Duration,
    /// Minimum spacing between persisted activity refreshes. Bounds the
    /// write rate of pointer-move-grade signals; expiry still reflects the
    /// latest activity within one window of lag.
    pub activity_debounce: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_timeout: Duration::minutes(30),
            warning_threshold: Duration::minutes(5),
            tick_interval: Duration::seconds(60),
            token_ttl: Duration::hours(24),
            activity_debounce: Duration::seconds(5),
        }
    }
}

fn env_secs(name: &str) -> Option<Duration> {
    std::env::var(name).ok()?.trim().parse::<i64>().ok().map(Duration::seconds)
}

impl SessionConfig {
    /// Build from environment overrides, falling back to defaults:
    /// `BANKOS_SESSION_TIMEOUT_SECS`, `BANKOS_WARNING_THRESHOLD_SECS`,
    /// `BANKOS_TICK_INTERVAL_SECS`, `BANKOS_TOKEN_TTL_SECS`,
    /// `BANKOS_ACTIVITY_DEBOUNCE_SECS`.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            session_timeout: env_secs("BANKOS_SESSION_TIMEOUT_SECS").unwrap_or(d.session_timeout),
            warning_threshold: env_secs("BANKOS_WARNING_THRESHOLD_SECS").unwrap_or(d.warning_threshold),
            tick_interval: env_secs("BANKOS_TICK_INTERVAL_SECS").unwrap_or(d.tick_interval),
            token_ttl: env_secs("BANKOS_TOKEN_TTL_SECS").unwrap_or(d.token_ttl),
            activity_debounce: env_secs("BANKOS_ACTIVITY_DEBOUNCE_SECS").unwrap_or(d.activity_debounce),
        }
    }
}
