use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::SessionConfig;

/// 128-bit random id, base64url without padding.
pub fn gen_id() -> String {
    let mut buf = [0u8; 16];
    let _ = getrandom::getrandom(&mut buf);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buf)
}

/// Optional client metadata captured at login.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// A time-bounded authorization window tied to one identity.
/// `expires_at` always equals `last_activity + timeout` and never moves
/// backward while the session is alive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Session {
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        self.expires_at - now
    }
}

/// Issues and renews sessions against the configured timeout window.
/// Exactly one session per identity is modeled; issuing for the same user
/// simply replaces whatever the caller held before.
#[derive(Debug, Clone)]
pub struct SessionManager {
    config: SessionConfig,
}

impl SessionManager {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    pub fn issue(&self, user_id: &str, client: &ClientInfo, now: DateTime<Utc>) -> Session {
        let sess = Session {
            id: gen_id(),
            user_id: user_id.to_string(),
            created_at: now,
            last_activity: now,
            expires_at: now + self.config.session_timeout,
            ip_address: client.ip_address.clone(),
            user_agent: client.user_agent.clone(),
        };
        info!(
            target: "session",
            "session.issue user={} sid={} timeout_secs={}",
            user_id, sess.id, self.config.session_timeout.num_seconds()
        );
        sess
    }

    /// Record activity: `last_activity` moves to `now` and expiry is pushed
    /// forward. Expiry never decreases, even if the supplied clock reads
    /// earlier than the previous activity.
    pub fn renew(&self, session: &mut Session, now: DateTime<Utc>) {
        session.last_activity = now;
        let candidate = now + self.config.session_timeout;
        if candidate > session.expires_at {
            session.expires_at = candidate;
        }
    }
}
