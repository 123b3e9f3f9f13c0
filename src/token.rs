//! Lightweight access token read by the route guard.
//!
//! Mirrors the identity record for edge-layer consumers, the way a cookie
//! would at a network boundary. Its lifetime is independent of the session
//! timeout (24 h vs 30 min by default).

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppResult, AuthError};
use crate::identity::Identity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub identity: Identity,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn issue(identity: &Identity, ttl: Duration, now: DateTime<Utc>) -> Self {
        Self {
            identity: identity.clone(),
            issued_at: now,
            expires_at: now + ttl,
        }
    }

    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// Schema-validating parse. Any failure, from truncated JSON to a
    /// missing field, is corruption; callers treat corrupt as absent.
    pub fn parse(raw: &str) -> AppResult<Self> {
        serde_json::from_str(raw).map_err(|e| AuthError::corrupt(e.to_string()))
    }

    pub fn to_json(&self) -> AppResult<String> {
        serde_json::to_string(self).map_err(|e| AuthError::io(e.to_string()))
    }
}
