//! Durable client-side persistence for identity, session, and access token.
//!
//! Pure persistence boundary: `save`/`load`/`clear` plus token variants.
//! Corrupt or unreadable records are dropped and treated as absent; the
//! store never surfaces corruption to callers. Record names follow the
//! console's storage keys.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::{AppResult, AuthError};
use crate::identity::{Identity, Session};
use crate::token::AccessToken;

const USER_KEY: &str = "bankos_user.json";
const SESSION_KEY: &str = "bankos_session.json";
const TOKEN_KEY: &str = "bankos_token.json";

#[derive(Debug)]
pub struct SessionStore {
    root: PathBuf,
}

impl SessionStore {
    pub fn new(root: impl AsRef<Path>) -> AppResult<Self> {
        fs::create_dir_all(root.as_ref()).map_err(|e| AuthError::io(e.to_string()))?;
        Ok(Self { root: root.as_ref().to_path_buf() })
    }

    fn path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    fn write_record<T: Serialize>(&self, key: &str, value: &T) -> AppResult<()> {
        let bytes = serde_json::to_vec(value).map_err(|e| AuthError::io(e.to_string()))?;
        fs::write(self.path(key), bytes).map_err(|e| AuthError::io(e.to_string()))
    }

    // Typed load doubles as schema validation; a record that fails to
    // deserialize is removed and reported as absent.
    fn read_record<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.path(key);
        let bytes = fs::read(&path).ok()?;
        match serde_json::from_slice(&bytes) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(target: "store", "dropping corrupt record {}: {}", key, e);
                let _ = fs::remove_file(&path);
                None
            }
        }
    }

    fn remove(&self, key: &str) {
        let _ = fs::remove_file(self.path(key));
    }

    pub fn save(&self, identity: &Identity, session: &Session) -> AppResult<()> {
        self.write_record(USER_KEY, identity)?;
        self.write_record(SESSION_KEY, session)
    }

    /// Load the persisted pair. Either half missing or corrupt means no
    /// session at all; the leftovers are cleared.
    pub fn load(&self) -> Option<(Identity, Session)> {
        let identity = self.read_record::<Identity>(USER_KEY);
        let session = self.read_record::<Session>(SESSION_KEY);
        match (identity, session) {
            (Some(i), Some(s)) => Some((i, s)),
            (None, None) => None,
            _ => {
                self.clear();
                None
            }
        }
    }

    /// Idempotent; clearing an empty store is a no-op.
    pub fn clear(&self) {
        self.remove(USER_KEY);
        self.remove(SESSION_KEY);
        self.remove(TOKEN_KEY);
    }

    pub fn save_token(&self, token: &AccessToken) -> AppResult<()> {
        self.write_record(TOKEN_KEY, token)
    }

    pub fn load_token(&self) -> Option<AccessToken> {
        self.read_record(TOKEN_KEY)
    }

    /// Raw serialized token for edge-layer consumers (the route guard
    /// performs its own schema-validating parse).
    pub fn load_raw_token(&self) -> Option<String> {
        fs::read_to_string(self.path(TOKEN_KEY)).ok()
    }

    pub fn clear_token(&self) {
        self.remove(TOKEN_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::identity::{ClientInfo, SessionManager};
    use chrono::{Duration, Utc};

    fn fixtures() -> (Identity, Session) {
        let now = Utc::now();
        let identity = Identity::admin("1", "admin", "Bank Administrator", now);
        let session =
            SessionManager::new(SessionConfig::default()).issue("1", &ClientInfo::default(), now);
        (identity, session)
    }

    #[test]
    fn save_load_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::new(tmp.path()).unwrap();
        let (identity, session) = fixtures();
        store.save(&identity, &session).unwrap();
        let (i, s) = store.load().expect("persisted pair");
        assert_eq!(i, identity);
        assert_eq!(s, session);
    }

    #[test]
    fn corrupt_session_record_clears_both() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::new(tmp.path()).unwrap();
        let (identity, session) = fixtures();
        store.save(&identity, &session).unwrap();
        std::fs::write(tmp.path().join(SESSION_KEY), b"{broken").unwrap();
        assert!(store.load().is_none());
        // The identity half must not survive alone.
        assert!(!tmp.path().join(USER_KEY).exists());
    }

    #[test]
    fn wrong_shape_is_corruption_too() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::new(tmp.path()).unwrap();
        let (identity, session) = fixtures();
        store.save(&identity, &session).unwrap();
        // Valid JSON, wrong schema.
        std::fs::write(tmp.path().join(USER_KEY), b"{\"hello\":\"world\"}").unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn clear_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::new(tmp.path()).unwrap();
        store.clear();
        store.clear();
        assert!(store.load().is_none());
        assert!(store.load_token().is_none());
    }

    #[test]
    fn token_roundtrip_and_raw() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::new(tmp.path()).unwrap();
        let (identity, _) = fixtures();
        let tok = AccessToken::issue(&identity, Duration::hours(24), Utc::now());
        store.save_token(&tok).unwrap();
        assert_eq!(store.load_token().unwrap(), tok);
        let raw = store.load_raw_token().unwrap();
        assert_eq!(AccessToken::parse(&raw).unwrap(), tok);
        store.clear_token();
        assert!(store.load_raw_token().is_none());
    }
}
