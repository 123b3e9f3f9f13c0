//! Error taxonomy for the session subsystem.
//!
//! Every failure here is handled locally and converted to a state
//! transition or a redirect; nothing escapes to the end user as an
//! unhandled error. `CorruptPersistedState` in particular is recovered by
//! treating the record as absent and is only ever logged.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, thiserror::Error)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthError {
    /// Credentials did not match the directory. Deliberately opaque:
    /// unknown-user and wrong-secret are indistinguishable to the caller.
    #[error("invalid_credentials: {message}")]
    InvalidCredentials { message: String },
    /// A persisted record failed schema validation on load.
    #[error("corrupt_state: {message}")]
    CorruptPersistedState { message: String },
    /// The session window elapsed; the caller should surface a neutral
    /// "please sign in again" state, not an error dialog.
    #[error("session_expired: {message}")]
    SessionExpired { message: String },
    /// A role attempted to navigate outside its partition.
    #[error("unauthorized_route: {message}")]
    UnauthorizedRouteAccess { message: String },
    /// Store I/O that is not corruption (unwritable root, etc.).
    #[error("io: {message}")]
    Io { message: String },
}

impl AuthError {
    pub fn invalid_credentials() -> Self {
        AuthError::InvalidCredentials { message: "invalid credentials".into() }
    }
    pub fn corrupt<S: Into<String>>(msg: S) -> Self {
        AuthError::CorruptPersistedState { message: msg.into() }
    }
    pub fn expired() -> Self {
        AuthError::SessionExpired { message: "session expired".into() }
    }
    pub fn unauthorized<S: Into<String>>(msg: S) -> Self {
        AuthError::UnauthorizedRouteAccess { message: msg.into() }
    }
    pub fn io<S: Into<String>>(msg: S) -> Self {
        AuthError::Io { message: msg.into() }
    }

    pub fn message(&self) -> &str {
        match self {
            AuthError::InvalidCredentials { message }
            | AuthError::CorruptPersistedState { message }
            | AuthError::SessionExpired { message }
            | AuthError::UnauthorizedRouteAccess { message }
            | AuthError::Io { message } => message.as_str(),
        }
    }

    /// The only error a user can recover from by retrying input.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AuthError::InvalidCredentials { .. })
    }
}

impl From<std::io::Error> for AuthError {
    fn from(err: std::io::Error) -> Self {
        AuthError::Io { message: err.to_string() }
    }
}

pub type AppResult<T> = Result<T, AuthError>;
