use chrono::{DateTime, Utc};
use tracing::info;

use super::principal::Identity;
use super::session::{ClientInfo, Session, SessionManager};
use crate::credentials::CredentialDirectory;
use crate::error::{AppResult, AuthError};

// Keep request/response plain structs; nothing here crosses a wire.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    pub client: ClientInfo,
}

#[derive(Debug, Clone)]
pub struct LoginResponse {
    pub identity: Identity,
    pub session: Session,
}

pub trait AuthProvider: Send + Sync {
    fn login(&self, req: &LoginRequest, now: DateTime<Utc>) -> AppResult<LoginResponse>;
}

/// Gateway over the closed credential directory. On a match it constructs
/// the identity and issues a session for the full timeout window; on a
/// mismatch it fails with the opaque invalid-credentials error and leaves
/// no state behind.
pub struct LocalAuthProvider {
    directory: CredentialDirectory,
    sm: SessionManager,
}

impl LocalAuthProvider {
    pub fn new(directory: CredentialDirectory, sm: SessionManager) -> Self {
        Self { directory, sm }
    }
}

impl AuthProvider for LocalAuthProvider {
    fn login(&self, req: &LoginRequest, now: DateTime<Utc>) -> AppResult<LoginResponse> {
        let Some(rec) = self.directory.verify(&req.username, &req.password) else {
            return Err(AuthError::invalid_credentials());
        };
        let identity = rec.to_identity(now);
        let session = self.sm.issue(&identity.id, &req.client, now);
        info!(target: "auth", "auth.login user={} sid={}", req.username, session.id);
        Ok(LoginResponse { identity, session })
    }
}
