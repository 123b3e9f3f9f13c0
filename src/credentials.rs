//! Closed credential directory with Argon2-hashed secrets.
//!
//! The console authenticates against a fixed set of known identities; the
//! directory holds PHC-format hashes rather than plaintext so a port to a
//! real backend keeps the same verification path.

use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};

use chrono::{DateTime, Utc};

use crate::error::{AppResult, AuthError};
use crate::identity::{Identity, Role};

#[derive(Debug, Clone)]
pub struct CredentialRecord {
    pub user_id: String,
    pub username: String,
    pub role: Role,
    pub name: String,
    pub account_number: Option<String>,
    password_hash: String,
}

impl CredentialRecord {
    /// Materialize the principal for a fresh login.
    pub fn to_identity(&self, now: DateTime<Utc>) -> Identity {
        match self.role {
            Role::Admin => Identity::admin(&self.user_id, &self.username, &self.name, now),
            Role::Customer => Identity::customer(
                &self.user_id,
                &self.username,
                &self.name,
                self.account_number.as_deref().unwrap_or_default(),
                now,
            ),
        }
    }
}

fn hash_password(password: &str) -> AppResult<String> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).map_err(|e| AuthError::io(e.to_string()))?;
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| AuthError::io(e.to_string()))?;
    let argon2 = Argon2::default();
    let phc = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::io(e.to_string()))?
        .to_string();
    Ok(phc)
}

fn verify_password(hash: &str, password: &str) -> bool {
    if let Ok(parsed) = PasswordHash::new(hash) {
        Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok()
    } else {
        false
    }
}

#[derive(Debug, Default)]
pub struct CredentialDirectory {
    users: Vec<CredentialRecord>,
}

impl CredentialDirectory {
    pub fn empty() -> Self {
        Self { users: Vec::new() }
    }

    /// Directory seeded with the console's two fixed credential pairs.
    pub fn with_defaults() -> AppResult<Self> {
        let mut dir = Self::empty();
        dir.insert(CredentialRecord {
            user_id: "1".into(),
            username: "admin".into(),
            role: Role::Admin,
            name: "Bank Administrator".into(),
            account_number: None,
            password_hash: hash_password("admin123")?,
        });
        dir.insert(CredentialRecord {
            user_id: "2".into(),
            username: "customer".into(),
            role: Role::Customer,
            name: "John Doe".into(),
            account_number: Some("1234567890".into()),
            password_hash: hash_password("customer123")?,
        });
        Ok(dir)
    }

    pub fn add_admin(&mut self, username: &str, password: &str, name: &str) -> AppResult<()> {
        let rec = CredentialRecord {
            user_id: uuid::Uuid::new_v4().to_string(),
            username: username.to_string(),
            role: Role::Admin,
            name: name.to_string(),
            account_number: None,
            password_hash: hash_password(password)?,
        };
        self.insert(rec);
        Ok(())
    }

    pub fn add_customer(
        &mut self,
        username: &str,
        password: &str,
        name: &str,
        account_number: &str,
    ) -> AppResult<()> {
        let rec = CredentialRecord {
            user_id: uuid::Uuid::new_v4().to_string(),
            username: username.to_string(),
            role: Role::Customer,
            name: name.to_string(),
            account_number: Some(account_number.to_string()),
            password_hash: hash_password(password)?,
        };
        self.insert(rec);
        Ok(())
    }

    // Replaces any existing row for the username.
    fn insert(&mut self, rec: CredentialRecord) {
        self.users.retain(|r| r.username != rec.username);
        self.users.push(rec);
    }

    /// Verify a credential pair. Returns the matching record, or `None` for
    /// both unknown-user and wrong-secret so callers cannot distinguish.
    pub fn verify(&self, username: &str, password: &str) -> Option<&CredentialRecord> {
        let rec = self.users.iter().find(|r| r.username == username)?;
        if verify_password(&rec.password_hash, password) {
            Some(rec)
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
