use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The two role partitions of the console. Immutable after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Customer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Customer => "customer",
        }
    }

    /// Landing path for the role's partition.
    pub fn home_path(&self) -> &'static str {
        match self {
            Role::Admin => "/admin",
            Role::Customer => "/portal",
        }
    }
}

/// The authenticated principal. Created at successful login, destroyed at
/// logout or forced expiry. `account_number` is present iff the role is
/// `Customer`; the constructors are the only way to build one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub username: String,
    pub role: Role,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    pub last_activity: DateTime<Utc>,
}

impl Identity {
    pub fn admin(id: &str, username: &str, name: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: id.to_string(),
            username: username.to_string(),
            role: Role::Admin,
            name: name.to_string(),
            account_number: None,
            last_activity: now,
        }
    }

    pub fn customer(
        id: &str,
        username: &str,
        name: &str,
        account_number: &str,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.to_string(),
            username: username.to_string(),
            role: Role::Customer,
            name: name.to_string(),
            account_number: Some(account_number.to_string()),
            last_activity: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(serde_json::to_string(&Role::Customer).unwrap(), "\"customer\"");
    }

    #[test]
    fn account_number_iff_customer() {
        let now = Utc::now();
        let a = Identity::admin("1", "admin", "Bank Administrator", now);
        assert!(a.account_number.is_none());
        let c = Identity::customer("2", "customer", "John Doe", "1234567890", now);
        assert_eq!(c.account_number.as_deref(), Some("1234567890"));
    }
}
