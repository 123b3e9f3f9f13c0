//! Role-based navigation gate, evaluated before every route render.
//!
//! Decisions are always silent redirects, never errors. The guard reads
//! only the lightweight access token at the edge; it is a pure reader of
//! state the gateway and tracker maintain.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::identity::Role;
use crate::token::AccessToken;

/// Routes reachable without any identity.
pub const PUBLIC_ROUTES: &[&str] = &["/login", "/"];
/// Prefixes of the admin partition.
pub const ADMIN_ROUTES: &[&str] = &["/admin"];
/// Prefixes of the customer partition.
pub const CUSTOMER_ROUTES: &[&str] = &["/portal"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    RedirectToLogin,
    RedirectToAdminHome,
    RedirectToCustomerHome,
}

impl RouteDecision {
    /// Redirect destination, if any.
    pub fn target(&self) -> Option<&'static str> {
        match self {
            RouteDecision::Allow => None,
            RouteDecision::RedirectToLogin => Some("/login"),
            RouteDecision::RedirectToAdminHome => Some("/admin"),
            RouteDecision::RedirectToCustomerHome => Some("/portal"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    pub public: Vec<String>,
    pub admin: Vec<String>,
    pub customer: Vec<String>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            public: PUBLIC_ROUTES.iter().map(|s| s.to_string()).collect(),
            admin: ADMIN_ROUTES.iter().map(|s| s.to_string()).collect(),
            customer: CUSTOMER_ROUTES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl RouteTable {
    // Public match is exact or a child segment; "/" only matches itself.
    fn is_public(&self, path: &str) -> bool {
        self.public
            .iter()
            .any(|r| path == r || path.starts_with(&format!("{}/", r)))
    }

    fn is_admin_scoped(&self, path: &str) -> bool {
        self.admin.iter().any(|r| path.starts_with(r.as_str()))
    }

    fn is_customer_scoped(&self, path: &str) -> bool {
        self.customer.iter().any(|r| path.starts_with(r.as_str()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct RouteGuard {
    table: RouteTable,
}

impl RouteGuard {
    pub fn new(table: RouteTable) -> Self {
        Self { table }
    }

    /// Decide from the raw serialized token. A token that fails to parse
    /// sends the caller to login on any non-public path; a stale token is
    /// treated as absent.
    pub fn decide_raw(&self, path: &str, raw_token: Option<&str>, now: DateTime<Utc>) -> RouteDecision {
        if self.table.is_public(path) {
            return RouteDecision::Allow;
        }
        let token = match raw_token {
            None => None,
            Some(raw) => match AccessToken::parse(raw) {
                Ok(t) => Some(t),
                Err(e) => {
                    debug!(target: "guard", "unparseable token on {}: {}", path, e.message());
                    return RouteDecision::RedirectToLogin;
                }
            },
        };
        self.decide(path, token.as_ref(), now)
    }

    /// Decide with an already-parsed token (or none).
    pub fn decide(&self, path: &str, token: Option<&AccessToken>, now: DateTime<Utc>) -> RouteDecision {
        if self.table.is_public(path) {
            return RouteDecision::Allow;
        }
        let decision = match token.filter(|t| t.is_valid(now)) {
            None => {
                if self.table.is_admin_scoped(path) || self.table.is_customer_scoped(path) {
                    RouteDecision::RedirectToLogin
                } else {
                    RouteDecision::Allow
                }
            }
            Some(t) => match t.identity.role {
                Role::Admin if self.table.is_customer_scoped(path) => {
                    RouteDecision::RedirectToAdminHome
                }
                Role::Customer if self.table.is_admin_scoped(path) => {
                    RouteDecision::RedirectToCustomerHome
                }
                _ => RouteDecision::Allow,
            },
        };
        if decision != RouteDecision::Allow {
            debug!(target: "guard", "redirecting {} -> {:?}", path, decision.target());
        }
        decision
    }
}
