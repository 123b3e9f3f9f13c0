//! BankOS session & access-control core.
//!
//! Everything the console needs to authenticate a principal, keep the
//! session window alive against user activity, expire it on idle, and gate
//! navigation by role. The dashboard pages themselves are external
//! collaborators; this crate only owns the session lifecycle.

pub mod activity;
pub mod clock;
pub mod config;
pub mod context;
pub mod credentials;
pub mod error;
pub mod guard;
pub mod identity;
pub mod monitor;
pub mod store;
pub mod token;
