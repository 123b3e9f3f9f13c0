//! Identity and session primitives for the BankOS console.
//! Keep the public surface thin and split implementation across sub-modules.

mod principal;
mod provider;
mod session;

pub use principal::{Identity, Role};
pub use provider::{AuthProvider, LocalAuthProvider, LoginRequest, LoginResponse};
pub use session::{gen_id, ClientInfo, Session, SessionManager};
