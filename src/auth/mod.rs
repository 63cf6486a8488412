//! Operator authentication: password hashing, session tokens, and the guard
//! that ties both to the operator store.

pub mod guard;
pub mod password;
pub mod session;

pub use guard::AuthGuard;
pub use session::{SessionClaims, SessionSigner, SessionToken};
