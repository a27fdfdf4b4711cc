//! The auth service: the only component that knows credentials.
//! Converts {email, password} into signed bearer tokens and back.

pub mod handlers;
pub mod password;
pub mod token;

pub use handlers::{router, AuthState, User};
