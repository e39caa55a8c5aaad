//! # ccsba-auth
//!
//! Hashed-credential authentication module: argon2 password storage,
//! single-use email-verification and password-reset tokens, and HS256 JWT
//! session tokens.  Ships alongside the platform but is not wired into the
//! default login flow; [`TokenAuthenticator`] plugs it into
//! `ccsba_app::session::SessionManager` when wanted.

pub mod authenticator;
pub mod db;
pub mod password;
pub mod token;

mod error;

pub use authenticator::TokenAuthenticator;
pub use db::{AuthDb, User};
pub use error::{AuthError, Result};
pub use password::{hash_password, verify_password};
pub use token::{generate_token, secret_from_env, verify_token, Claims};
