//! Authentication for the CineRadar media tracker
//!
//! Provides the credential store, password hashing, session tokens and the
//! [`Authenticator`] that ties them together. HTTP wiring lives in the `api`
//! service; this crate has no knowledge of requests or cookies.

pub mod authenticator;
pub mod config;
pub mod error;
pub mod jwt;
pub mod models;
pub mod password;
pub mod repositories;
pub mod session;
pub mod validation;

pub use authenticator::{ActiveSession, Authenticator, Identity, SignedIn};
pub use config::AuthConfig;
pub use error::{AuthError, AuthResult, CreateUserError};
pub use jwt::SessionTokenService;
pub use password::{HashingConfig, PasswordService};
pub use repositories::{UserRepository, UserStore};
pub use session::{MemorySessionStore, RedisSessionStore, SessionStore};

/// Build an [`Authenticator`] from configuration and the chosen stores
pub fn build_authenticator(
    config: &AuthConfig,
    users: std::sync::Arc<dyn UserStore>,
    sessions: std::sync::Arc<dyn SessionStore>,
) -> AuthResult<Authenticator> {
    let passwords = PasswordService::new(config.hashing)?;
    let tokens = SessionTokenService::new(config.secret_key.as_bytes(), config.session_lifetime_secs)?;
    Ok(Authenticator::new(users, sessions, passwords, tokens))
}
