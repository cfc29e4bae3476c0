//! Credential store interface and implementations

use async_trait::async_trait;
use common::error::DatabaseResult;

use crate::{
    error::CreateUserError,
    models::{NewUser, User},
};

pub mod user;

pub use user::UserRepository;

/// Persistence for user identities and password hashes
///
/// Implementations must enforce username and email uniqueness at the storage
/// layer so that two racing signups cannot both succeed.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user after checking that neither username nor email is taken
    async fn create(&self, new_user: &NewUser) -> Result<User, CreateUserError>;

    /// Find a user by exact username or by (lowercased) email; a username
    /// match wins if the identifier matches two different users
    async fn find_by_username_or_email(&self, identifier: &str) -> DatabaseResult<Option<User>>;

    /// Find a user by ID
    async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<User>>;

    /// Delete a user together with every media entry they own
    async fn delete(&self, id: i64) -> DatabaseResult<bool>;
}
