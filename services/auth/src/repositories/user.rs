//! PostgreSQL user repository

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::PgPool;
use tracing::{info, warn};

use super::UserStore;
use crate::{
    error::CreateUserError,
    models::{NewUser, User},
};

const USERNAME_CONSTRAINT: &str = "users_username_key";
const EMAIL_CONSTRAINT: &str = "users_email_key";

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn exists(&self, column_query: &str, value: &str) -> DatabaseResult<bool> {
        let found: bool = sqlx::query_scalar(column_query)
            .bind(value)
            .fetch_one(&self.pool)
            .await?;
        Ok(found)
    }
}

/// Map a unique-violation raised by a racing insert to the matching duplicate
fn map_insert_error(err: sqlx::Error) -> CreateUserError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            match db_err.constraint() {
                Some(USERNAME_CONSTRAINT) => return CreateUserError::DuplicateUsername,
                Some(EMAIL_CONSTRAINT) => return CreateUserError::DuplicateEmail,
                _ => {}
            }
        }
    }
    CreateUserError::Database(DatabaseError::Query(err))
}

#[async_trait]
impl UserStore for UserRepository {
    async fn create(&self, new_user: &NewUser) -> Result<User, CreateUserError> {
        info!("Creating new user: {}", new_user.username);

        if self
            .exists(
                "SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)",
                &new_user.username,
            )
            .await?
        {
            return Err(CreateUserError::DuplicateUsername);
        }

        if self
            .exists(
                "SELECT EXISTS (SELECT 1 FROM users WHERE email = LOWER($1))",
                &new_user.email,
            )
            .await?
        {
            return Err(CreateUserError::DuplicateEmail);
        }

        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, LOWER($2), $3)
            RETURNING id, username, email, password_hash, created_at
            "#,
        )
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let mapped = map_insert_error(e);
            if !matches!(mapped, CreateUserError::Database(_)) {
                warn!("Concurrent signup lost the race: {}", mapped);
            }
            mapped
        })
    }

    async fn find_by_username_or_email(&self, identifier: &str) -> DatabaseResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE username = $1 OR email = LOWER($1)
            ORDER BY (username = $1) DESC
            LIMIT 1
            "#,
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn delete(&self, id: i64) -> DatabaseResult<bool> {
        info!("Deleting user {} and owned media", id);

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM media WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }
}
