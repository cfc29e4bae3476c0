//! Media repository for database operations

use async_trait::async_trait;
use common::error::DatabaseResult;
use sqlx::PgPool;

use super::MediaStore;
use crate::models::media::{MediaEntry, MediaPatch, NewMedia};

const COLUMNS: &str =
    "id, user_id, title, media_type, status, next_release_date, tmdb_id, tmdb_type, poster_path";

/// Media repository for database operations
#[derive(Clone)]
pub struct MediaRepository {
    pool: PgPool,
}

impl MediaRepository {
    /// Create a new media repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MediaStore for MediaRepository {
    async fn list(&self, owner_id: i64) -> DatabaseResult<Vec<MediaEntry>> {
        let items = sqlx::query_as::<_, MediaEntry>(&format!(
            "SELECT {COLUMNS} FROM media WHERE user_id = $1 ORDER BY id"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn find(&self, owner_id: i64, id: i64) -> DatabaseResult<Option<MediaEntry>> {
        let item = sqlx::query_as::<_, MediaEntry>(&format!(
            "SELECT {COLUMNS} FROM media WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    async fn create(&self, owner_id: i64, media: &NewMedia) -> DatabaseResult<MediaEntry> {
        let item = sqlx::query_as::<_, MediaEntry>(&format!(
            r#"
            INSERT INTO media (user_id, title, media_type, status, next_release_date,
                               tmdb_id, tmdb_type, poster_path)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(owner_id)
        .bind(&media.title)
        .bind(&media.media_type)
        .bind(&media.status)
        .bind(&media.next_release_date)
        .bind(media.tmdb_id)
        .bind(&media.tmdb_type)
        .bind(&media.poster_path)
        .fetch_one(&self.pool)
        .await?;

        Ok(item)
    }

    async fn update(
        &self,
        owner_id: i64,
        id: i64,
        patch: &MediaPatch,
    ) -> DatabaseResult<Option<MediaEntry>> {
        // Ownership check and write happen in one statement.
        let item = sqlx::query_as::<_, MediaEntry>(&format!(
            r#"
            UPDATE media SET
                title             = COALESCE($3, title),
                media_type        = COALESCE($4, media_type),
                status            = COALESCE($5, status),
                next_release_date = CASE WHEN $6 THEN $7 ELSE next_release_date END,
                tmdb_id           = CASE WHEN $8 THEN $9 ELSE tmdb_id END,
                tmdb_type         = CASE WHEN $10 THEN $11 ELSE tmdb_type END,
                poster_path       = CASE WHEN $12 THEN $13 ELSE poster_path END
            WHERE id = $1 AND user_id = $2
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(owner_id)
        .bind(&patch.title)
        .bind(&patch.media_type)
        .bind(&patch.status)
        .bind(patch.next_release_date.is_some())
        .bind(patch.next_release_date.clone().flatten())
        .bind(patch.tmdb_id.is_some())
        .bind(patch.tmdb_id.flatten())
        .bind(patch.tmdb_type.is_some())
        .bind(patch.tmdb_type.clone().flatten())
        .bind(patch.poster_path.is_some())
        .bind(patch.poster_path.clone().flatten())
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    async fn delete(&self, owner_id: i64, id: i64) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM media WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
