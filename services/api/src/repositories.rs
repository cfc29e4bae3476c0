//! Media catalog store interface and implementations
//!
//! Every operation is scoped to an owner id supplied by the caller. The store
//! trusts that id; deriving it from the session is the handler's job.

use async_trait::async_trait;
use common::error::DatabaseResult;

use crate::models::media::{MediaEntry, MediaPatch, NewMedia};

pub mod media;
pub mod memory;

pub use media::MediaRepository;
pub use memory::MemoryStore;

/// Owner-scoped persistence for media entries
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// All entries owned by `owner_id`, in insertion order
    async fn list(&self, owner_id: i64) -> DatabaseResult<Vec<MediaEntry>>;

    /// A single entry; `None` when the id is unknown or owned by someone else
    async fn find(&self, owner_id: i64, id: i64) -> DatabaseResult<Option<MediaEntry>>;

    /// Persist a new entry for `owner_id`
    async fn create(&self, owner_id: i64, media: &NewMedia) -> DatabaseResult<MediaEntry>;

    /// Apply a partial update; `None` when the id is unknown or owned by
    /// someone else
    async fn update(
        &self,
        owner_id: i64,
        id: i64,
        patch: &MediaPatch,
    ) -> DatabaseResult<Option<MediaEntry>>;

    /// Delete an entry; `false` when the id is unknown or owned by someone else
    async fn delete(&self, owner_id: i64, id: i64) -> DatabaseResult<bool>;
}
