//! In-memory store for users and media
//!
//! Both tables live behind one lock, so uniqueness checks, ownership checks
//! and the user-to-media cascade each run in a single critical section.

use async_trait::async_trait;
use auth::{
    CreateUserError, UserStore,
    models::{NewUser, User},
};
use chrono::Utc;
use common::error::{DatabaseError, DatabaseResult};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::MediaStore;
use crate::models::media::{MediaEntry, MediaPatch, NewMedia};

#[derive(Debug, Default)]
struct State {
    users: BTreeMap<i64, User>,
    media: BTreeMap<i64, MediaEntry>,
    next_user_id: i64,
    next_media_id: i64,
}

impl State {
    fn owned_mut(&mut self, owner_id: i64, id: i64) -> Option<&mut MediaEntry> {
        self.media
            .get_mut(&id)
            .filter(|entry| entry.owner_id == owner_id)
    }
}

/// In-memory implementation of [`UserStore`] and [`MediaStore`]
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, new_user: &NewUser) -> Result<User, CreateUserError> {
        let mut state = self.state.lock().await;
        let email = new_user.email.to_lowercase();

        if state.users.values().any(|u| u.username == new_user.username) {
            return Err(CreateUserError::DuplicateUsername);
        }
        if state.users.values().any(|u| u.email == email) {
            return Err(CreateUserError::DuplicateEmail);
        }

        state.next_user_id += 1;
        let user = User {
            id: state.next_user_id,
            username: new_user.username.clone(),
            email,
            password_hash: new_user.password_hash.clone(),
            created_at: Utc::now(),
        };
        state.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_by_username_or_email(&self, identifier: &str) -> DatabaseResult<Option<User>> {
        let state = self.state.lock().await;
        let email = identifier.to_lowercase();

        let by_username = state.users.values().find(|u| u.username == identifier);
        let user = by_username.or_else(|| state.users.values().find(|u| u.email == email));

        Ok(user.cloned())
    }

    async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<User>> {
        Ok(self.state.lock().await.users.get(&id).cloned())
    }

    async fn delete(&self, id: i64) -> DatabaseResult<bool> {
        let mut state = self.state.lock().await;

        if state.users.remove(&id).is_none() {
            return Ok(false);
        }
        state.media.retain(|_, entry| entry.owner_id != id);

        Ok(true)
    }
}

#[async_trait]
impl MediaStore for MemoryStore {
    async fn list(&self, owner_id: i64) -> DatabaseResult<Vec<MediaEntry>> {
        let state = self.state.lock().await;

        Ok(state
            .media
            .values()
            .filter(|entry| entry.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn find(&self, owner_id: i64, id: i64) -> DatabaseResult<Option<MediaEntry>> {
        let state = self.state.lock().await;

        Ok(state
            .media
            .get(&id)
            .filter(|entry| entry.owner_id == owner_id)
            .cloned())
    }

    async fn create(&self, owner_id: i64, media: &NewMedia) -> DatabaseResult<MediaEntry> {
        let mut state = self.state.lock().await;

        if !state.users.contains_key(&owner_id) {
            return Err(DatabaseError::Integrity(format!(
                "media owner {} does not exist",
                owner_id
            )));
        }

        state.next_media_id += 1;
        let entry = MediaEntry {
            id: state.next_media_id,
            owner_id,
            title: media.title.clone(),
            media_type: media.media_type.clone(),
            status: media.status.clone(),
            next_release_date: media.next_release_date.clone(),
            tmdb_id: media.tmdb_id,
            tmdb_type: media.tmdb_type.clone(),
            poster_path: media.poster_path.clone(),
        };
        state.media.insert(entry.id, entry.clone());

        Ok(entry)
    }

    async fn update(
        &self,
        owner_id: i64,
        id: i64,
        patch: &MediaPatch,
    ) -> DatabaseResult<Option<MediaEntry>> {
        let mut state = self.state.lock().await;

        Ok(state.owned_mut(owner_id, id).map(|entry| {
            patch.apply(entry);
            entry.clone()
        }))
    }

    async fn delete(&self, owner_id: i64, id: i64) -> DatabaseResult<bool> {
        let mut state = self.state.lock().await;

        if state.owned_mut(owner_id, id).is_none() {
            return Ok(false);
        }
        state.media.remove(&id);

        Ok(true)
    }
}
