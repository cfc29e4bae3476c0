//! Session revocation storage
//!
//! Session tokens are self-contained, so logging out records the token's
//! session id in a revocation list until the token would have expired anyway.

use anyhow::Result;
use async_trait::async_trait;
use common::cache::RedisPool;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::info;

/// Revocation list for session ids
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Revoke a session for the next `ttl_secs` seconds
    async fn revoke(&self, session_id: &str, ttl_secs: u64) -> Result<()>;

    /// Whether a session id has been revoked and the revocation is still live
    async fn is_revoked(&self, session_id: &str) -> Result<bool>;
}

/// Redis-backed revocation list; entries expire with the token
#[derive(Clone)]
pub struct RedisSessionStore {
    redis_pool: RedisPool,
}

impl RedisSessionStore {
    /// Create a new Redis session store
    pub fn new(redis_pool: RedisPool) -> Self {
        Self { redis_pool }
    }

    fn key(session_id: &str) -> String {
        format!("revoked_session:{}", session_id)
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn revoke(&self, session_id: &str, ttl_secs: u64) -> Result<()> {
        info!("Revoking session {}", session_id);
        self.redis_pool
            .set_expiring(&Self::key(session_id), "1", ttl_secs)
            .await
    }

    async fn is_revoked(&self, session_id: &str) -> Result<bool> {
        self.redis_pool.exists(&Self::key(session_id)).await
    }
}

/// Process-local revocation list for single-instance and test deployments
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    revoked: Arc<Mutex<HashMap<String, Instant>>>,
}

impl MemorySessionStore {
    /// Create an empty in-memory session store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn revoke(&self, session_id: &str, ttl_secs: u64) -> Result<()> {
        let mut revoked = self.revoked.lock().await;
        let now = Instant::now();

        revoked.retain(|_, expires| *expires > now);
        revoked.insert(
            session_id.to_string(),
            now + Duration::from_secs(ttl_secs.max(1)),
        );

        Ok(())
    }

    async fn is_revoked(&self, session_id: &str) -> Result<bool> {
        let revoked = self.revoked.lock().await;

        Ok(revoked
            .get(session_id)
            .is_some_and(|expires| *expires > Instant::now()))
    }
}
