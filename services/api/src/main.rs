use anyhow::Result;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod middleware;
mod models;
mod repositories;
mod routes;
mod state;
mod tmdb;
mod validation;

use auth::{
    AuthConfig, MemorySessionStore, RedisSessionStore, SessionStore, UserRepository, UserStore,
};
use common::{
    cache::{RedisConfig, RedisPool},
    database::{self, DatabaseConfig, init_pool},
};

use crate::{
    config::{ApiConfig, SessionStoreBackend, StorageBackend},
    repositories::{MediaRepository, MediaStore, MemoryStore},
    state::{AppState, SessionCookieConfig},
    tmdb::{TmdbClient, TmdbConfig},
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting API service");

    let api_config = ApiConfig::load()?;
    let auth_config = AuthConfig::from_env()?;

    let (users, media) = init_stores(api_config.storage_backend).await?;
    let sessions = init_session_store(api_config.session_store).await?;

    let authenticator = auth::build_authenticator(&auth_config, users, sessions)?;
    let tmdb = TmdbClient::new(TmdbConfig {
        api_key: api_config.tmdb_api_key.clone(),
        base_url: api_config.tmdb_base_url.clone(),
        timeout: api_config.tmdb_timeout(),
    })?;

    let app_state = AppState {
        authenticator,
        media_repository: media,
        tmdb,
        cookies: SessionCookieConfig {
            name: api_config.session_cookie_name.clone(),
            secure: api_config.session_cookie_secure,
        },
    };

    // Start the web server
    let app = routes::create_router(app_state, &api_config)?;

    let listener = TcpListener::bind(&api_config.bind_address).await?;
    info!("API service listening on {}", api_config.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn init_stores(
    backend: StorageBackend,
) -> Result<(Arc<dyn UserStore>, Arc<dyn MediaStore>)> {
    match backend {
        StorageBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let pool = init_pool(&db_config).await?;

            // Check database connectivity
            if database::health_check(&pool).await? {
                info!("Database connection successful");
            } else {
                anyhow::bail!("Failed to connect to database");
            }

            database::run_migrations(&pool).await?;

            Ok((
                Arc::new(UserRepository::new(pool.clone())),
                Arc::new(MediaRepository::new(pool)),
            ))
        }
        StorageBackend::Memory => {
            info!("Using in-memory storage; data is lost on restart");
            let store = MemoryStore::new();
            Ok((Arc::new(store.clone()), Arc::new(store)))
        }
    }
}

async fn init_session_store(backend: SessionStoreBackend) -> Result<Arc<dyn SessionStore>> {
    match backend {
        SessionStoreBackend::Redis => {
            let redis_config = RedisConfig::from_env()?;
            let redis_pool = RedisPool::new(&redis_config).await?;

            if !redis_pool.health_check().await? {
                anyhow::bail!("Failed to connect to Redis");
            }
            info!("Redis connection successful");

            Ok(Arc::new(RedisSessionStore::new(redis_pool)))
        }
        SessionStoreBackend::Memory => {
            info!("Using in-memory session revocation list");
            Ok(Arc::new(MemorySessionStore::new()))
        }
    }
}
