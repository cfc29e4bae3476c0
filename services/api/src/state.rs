//! Application state shared across handlers

use auth::Authenticator;
use std::sync::Arc;

use crate::{repositories::MediaStore, tmdb::TmdbClient};

/// Session cookie attributes
#[derive(Debug, Clone)]
pub struct SessionCookieConfig {
    pub name: String,
    pub secure: bool,
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub authenticator: Authenticator,
    pub media_repository: Arc<dyn MediaStore>,
    pub tmdb: TmdbClient,
    pub cookies: SessionCookieConfig,
}
