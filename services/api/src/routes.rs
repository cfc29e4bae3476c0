//! API service routes

use anyhow::Context;
use axum::{
    Extension, Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{HeaderValue, Method, StatusCode, header},
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
};
use axum_extra::extract::cookie::CookieJar;
use auth::{ActiveSession, Identity};
use serde::Deserialize;
use serde_json::json;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::{
    config::ApiConfig,
    error::{ApiError, ApiResult, reveal_error_detail},
    middleware::{expired_session_cookie, require_session, session_cookie, session_token},
    models::{
        CheckAuthResponse, LoginRequest, SignupRequest, UserResponse,
        media::{
            CreateMediaRequest, MediaListResponse, MediaResponse, UpdateMediaRequest,
        },
    },
    state::AppState,
    tmdb::TitleKind,
    validation::{validate_create, validate_update},
};


/// Create the router for the API service
pub fn create_router(state: AppState, config: &ApiConfig) -> anyhow::Result<Router> {
    let protected_routes = Router::new()
        .route("/media", get(list_media))
        .route("/create_media", post(create_media))
        .route("/update_media/:id", patch(update_media))
        .route("/delete_media/:id", delete(delete_media))
        .route("/logout", post(logout))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    let mut router = Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/check_auth", get(check_auth))
        .route("/tmdb_search/:media_type", get(tmdb_search))
        .route("/tmdb/:media_type/:tmdb_id", get(tmdb_details))
        .route("/tmdb_credits/:tmdb_id/:media_type", get(tmdb_credits))
        .merge(protected_routes)
        .with_state(state);

    if config.verbose_errors {
        router = router.layer(middleware::map_response(reveal_error_detail));
    }

    Ok(router
        .layer(cors_layer(config)?)
        .layer(TraceLayer::new_for_http()))
}

/// Credentialed CORS for the configured front-end origins
fn cors_layer(config: &ApiConfig) -> anyhow::Result<CorsLayer> {
    let origins = config
        .allowed_origins()
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .with_context(|| format!("Invalid CORS origin: {}", origin))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]))
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "cineradar-api"
    }))
}

/// Register a new user and start their session
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(payload) = payload?;

    let signed_in = state
        .authenticator
        .signup(&payload.username, &payload.email, &payload.password)
        .await?;

    let cookie = session_cookie(
        &state.cookies,
        signed_in.session.token,
        state.authenticator.session_lifetime_secs(),
    );

    Ok((
        StatusCode::CREATED,
        jar.add(cookie),
        Json(UserResponse {
            message: "User created successfully",
            user: signed_in.user,
        }),
    )
        .into_response())
}

/// Log in with a username or email
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(payload) = payload?;

    let signed_in = state
        .authenticator
        .login(&payload.username, &payload.password)
        .await?;

    let cookie = session_cookie(
        &state.cookies,
        signed_in.session.token,
        state.authenticator.session_lifetime_secs(),
    );

    Ok((
        jar.add(cookie),
        Json(UserResponse {
            message: "Login successful",
            user: signed_in.user,
        }),
    )
        .into_response())
}

/// End the current session
pub async fn logout(
    State(state): State<AppState>,
    Extension(session): Extension<ActiveSession>,
    jar: CookieJar,
) -> ApiResult<Response> {
    state.authenticator.logout(&session).await?;

    Ok((
        jar.remove(expired_session_cookie(&state.cookies)),
        Json(json!({"message": "Logged out successfully"})),
    )
        .into_response())
}

/// Report whether the caller holds a live session; never fails
pub async fn check_auth(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let identity = state
        .authenticator
        .current_identity(session_token(&jar, &state.cookies))
        .await;

    Json(match identity {
        Identity::Authenticated(session) => CheckAuthResponse {
            authenticated: true,
            user: Some(session.user),
        },
        Identity::Anonymous => CheckAuthResponse {
            authenticated: false,
            user: None,
        },
    })
}

/// List the caller's media entries
pub async fn list_media(
    State(state): State<AppState>,
    Extension(session): Extension<ActiveSession>,
) -> ApiResult<Json<MediaListResponse>> {
    let media = state.media_repository.list(session.user_id()).await?;

    Ok(Json(MediaListResponse { media }))
}

/// Add a media entry for the caller
pub async fn create_media(
    State(state): State<AppState>,
    Extension(session): Extension<ActiveSession>,
    payload: Result<Json<CreateMediaRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    let new_media = validate_create(payload)?;

    let media = state
        .media_repository
        .create(session.user_id(), &new_media)
        .await?;

    info!("User {} added media {}", session.user_id(), media.id);

    Ok((
        StatusCode::CREATED,
        Json(MediaResponse {
            message: "Media added successfully!",
            media,
        }),
    ))
}

/// Partially update one of the caller's media entries
pub async fn update_media(
    State(state): State<AppState>,
    Extension(session): Extension<ActiveSession>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateMediaRequest>, JsonRejection>,
) -> ApiResult<Json<MediaResponse>> {
    let Path(id) = id?;
    let owner_id = session.user_id();

    // An unknown or foreign id is reported as not found even when the body
    // is also unusable.
    let patch = match payload
        .map_err(ApiError::from)
        .and_then(|Json(payload)| validate_update(payload))
    {
        Ok(patch) => patch,
        Err(err) => {
            if state.media_repository.find(owner_id, id).await?.is_none() {
                return Err(ApiError::MediaNotFound);
            }
            return Err(err);
        }
    };

    let media = state
        .media_repository
        .update(owner_id, id, &patch)
        .await?
        .ok_or(ApiError::MediaNotFound)?;

    Ok(Json(MediaResponse {
        message: "Media updated successfully!",
        media,
    }))
}

/// Delete one of the caller's media entries
pub async fn delete_media(
    State(state): State<AppState>,
    Extension(session): Extension<ActiveSession>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = id?;

    if !state
        .media_repository
        .delete(session.user_id(), id)
        .await?
    {
        return Err(ApiError::MediaNotFound);
    }

    info!("User {} deleted media {}", session.user_id(), id);

    Ok(Json(json!({"message": "Media deleted successfully!"})))
}

/// Query parameters for the title search
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

fn title_kind(media_type: &str) -> ApiResult<TitleKind> {
    media_type.parse().map_err(ApiError::BadRequest)
}

fn tmdb_id(raw: &str) -> ApiResult<i64> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid TMDB id: {}", raw)))
}

/// Search titles by name
pub async fn tmdb_search(
    State(state): State<AppState>,
    Path(media_type): Path<String>,
    Query(params): Query<SearchQuery>,
) -> ApiResult<Response> {
    let kind = title_kind(&media_type)?;

    let query = params.query.unwrap_or_default();
    if query.trim().is_empty() {
        return Ok(Json(json!({"results": []})).into_response());
    }

    let upstream = state
        .tmdb
        .search(kind, &query)
        .await
        .map_err(|e| ApiError::BadGateway(e.to_string()))?;

    Ok(upstream.into_response())
}

/// Title details
pub async fn tmdb_details(
    State(state): State<AppState>,
    Path((media_type, raw_id)): Path<(String, String)>,
) -> ApiResult<Response> {
    let kind = title_kind(&media_type)?;
    let id = tmdb_id(&raw_id)?;

    let upstream = state
        .tmdb
        .details(kind, id)
        .await
        .map_err(|e| ApiError::BadGateway(e.to_string()))?;

    Ok(upstream.into_response())
}

/// Cast and crew for a title
pub async fn tmdb_credits(
    State(state): State<AppState>,
    Path((raw_id, media_type)): Path<(String, String)>,
) -> ApiResult<Response> {
    let kind = title_kind(&media_type)?;
    let id = tmdb_id(&raw_id)?;

    let upstream = state
        .tmdb
        .credits(kind, id)
        .await
        .map_err(|e| ApiError::BadGateway(e.to_string()))?;

    Ok(upstream.into_response())
}
