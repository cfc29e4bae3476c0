//! Session cookie handling and the guard for protected routes

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::debug;

use crate::{
    error::ApiError,
    state::{AppState, SessionCookieConfig},
};

/// Session token carried by the request, if any
pub fn session_token<'a>(jar: &'a CookieJar, cookies: &SessionCookieConfig) -> Option<&'a str> {
    jar.get(&cookies.name).map(|cookie| cookie.value())
}

/// Build the session cookie for a freshly issued token
///
/// HTTP-only and `SameSite=None` so cross-origin front ends can send it;
/// `Max-Age` matches the token lifetime.
pub fn session_cookie(
    cookies: &SessionCookieConfig,
    token: String,
    lifetime_secs: u64,
) -> Cookie<'static> {
    let max_age = i64::try_from(lifetime_secs).unwrap_or(i64::MAX);

    Cookie::build((cookies.name.clone(), token))
        .http_only(true)
        .secure(cookies.secure)
        .same_site(SameSite::None)
        .path("/")
        .max_age(time::Duration::seconds(max_age))
        .build()
}

/// Cookie that, once removed from the jar, expires the session cookie
pub fn expired_session_cookie(cookies: &SessionCookieConfig) -> Cookie<'static> {
    Cookie::build((cookies.name.clone(), ""))
        .http_only(true)
        .secure(cookies.secure)
        .same_site(SameSite::None)
        .path("/")
        .build()
}

/// Reject requests without a live session; on success the
/// [`auth::ActiveSession`] is available to handlers as an extension
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let jar = CookieJar::from_headers(req.headers());

    let session = state
        .authenticator
        .authenticate(session_token(&jar, &state.cookies))
        .await
        .map_err(|e| {
            debug!("Rejected request to {}: {}", req.uri().path(), e);
            ApiError::from(e)
        })?;

    req.extensions_mut().insert(session);

    Ok(next.run(req).await)
}
