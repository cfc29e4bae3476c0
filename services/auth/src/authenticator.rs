//! Session authenticator: signup, login, logout and identity resolution

use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    error::{AuthError, AuthResult},
    jwt::{IssuedToken, SessionClaims, SessionTokenService},
    models::{NewUser, UserView},
    password::PasswordService,
    repositories::UserStore,
    session::SessionStore,
    validation,
};

/// An authenticated user plus the session that authenticated them
#[derive(Debug, Clone)]
pub struct ActiveSession {
    pub user: UserView,
    pub claims: SessionClaims,
}

impl ActiveSession {
    /// Owner id for every catalog operation in this request
    pub fn user_id(&self) -> i64 {
        self.user.id
    }
}

/// Result of a successful signup or login
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub user: UserView,
    pub session: IssuedToken,
}

/// Outcome of an optional-auth check
#[derive(Debug, Clone)]
pub enum Identity {
    Authenticated(ActiveSession),
    Anonymous,
}

/// Session authenticator
#[derive(Clone)]
pub struct Authenticator {
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionStore>,
    passwords: PasswordService,
    tokens: SessionTokenService,
}

impl Authenticator {
    /// Create a new authenticator
    pub fn new(
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
        passwords: PasswordService,
        tokens: SessionTokenService,
    ) -> Self {
        Self {
            users,
            sessions,
            passwords,
            tokens,
        }
    }

    /// Register a user and open a session for them
    pub async fn signup(&self, username: &str, email: &str, password: &str) -> AuthResult<SignedIn> {
        let credentials =
            validation::validate_signup(username, email, password).map_err(AuthError::Validation)?;

        let password_hash = self.passwords.hash(&credentials.password).await?;
        let user = self
            .users
            .create(&NewUser {
                username: credentials.username,
                email: credentials.email,
                password_hash,
            })
            .await?;

        info!("User {} signed up", user.id);

        let session = self.tokens.issue(user.id)?;
        Ok(SignedIn {
            user: UserView::from(&user),
            session,
        })
    }

    /// Verify credentials and open a session
    ///
    /// An unknown identifier and a wrong password both yield
    /// `InvalidCredentials`.
    pub async fn login(&self, username_or_email: &str, password: &str) -> AuthResult<SignedIn> {
        let identifier =
            validation::validate_login(username_or_email, password).map_err(AuthError::Validation)?;

        let Some(user) = self.users.find_by_username_or_email(identifier).await? else {
            self.passwords.verify_dummy(password).await?;
            info!("Login failed: unknown identifier");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.passwords.verify(password, &user.password_hash).await? {
            info!("Login failed for user {}", user.id);
            return Err(AuthError::InvalidCredentials);
        }

        info!("User {} logged in", user.id);

        let session = self.tokens.issue(user.id)?;
        Ok(SignedIn {
            user: UserView::from(&user),
            session,
        })
    }

    /// Revoke the given session until its natural expiry
    pub async fn logout(&self, session: &ActiveSession) -> AuthResult<()> {
        self.sessions
            .revoke(&session.claims.jti, session.claims.remaining_secs())
            .await
            .map_err(AuthError::SessionStore)?;

        info!("User {} logged out", session.user.id);
        Ok(())
    }

    /// Resolve a session token, failing with `Unauthenticated` when absent,
    /// invalid, expired, revoked, or naming a user that no longer exists
    pub async fn authenticate(&self, token: Option<&str>) -> AuthResult<ActiveSession> {
        let token = token.ok_or(AuthError::Unauthenticated)?;

        let claims = self
            .tokens
            .validate(token)
            .map_err(|_| AuthError::Unauthenticated)?;
        let user_id = claims.user_id().ok_or(AuthError::Unauthenticated)?;

        if self
            .sessions
            .is_revoked(&claims.jti)
            .await
            .map_err(AuthError::SessionStore)?
        {
            return Err(AuthError::Unauthenticated);
        }

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::Unauthenticated)?;

        Ok(ActiveSession {
            user: UserView::from(&user),
            claims,
        })
    }

    /// Optional-auth check; never fails, infrastructure errors are logged and
    /// reported as anonymous
    pub async fn current_identity(&self, token: Option<&str>) -> Identity {
        match self.authenticate(token).await {
            Ok(session) => Identity::Authenticated(session),
            Err(AuthError::Unauthenticated) => Identity::Anonymous,
            Err(e) => {
                warn!("Identity lookup failed: {}", e);
                Identity::Anonymous
            }
        }
    }

    /// Maximum session lifetime in seconds
    pub fn session_lifetime_secs(&self) -> u64 {
        self.tokens.lifetime_secs()
    }
}
