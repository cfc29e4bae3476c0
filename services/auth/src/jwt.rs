//! Session token issuing and validation
//!
//! A session is an HS256-signed JWT naming exactly one user. Tokens carry a
//! unique `jti` so that an individual session can be revoked on logout
//! without invalidating the user's other sessions.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};

/// Session token claims
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User ID, as a string per RFC 7519
    pub sub: String,
    /// Session ID
    pub jti: String,
    /// Issued at time (unix seconds)
    pub iat: i64,
    /// Expiration time (unix seconds)
    pub exp: i64,
}

impl SessionClaims {
    /// The user id named by the `sub` claim
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }

    /// Seconds until the token stops being accepted, never negative
    pub fn remaining_secs(&self) -> u64 {
        u64::try_from(self.exp - Utc::now().timestamp()).unwrap_or(0)
    }
}

/// A freshly signed session token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: SessionClaims,
}

/// Session token service
#[derive(Clone)]
pub struct SessionTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime_secs: u64,
}

impl SessionTokenService {
    /// Initialize a new token service from a shared secret
    pub fn new(secret: &[u8], lifetime_secs: u64) -> AuthResult<Self> {
        if secret.is_empty() {
            return Err(AuthError::Configuration(
                "session signing secret must not be empty".to_string(),
            ));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            lifetime_secs,
        })
    }

    /// Issue a token for a user, valid for the configured lifetime
    pub fn issue(&self, user_id: i64) -> AuthResult<IssuedToken> {
        let now = Utc::now().timestamp();
        let lifetime = i64::try_from(self.lifetime_secs).unwrap_or(i64::MAX);

        let claims = SessionClaims {
            sub: user_id.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now,
            exp: now.saturating_add(lifetime),
        };

        let token = self.sign(&claims)?;
        Ok(IssuedToken { token, claims })
    }

    /// Validate a token's signature and expiry and return its claims
    pub fn validate(&self, token: &str) -> AuthResult<SessionClaims> {
        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }

    /// Maximum session lifetime in seconds
    pub fn lifetime_secs(&self) -> u64 {
        self.lifetime_secs
    }

    fn sign(&self, claims: &SessionClaims) -> AuthResult<String> {
        let token = encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)?;
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> SessionTokenService {
        SessionTokenService::new(b"test-secret-test-secret-test-secret", 86400).unwrap()
    }

    #[test]
    fn test_issue_then_validate() {
        let tokens = service();
        let issued = tokens.issue(42).unwrap();

        let claims = tokens.validate(&issued.token).unwrap();
        assert_eq!(claims, issued.claims);
        assert_eq!(claims.user_id(), Some(42));
        assert_eq!(claims.exp - claims.iat, 86400);
        assert!(claims.remaining_secs() > 86000);
    }

    #[test]
    fn test_each_session_has_its_own_id() {
        let tokens = service();
        let a = tokens.issue(1).unwrap();
        let b = tokens.issue(1).unwrap();
        assert_ne!(a.claims.jti, b.claims.jti);
    }

    #[test]
    fn test_expired_token_rejected() {
        let tokens = service();
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: "1".to_string(),
            jti: "expired".to_string(),
            iat: now - 90_000,
            exp: now - 5,
        };
        let token = tokens.sign(&claims).unwrap();

        assert!(matches!(tokens.validate(&token), Err(AuthError::Token(_))));
        assert_eq!(claims.remaining_secs(), 0);
    }

    #[test]
    fn test_tampered_token_rejected() {
        let tokens = service();
        let issued = tokens.issue(1).unwrap();
        let mut tampered = issued.token.clone();
        tampered.push('x');

        assert!(tokens.validate(&tampered).is_err());
        assert!(tokens.validate("not.a.token").is_err());
    }

    #[test]
    fn test_foreign_secret_rejected() {
        let issued = service().issue(1).unwrap();
        let other = SessionTokenService::new(b"a-completely-different-secret", 86400).unwrap();

        assert!(other.validate(&issued.token).is_err());
    }

    #[test]
    fn test_empty_secret_refused() {
        assert!(matches!(
            SessionTokenService::new(b"", 60),
            Err(AuthError::Configuration(_))
        ));
    }
}
