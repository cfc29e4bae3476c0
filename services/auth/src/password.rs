//! Argon2 password hashing
//!
//! Hashing is deliberately expensive, so both hashing and verification are
//! moved onto tokio's blocking pool instead of stalling a request worker.

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use std::sync::Arc;

use crate::error::{AuthError, AuthResult};

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HashingConfig {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for HashingConfig {
    /// Roughly 100ms per hash on commodity hardware
    fn default() -> Self {
        Self {
            memory_kib: 65536,
            iterations: 3,
            parallelism: 1,
        }
    }
}

#[derive(Debug)]
struct Inner {
    params: Params,
    /// Verified against when the identifier is unknown so both login
    /// failure paths do the same amount of work
    dummy_hash: String,
}

/// Password hashing service
#[derive(Debug, Clone)]
pub struct PasswordService {
    inner: Arc<Inner>,
}

impl PasswordService {
    /// Build the service; computes one hash up front for the dummy verifier
    pub fn new(config: HashingConfig) -> AuthResult<Self> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|e| AuthError::Hashing(e.to_string()))?;

        let dummy_hash = hash_with(&params, "dummy-password-for-timing")?;

        Ok(Self {
            inner: Arc::new(Inner { params, dummy_hash }),
        })
    }

    /// Hash a plaintext password with a fresh random salt
    pub async fn hash(&self, password: &str) -> AuthResult<String> {
        let inner = Arc::clone(&self.inner);
        let password = password.to_string();

        tokio::task::spawn_blocking(move || hash_with(&inner.params, &password))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?
    }

    /// Check a plaintext password against a stored encoded hash
    pub async fn verify(&self, password: &str, encoded_hash: &str) -> AuthResult<bool> {
        let password = password.to_string();
        let encoded_hash = encoded_hash.to_string();

        tokio::task::spawn_blocking(move || verify_with(&password, &encoded_hash))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?
    }

    /// Burn one verification for an identifier that matched no user
    pub async fn verify_dummy(&self, password: &str) -> AuthResult<()> {
        let dummy = self.inner.dummy_hash.clone();
        self.verify(password, &dummy).await.map(|_| ())
    }
}

fn hasher(params: Params) -> Argon2<'static> {
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
}

fn hash_with(params: &Params, password: &str) -> AuthResult<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let hash = hasher(params.clone())
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::Hashing(e.to_string()))?
        .to_string();

    Ok(hash)
}

fn verify_with(password: &str, encoded_hash: &str) -> AuthResult<bool> {
    let parsed_hash =
        PasswordHash::new(encoded_hash).map_err(|e| AuthError::Hashing(e.to_string()))?;

    // Cost parameters are read back from the encoded hash.
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
pub(crate) fn test_config() -> HashingConfig {
    HashingConfig {
        memory_kib: 8,
        iterations: 1,
        parallelism: 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_is_salted_and_not_plaintext() {
        let service = PasswordService::new(test_config()).unwrap();

        let first = service.hash("longenough").await.unwrap();
        let second = service.hash("longenough").await.unwrap();

        assert!(!first.contains("longenough"));
        assert!(first.starts_with("$argon2id$"));
        assert_ne!(first, second, "salts must differ");
    }

    #[tokio::test]
    async fn test_verify_only_accepts_original_password() {
        let service = PasswordService::new(test_config()).unwrap();
        let hash = service.hash("longenough").await.unwrap();

        assert!(service.verify("longenough", &hash).await.unwrap());
        assert!(!service.verify("longenougH", &hash).await.unwrap());
        assert!(!service.verify("", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_rejects_garbage_hash() {
        let service = PasswordService::new(test_config()).unwrap();
        assert!(matches!(
            service.verify("longenough", "not-a-phc-string").await,
            Err(AuthError::Hashing(_))
        ));
    }

    #[tokio::test]
    async fn test_dummy_verification_succeeds_quietly() {
        let service = PasswordService::new(test_config()).unwrap();
        service.verify_dummy("whatever").await.unwrap();
    }

    #[test]
    fn test_invalid_params_rejected() {
        let config = HashingConfig {
            memory_kib: 0,
            iterations: 0,
            parallelism: 0,
        };
        assert!(PasswordService::new(config).is_err());
    }

    #[test]
    fn test_default_cost_is_production_grade() {
        let config = HashingConfig::default();
        assert!(config.memory_kib >= 19456);
        assert!(config.iterations >= 2);
    }
}
