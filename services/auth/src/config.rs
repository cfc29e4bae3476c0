//! Authentication configuration

use anyhow::Result;

use crate::password::HashingConfig;

/// Default session lifetime: 24 hours
pub const DEFAULT_SESSION_LIFETIME_SECS: u64 = 86400;

/// Authentication configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// Secret used to sign session tokens
    pub secret_key: String,
    /// Maximum session lifetime in seconds
    pub session_lifetime_secs: u64,
    /// Argon2 cost parameters
    pub hashing: HashingConfig,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret_key", &"<redacted>")
            .field("session_lifetime_secs", &self.session_lifetime_secs)
            .field("hashing", &self.hashing)
            .finish()
    }
}

impl AuthConfig {
    /// Create a new AuthConfig from environment variables
    ///
    /// # Environment Variables
    /// - `SECRET_KEY`: Session signing secret (required)
    /// - `SESSION_LIFETIME_SECS`: Session lifetime in seconds (default: 86400)
    /// - `PASSWORD_HASH_MEMORY_KIB`: Argon2 memory cost (default: 65536)
    /// - `PASSWORD_HASH_ITERATIONS`: Argon2 passes (default: 3)
    /// - `PASSWORD_HASH_PARALLELISM`: Argon2 lanes (default: 1)
    pub fn from_env() -> Result<Self> {
        let secret_key = std::env::var("SECRET_KEY")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow::anyhow!("SECRET_KEY environment variable not set"))?;

        let defaults = HashingConfig::default();

        Ok(AuthConfig {
            secret_key,
            session_lifetime_secs: env_or("SESSION_LIFETIME_SECS", DEFAULT_SESSION_LIFETIME_SECS)?,
            hashing: HashingConfig {
                memory_kib: env_or("PASSWORD_HASH_MEMORY_KIB", defaults.memory_kib)?,
                iterations: env_or("PASSWORD_HASH_ITERATIONS", defaults.iterations)?,
                parallelism: env_or("PASSWORD_HASH_PARALLELISM", defaults.parallelism)?,
            },
        })
    }
}

/// Read an optional variable; a value that is set but does not parse is an
/// error
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} has an invalid value: {:?}", name, raw)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 5] = [
        "SECRET_KEY",
        "SESSION_LIFETIME_SECS",
        "PASSWORD_HASH_MEMORY_KIB",
        "PASSWORD_HASH_ITERATIONS",
        "PASSWORD_HASH_PARALLELISM",
    ];

    fn clear_env() {
        for var in VARS {
            unsafe {
                std::env::remove_var(var);
            }
        }
    }

    #[test]
    #[serial]
    fn test_auth_config_defaults() {
        clear_env();
        unsafe {
            std::env::set_var("SECRET_KEY", "s3cret");
        }

        let config = AuthConfig::from_env().unwrap();
        assert_eq!(config.secret_key, "s3cret");
        assert_eq!(config.session_lifetime_secs, 86400);
        assert_eq!(config.hashing, HashingConfig::default());
        assert!(!format!("{:?}", config).contains("s3cret"));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_auth_config_overrides() {
        clear_env();
        unsafe {
            std::env::set_var("SECRET_KEY", "s3cret");
            std::env::set_var("SESSION_LIFETIME_SECS", "3600");
            std::env::set_var("PASSWORD_HASH_MEMORY_KIB", "19456");
            std::env::set_var("PASSWORD_HASH_ITERATIONS", "2");
            std::env::set_var("PASSWORD_HASH_PARALLELISM", "2");
        }

        let config = AuthConfig::from_env().unwrap();
        assert_eq!(config.session_lifetime_secs, 3600);
        assert_eq!(config.hashing.memory_kib, 19456);
        assert_eq!(config.hashing.iterations, 2);
        assert_eq!(config.hashing.parallelism, 2);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_auth_config_rejects_malformed_numbers() {
        for (var, value) in [
            ("PASSWORD_HASH_MEMORY_KIB", "64MiB"),
            ("PASSWORD_HASH_PARALLELISM", "not-a-number"),
            ("SESSION_LIFETIME_SECS", "-1"),
        ] {
            clear_env();
            unsafe {
                std::env::set_var("SECRET_KEY", "s3cret");
                std::env::set_var(var, value);
            }

            let err = AuthConfig::from_env().unwrap_err();
            assert!(err.to_string().contains(var), "{}", err);
        }

        clear_env();
    }

    #[test]
    #[serial]
    fn test_auth_config_requires_secret() {
        clear_env();
        assert!(AuthConfig::from_env().is_err());
    }
}
