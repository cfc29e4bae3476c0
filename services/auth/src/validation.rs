//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

/// Signup input after trimming and email normalization
#[derive(Debug, Clone, PartialEq)]
pub struct SignupCredentials {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Validate and normalize a signup request
///
/// The username is trimmed and kept case-sensitive; the email is trimmed and
/// lowercased. The password is taken verbatim.
pub fn validate_signup(
    username: &str,
    email: &str,
    password: &str,
) -> Result<SignupCredentials, String> {
    let username = username.trim();
    let email = normalize_email(email);

    if username.is_empty() || email.is_empty() || password.is_empty() {
        return Err("Username, email, and password are required".to_string());
    }

    validate_username(username)?;
    validate_email(&email)?;
    validate_password(password)?;

    Ok(SignupCredentials {
        username: username.to_string(),
        email,
        password: password.to_string(),
    })
}

/// Validate a login request, returning the trimmed identifier
pub fn validate_login<'a>(identifier: &'a str, password: &str) -> Result<&'a str, String> {
    let identifier = identifier.trim();

    if identifier.is_empty() || password.is_empty() {
        return Err("Username and password are required".to_string());
    }

    Ok(identifier)
}

/// Canonical form used for storing and comparing emails
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate username
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username is required".to_string());
    }

    if username.chars().count() < 3 {
        return Err("Username must be at least 3 characters long".to_string());
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_.-]+@[A-Za-z0-9_.-]+\.[A-Za-z0-9_]+$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.chars().count() < 8 {
        return Err("Password must be at least 8 characters long".to_string());
    }

    Ok(())
}
