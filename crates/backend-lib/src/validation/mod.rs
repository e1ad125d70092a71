// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Form field validation.

use openestate_common::FieldError;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

// Common validation constants
pub const MIN_PASSWORD_LENGTH: usize = 6;
const MAX_PASSWORD_LENGTH: usize = 128;
const MAX_NAME_LENGTH: usize = 100;
const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321 SMTP limit

// Regex patterns for validation
static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());
static NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^<>/\\{}()\[\];]*$").unwrap());

/// Possible validation errors
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("{0}")]
    InvalidEmail(String),

    #[error("{0}")]
    InvalidPassword(String),

    #[error("{0}")]
    InvalidName(String),

    #[error("Passwords do not match")]
    PasswordMismatch,
}

impl ValidationError {
    /// The form field this error belongs to
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::InvalidEmail(_) => "email",
            ValidationError::InvalidPassword(_) => "password",
            ValidationError::InvalidName(_) => "name",
            ValidationError::PasswordMismatch => "repeat_password",
        }
    }
}

impl From<ValidationError> for FieldError {
    fn from(err: ValidationError) -> Self {
        FieldError::new(err.field(), err.to_string())
    }
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate an email address
pub fn validate_email(email: &str) -> ValidationResult<&str> {
    // Email should not be empty
    if email.is_empty() {
        return Err(ValidationError::InvalidEmail(
            "Email is required".to_string(),
        ));
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::InvalidEmail(format!(
            "Email cannot exceed {MAX_EMAIL_LENGTH} characters"
        )));
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err(ValidationError::InvalidEmail(
            "That does not look like an email address".to_string(),
        ));
    }

    Ok(email)
}

/// Validate a display name
pub fn validate_name(name: &str) -> ValidationResult<&str> {
    // Name should not be empty
    if name.trim().is_empty() {
        return Err(ValidationError::InvalidName(
            "Name must not be empty".to_string(),
        ));
    }

    if name.len() > MAX_NAME_LENGTH {
        return Err(ValidationError::InvalidName(format!(
            "Name must be between 1 and {MAX_NAME_LENGTH} characters"
        )));
    }

    // Check for potentially dangerous characters
    if !NAME_REGEX.is_match(name) {
        return Err(ValidationError::InvalidName(
            "Name contains invalid characters".to_string(),
        ));
    }

    Ok(name)
}

/// Validate a password
pub fn validate_password(password: &str) -> ValidationResult<&str> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::InvalidPassword(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::InvalidPassword(format!(
            "Password cannot exceed {MAX_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(password)
}

/// Validate that the repeated password matches the first entry
pub fn validate_password_repeat(password: &str, repeat: &str) -> ValidationResult<()> {
    if password != repeat {
        return Err(ValidationError::PasswordMismatch);
    }

    Ok(())
}

/// Sanitize general string input to prevent injection attacks
pub fn sanitize_string(input: &str) -> String {
    // Basic sanitization: escape HTML-like characters
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Collect every failure from the login form
pub fn validate_login(email: &str, password: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if let Err(err) = validate_email(email) {
        errors.push(err.into());
    }

    if password.is_empty() {
        errors.push(FieldError::new("password", "Password is required"));
    }

    errors
}

/// Collect every failure from the registration form
pub fn validate_registration(
    name: &str,
    email: &str,
    password: &str,
    repeat: &str,
) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if let Err(err) = validate_name(name) {
        errors.push(err.into());
    }

    if let Err(err) = validate_email(email) {
        errors.push(err.into());
    }

    if let Err(err) = validate_password(password) {
        errors.push(err.into());
    }

    if let Err(err) = validate_password_repeat(password, repeat) {
        errors.push(err.into());
    }

    errors
}
