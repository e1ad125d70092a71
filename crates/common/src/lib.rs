// ================
// common/src/lib.rs
// ================
//! Common types shared between the `OpenEstate` backend crates.
//! This module defines the user entity, the form payloads posted by the
//! auth views, and the typed render contexts those views consume.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A registered account.
///
/// The `token` field does double duty: it holds the pending confirmation
/// token right after registration and the pending reset token after a
/// password-reset request. It is `None` whenever neither flow is in
/// progress, and a non-`None` value is unique across all users.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// UUID assigned by the store at creation
    pub id: String,
    /// Display name
    pub name: String,
    /// Unique email address
    pub email: String,
    /// scrypt PHC-format hash, never the clear password
    pub password_hash: String,
    /// Whether the owner has proven control of the email address
    pub confirmed: bool,
    /// Pending confirmation or reset token
    pub token: Option<String>,
    /// Set by the store at insert
    pub created_at: DateTime<Utc>,
}

impl User {
    /// True while the account is waiting for its confirmation link.
    pub fn is_pending_confirmation(&self) -> bool {
        !self.confirmed && self.token.is_some()
    }

    /// Consume the confirmation token and mark the account confirmed.
    pub fn confirm(&mut self) {
        self.token = None;
        self.confirmed = true;
    }

    /// Begin a password reset by assigning a freshly generated token.
    /// The confirmed flag is untouched.
    pub fn begin_reset(&mut self, token: String) {
        self.token = Some(token);
    }

    /// Complete a password reset: store the new hash and consume the token.
    pub fn complete_reset(&mut self, password_hash: String) {
        self.password_hash = password_hash;
        self.token = None;
    }
}

/// Fields required to insert a new account.
/// The id and creation timestamp are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub token: String,
}

/// A single validation failure, attached to the field that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

// ── Form payloads ───────────────────────────────────────────────────

/// POST /auth/login
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// POST /auth/register
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub repeat_password: String,
}

/// POST /auth/forgot-password
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordForm {
    pub email: String,
}

/// POST /auth/reset-password/{token}
#[derive(Debug, Deserialize)]
pub struct ResetPasswordForm {
    pub password: String,
}

// ── View contexts ───────────────────────────────────────────────────
//
// One struct per view, enumerating exactly the optional pieces that view
// can show. Handlers fill these in; `views` renders them.

/// Context for the login page.
#[derive(Debug, Default)]
pub struct LoginPage {
    pub csrf_token: String,
    pub errors: Vec<FieldError>,
}

/// Context for the registration page. `name`/`email` echo the submitted
/// values back into the form after a validation failure.
#[derive(Debug, Default)]
pub struct RegisterPage {
    pub csrf_token: String,
    pub errors: Vec<FieldError>,
    pub name: String,
    pub email: String,
}

/// Context for the forgot-password request page.
#[derive(Debug, Default)]
pub struct ForgotPasswordPage {
    pub csrf_token: String,
    pub errors: Vec<FieldError>,
}

/// Context for the new-password form shown behind a valid reset token.
#[derive(Debug, Default)]
pub struct ResetPasswordPage {
    pub csrf_token: String,
    pub errors: Vec<FieldError>,
    /// Echoed into the form action so the POST carries the same token
    pub token: String,
}

/// Context for the generic "we did something, check your inbox" page.
#[derive(Debug)]
pub struct MessagePage {
    pub page_title: String,
    pub message: String,
}

/// Context for the confirmation outcome page, also reused by the reset
/// flow for its terminal success/failure screens.
#[derive(Debug)]
pub struct ConfirmPage {
    pub page_title: String,
    pub message: String,
    pub error: bool,
}
