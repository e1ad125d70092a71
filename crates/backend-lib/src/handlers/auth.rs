// ============================
// crates/backend-lib/src/handlers/auth.rs
// ============================
//! Login, registration, confirmation and password-reset handlers.
//!
//! Each handler is a straight line: validate the fields, look the user up
//! by a unique key, branch, mutate or create, then render or notify. A
//! validation failure never touches the store; a lookup miss renders a
//! recoverable message and mutates nothing.
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header::SET_COOKIE;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use metrics::counter;
use openestate_common::{
    ConfirmPage, FieldError, ForgotPasswordForm, ForgotPasswordPage, LoginForm, LoginPage,
    MessagePage, NewUser, RegisterForm, RegisterPage, ResetPasswordForm, ResetPasswordPage,
};

use crate::auth::{generate_opaque_id, hash_password, session_cookie, verify_password};
use crate::error::AppError;
use crate::metrics::{
    ACCOUNT_CONFIRMED, LOGIN_FAILURE, LOGIN_SUCCESS, RESET_COMPLETED, RESET_REQUESTED,
    USER_REGISTERED,
};
use crate::storage::UserStore;
use crate::validation;
use crate::views;
use crate::AppState;

/// Where a fresh session lands after signing in
const AFTER_LOGIN_REDIRECT: &str = "/my-properties";

fn login_page(errors: Vec<FieldError>) -> Response {
    Html(views::render_login_page(&LoginPage {
        csrf_token: generate_opaque_id(),
        errors,
    }))
    .into_response()
}

fn register_page(errors: Vec<FieldError>, name: &str, email: &str) -> Response {
    Html(views::render_register_page(&RegisterPage {
        csrf_token: generate_opaque_id(),
        errors,
        name: name.to_string(),
        email: email.to_string(),
    }))
    .into_response()
}

fn forgot_password_page(errors: Vec<FieldError>) -> Response {
    Html(views::render_forgot_password_page(&ForgotPasswordPage {
        csrf_token: generate_opaque_id(),
        errors,
    }))
    .into_response()
}

fn reset_password_page(errors: Vec<FieldError>, token: String) -> Response {
    Html(views::render_reset_password_page(&ResetPasswordPage {
        csrf_token: generate_opaque_id(),
        errors,
        token,
    }))
    .into_response()
}

fn outcome_page(page_title: &str, message: &str, error: bool) -> Response {
    Html(views::render_confirm_page(&ConfirmPage {
        page_title: page_title.to_string(),
        message: message.to_string(),
        error,
    }))
    .into_response()
}

/// GET /auth/login
pub async fn login_form() -> Response {
    login_page(Vec::new())
}

/// POST /auth/login
///
/// The session cookie is only set once all three checks pass: the account
/// exists, it is confirmed, and the password verifies.
pub async fn login<S: UserStore>(
    State(state): State<Arc<AppState<S>>>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let errors = validation::validate_login(&form.email, &form.password);
    if !errors.is_empty() {
        return Ok(login_page(errors));
    }

    let Some(user) = state.store.find_by_email(&form.email).await? else {
        counter!(LOGIN_FAILURE).increment(1);
        return Ok(login_page(vec![FieldError::new(
            "email",
            "No account exists for that email",
        )]));
    };

    if !user.confirmed {
        counter!(LOGIN_FAILURE).increment(1);
        return Ok(login_page(vec![FieldError::new(
            "email",
            "Your account has not been confirmed yet",
        )]));
    }

    if !verify_password(&user.password_hash, &form.password) {
        counter!(LOGIN_FAILURE).increment(1);
        return Ok(login_page(vec![FieldError::new(
            "password",
            "Incorrect password",
        )]));
    }

    let token = state.sessions.issue(&user.id, &user.name)?;
    let cookie = session_cookie(&token);

    counter!(LOGIN_SUCCESS).increment(1);
    tracing::info!(user = %user.id, "login succeeded");

    let mut response = Redirect::to(AFTER_LOGIN_REDIRECT).into_response();
    response.headers_mut().append(
        SET_COOKIE,
        cookie
            .to_string()
            .parse()
            .map_err(|e| AppError::Internal(format!("invalid cookie header: {e}")))?,
    );

    Ok(response)
}

/// GET /auth/register
pub async fn register_form() -> Response {
    register_page(Vec::new(), "", "")
}

/// POST /auth/register
pub async fn register<S: UserStore>(
    State(state): State<Arc<AppState<S>>>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    let errors = validation::validate_registration(
        &form.name,
        &form.email,
        &form.password,
        &form.repeat_password,
    );
    if !errors.is_empty() {
        return Ok(register_page(errors, &form.name, &form.email));
    }

    if state.store.find_by_email(&form.email).await?.is_some() {
        return Ok(register_page(
            vec![FieldError::new("email", "Email is already registered")],
            &form.name,
            &form.email,
        ));
    }

    let new_user = NewUser {
        name: form.name.clone(),
        email: form.email.clone(),
        password_hash: hash_password(&form.password)?,
        token: generate_opaque_id(),
    };

    let user = match state.store.create(new_user).await {
        Ok(user) => user,
        // Lost the race against a concurrent registration for the same email
        Err(AppError::EmailTaken) => {
            return Ok(register_page(
                vec![FieldError::new("email", "Email is already registered")],
                &form.name,
                &form.email,
            ));
        },
        Err(err) => return Err(err),
    };

    state.mailer.send_confirmation_email(&user).await?;

    counter!(USER_REGISTERED).increment(1);
    tracing::info!(user = %user.id, "account registered");

    Ok(Html(views::render_message_page(&MessagePage {
        page_title: "Account created".to_string(),
        message: "We sent you a confirmation email; follow the link inside to activate your account.".to_string(),
    }))
    .into_response())
}

/// GET /auth/confirm/{token}
pub async fn confirm<S: UserStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(token): Path<String>,
) -> Result<Response, AppError> {
    let Some(mut user) = state.store.find_by_token(&token).await? else {
        return Ok(outcome_page(
            "Confirmation failed",
            "There was a problem confirming your account, try again",
            true,
        ));
    };

    user.confirm();
    state.store.save(&user).await?;

    counter!(ACCOUNT_CONFIRMED).increment(1);
    tracing::info!(user = %user.id, "account confirmed");

    Ok(outcome_page(
        "Account confirmed",
        "Your account was confirmed successfully",
        false,
    ))
}

/// GET /auth/forgot-password
pub async fn forgot_password_form() -> Response {
    forgot_password_page(Vec::new())
}

/// POST /auth/forgot-password
pub async fn forgot_password<S: UserStore>(
    State(state): State<Arc<AppState<S>>>,
    Form(form): Form<ForgotPasswordForm>,
) -> Result<Response, AppError> {
    if let Err(err) = validation::validate_email(&form.email) {
        return Ok(forgot_password_page(vec![err.into()]));
    }

    let Some(mut user) = state.store.find_by_email(&form.email).await? else {
        return Ok(forgot_password_page(vec![FieldError::new(
            "email",
            "That email does not belong to any user",
        )]));
    };

    user.begin_reset(generate_opaque_id());
    state.store.save(&user).await?;
    state.mailer.send_reset_email(&user).await?;

    counter!(RESET_REQUESTED).increment(1);
    tracing::info!(user = %user.id, "password reset requested");

    Ok(Html(views::render_message_page(&MessagePage {
        page_title: "Reset your password".to_string(),
        message: "We sent you an email with instructions.".to_string(),
    }))
    .into_response())
}

/// GET /auth/reset-password/{token}
///
/// Inspects the token without consuming it; it stays valid until a new
/// password is actually saved.
pub async fn reset_form<S: UserStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(token): Path<String>,
) -> Result<Response, AppError> {
    if state.store.find_by_token(&token).await?.is_none() {
        return Ok(outcome_page(
            "Reset your password",
            "There was a problem validating your request, try again",
            true,
        ));
    }

    Ok(reset_password_page(Vec::new(), token))
}

/// POST /auth/reset-password/{token}
pub async fn reset_password<S: UserStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(token): Path<String>,
    Form(form): Form<ResetPasswordForm>,
) -> Result<Response, AppError> {
    if let Err(err) = validation::validate_password(&form.password) {
        return Ok(reset_password_page(vec![err.into()], token));
    }

    let Some(mut user) = state.store.find_by_token(&token).await? else {
        return Ok(outcome_page(
            "Reset your password",
            "There was a problem validating your request, try again",
            true,
        ));
    };

    user.complete_reset(hash_password(&form.password)?);
    state.store.save(&user).await?;

    counter!(RESET_COMPLETED).increment(1);
    tracing::info!(user = %user.id, "password reset completed");

    Ok(outcome_page(
        "Password saved",
        "Your new password was saved successfully",
        false,
    ))
}
