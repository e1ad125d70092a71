// crates/backend-lib/tests/auth_flows.rs
//! End-to-end tests for the auth flows, driven through the router.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use backend_lib::auth::verify_password;
use backend_lib::config::Settings;
use backend_lib::email::Mailer;
use backend_lib::error::AppError;
use backend_lib::router::create_router;
use backend_lib::storage::{SqliteStore, UserStore};
use backend_lib::AppState;
use openestate_common::User;

const TEST_SECRET: &str = "zJ4kP9mQ2vX7nR5tY8wB3cD6fG1hL0aE";

#[derive(Clone)]
struct SentEmail {
    kind: &'static str,
    to: String,
    token: String,
}

/// Mailer double that records outbound email instead of delivering it
#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<SentEmail>>,
}

impl RecordingMailer {
    fn record(&self, kind: &'static str, user: &User) -> Result<(), AppError> {
        let token = user
            .token
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Mail("no pending token".to_string()))?;

        self.sent.lock().unwrap().push(SentEmail {
            kind,
            to: user.email.clone(),
            token,
        });
        Ok(())
    }

    fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_confirmation_email(&self, user: &User) -> Result<(), AppError> {
        self.record("confirmation", user)
    }

    async fn send_reset_email(&self, user: &User) -> Result<(), AppError> {
        self.record("reset", user)
    }
}

struct TestApp {
    router: Router,
    store: SqliteStore,
    mailer: Arc<RecordingMailer>,
    _tmp: TempDir,
}

async fn test_app() -> TestApp {
    let tmp = TempDir::new().unwrap();
    let url = format!("sqlite://{}", tmp.path().join("users.db").display());
    let store = SqliteStore::new(&url).await.unwrap();

    let mailer = Arc::new(RecordingMailer::default());

    let mut settings = Settings::default();
    settings.backend_url = "http://localhost".to_string();
    settings.database_url = url;
    settings.jwt_secret = TEST_SECRET.to_string();

    let dyn_mailer: Arc<dyn Mailer> = mailer.clone();
    let state = Arc::new(AppState::new(store.clone(), dyn_mailer, settings).unwrap());

    TestApp {
        router: create_router(state),
        store,
        mailer,
        _tmp: tmp,
    }
}

async fn get(router: &Router, uri: &str) -> Response<Body> {
    router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_form(router: &Router, uri: &str, body: &str) -> Response<Body> {
    router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Register Ana through the HTTP surface and return her pending token
async fn register_ana(app: &TestApp) -> String {
    let response = post_form(
        &app.router,
        "/auth/register",
        "name=Ana+Torres&email=ana@example.com&password=secret1&repeat_password=secret1",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let sent = app.mailer.sent();
    sent.last()
        .expect("a confirmation email should have been sent")
        .token
        .clone()
}

/// Register and confirm Ana, leaving her able to sign in
async fn register_and_confirm_ana(app: &TestApp) -> User {
    let token = register_ana(app).await;
    let response = get(&app.router, &format!("/auth/confirm/{token}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    app.store
        .find_by_email("ana@example.com")
        .await
        .unwrap()
        .unwrap()
}

#[tokio::test]
async fn form_pages_render() {
    let app = test_app().await;

    for uri in ["/auth/login", "/auth/register", "/auth/forgot-password"] {
        let response = get(&app.router, uri).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_text(response).await;
        assert!(body.contains("OpenEstate"), "{uri} should render the shell");
        assert!(body.contains("_csrf"), "{uri} should carry a csrf field");
    }
}

#[tokio::test]
async fn register_creates_pending_user_and_sends_confirmation_email() {
    let app = test_app().await;

    let token = register_ana(&app).await;

    let user = app
        .store
        .find_by_email("ana@example.com")
        .await
        .unwrap()
        .expect("the row should exist");
    assert!(!user.confirmed);
    assert_eq!(user.token.as_deref(), Some(token.as_str()));
    assert!(verify_password(&user.password_hash, "secret1"));
    assert!(!user.password_hash.contains("secret1"));

    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].kind, "confirmation");
    assert_eq!(sent[0].to, "ana@example.com");
    assert_eq!(sent[0].token, token);
}

#[tokio::test]
async fn register_with_duplicate_email_is_rejected() {
    let app = test_app().await;

    register_ana(&app).await;

    let response = post_form(
        &app.router,
        "/auth/register",
        "name=Impostor&email=ana@example.com&password=other99&repeat_password=other99",
    )
    .await;
    let body = body_text(response).await;

    assert!(body.contains("already registered"));
    assert_eq!(app.store.user_count().await.unwrap(), 1);
    assert_eq!(app.mailer.sent().len(), 1); // no second email either
}

#[tokio::test]
async fn register_validation_failure_leaves_store_untouched() {
    let app = test_app().await;

    let response = post_form(
        &app.router,
        "/auth/register",
        "name=Ana&email=ana@example.com&password=secret1&repeat_password=different",
    )
    .await;
    let body = body_text(response).await;

    assert!(body.contains("Passwords do not match"));
    // Echoed back into the form for correction
    assert!(body.contains(r#"value="ana@example.com""#));

    assert_eq!(app.store.user_count().await.unwrap(), 0);
    assert!(app.mailer.sent().is_empty());
}

#[tokio::test]
async fn confirm_consumes_token_exactly_once() {
    let app = test_app().await;
    let token = register_ana(&app).await;

    let first = body_text(get(&app.router, &format!("/auth/confirm/{token}")).await).await;
    assert!(first.contains("confirmed successfully"));

    let user = app
        .store
        .find_by_email("ana@example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(user.confirmed);
    assert!(user.token.is_none());

    // The cleared token no longer resolves
    let second = body_text(get(&app.router, &format!("/auth/confirm/{token}")).await).await;
    assert!(second.contains("problem confirming your account"));
}

#[tokio::test]
async fn confirm_with_unknown_token_mutates_nothing() {
    let app = test_app().await;
    register_ana(&app).await;

    let body = body_text(get(&app.router, "/auth/confirm/bogus-token").await).await;
    assert!(body.contains("problem confirming"));

    let user = app
        .store
        .find_by_email("ana@example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(!user.confirmed);
    assert!(user.token.is_some());
}

#[tokio::test]
async fn login_requires_confirmed_account() {
    let app = test_app().await;
    register_ana(&app).await;

    let response = post_form(
        &app.router,
        "/auth/login",
        "email=ana@example.com&password=secret1",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK); // re-rendered form, no redirect

    let body = body_text(response).await;
    assert!(body.contains("has not been confirmed"));
}

#[tokio::test]
async fn login_rejects_wrong_password_and_unknown_email() {
    let app = test_app().await;
    register_and_confirm_ana(&app).await;

    let wrong = post_form(
        &app.router,
        "/auth/login",
        "email=ana@example.com&password=not-it",
    )
    .await;
    assert!(wrong.headers().get(header::SET_COOKIE).is_none());
    assert!(body_text(wrong).await.contains("Incorrect password"));

    let unknown = post_form(
        &app.router,
        "/auth/login",
        "email=ghost@example.com&password=secret1",
    )
    .await;
    assert!(body_text(unknown).await.contains("No account exists"));
}

#[tokio::test]
async fn login_success_sets_session_cookie_and_redirects() {
    let app = test_app().await;
    register_and_confirm_ana(&app).await;

    let response = post_form(
        &app.router,
        "/auth/login",
        "email=ana@example.com&password=secret1",
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/my-properties"
    );

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("a session cookie should be set")
        .to_str()
        .unwrap();
    assert!(cookie.starts_with("_token="));
    assert!(cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn forgot_password_rotates_token_and_sends_reset_email() {
    let app = test_app().await;
    let user = register_and_confirm_ana(&app).await;
    assert!(user.token.is_none());

    let response = post_form(
        &app.router,
        "/auth/forgot-password",
        "email=ana@example.com",
    )
    .await;
    assert!(body_text(response).await.contains("email with instructions"));

    let user = app
        .store
        .find_by_email("ana@example.com")
        .await
        .unwrap()
        .unwrap();
    let first_token = user.token.clone().expect("a reset token should be set");
    assert!(user.confirmed); // requesting a reset never un-confirms

    // A second request issues a distinct fresh token
    post_form(&app.router, "/auth/forgot-password", "email=ana@example.com").await;
    let user = app
        .store
        .find_by_email("ana@example.com")
        .await
        .unwrap()
        .unwrap();
    let second_token = user.token.clone().unwrap();
    assert_ne!(first_token, second_token);

    let sent = app.mailer.sent();
    let resets: Vec<_> = sent.iter().filter(|e| e.kind == "reset").collect();
    assert_eq!(resets.len(), 2);
    assert_eq!(resets[1].token, second_token);
}

#[tokio::test]
async fn forgot_password_with_unknown_email_mutates_nothing() {
    let app = test_app().await;

    let response = post_form(
        &app.router,
        "/auth/forgot-password",
        "email=ghost@example.com",
    )
    .await;

    assert!(body_text(response)
        .await
        .contains("does not belong to any user"));
    assert!(app.mailer.sent().is_empty());
}

#[tokio::test]
async fn reset_form_inspects_token_without_consuming_it() {
    let app = test_app().await;
    register_and_confirm_ana(&app).await;
    post_form(&app.router, "/auth/forgot-password", "email=ana@example.com").await;

    let token = app.mailer.sent().last().unwrap().token.clone();

    // Showing the form twice works; the token is only cleared by the POST
    for _ in 0..2 {
        let response = get(&app.router, &format!("/auth/reset-password/{token}")).await;
        let body = body_text(response).await;
        assert!(body.contains("new password"));
        assert!(body.contains(&format!("/auth/reset-password/{token}")));
    }

    let user = app
        .store
        .find_by_email("ana@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.token.as_deref(), Some(token.as_str()));
}

#[tokio::test]
async fn reset_form_with_unknown_token_renders_error() {
    let app = test_app().await;

    let body = body_text(get(&app.router, "/auth/reset-password/bogus").await).await;
    assert!(body.contains("problem validating your request"));
}

#[tokio::test]
async fn reset_password_rehashes_and_clears_token() {
    let app = test_app().await;
    register_and_confirm_ana(&app).await;
    post_form(&app.router, "/auth/forgot-password", "email=ana@example.com").await;

    let token = app.mailer.sent().last().unwrap().token.clone();

    let response = post_form(
        &app.router,
        &format!("/auth/reset-password/{token}"),
        "password=brand-new-pass",
    )
    .await;
    assert!(body_text(response).await.contains("saved successfully"));

    let user = app
        .store
        .find_by_email("ana@example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(user.token.is_none());
    assert!(verify_password(&user.password_hash, "brand-new-pass"));
    assert!(!verify_password(&user.password_hash, "secret1"));

    // The consumed token is no longer accepted
    let replay = post_form(
        &app.router,
        &format!("/auth/reset-password/{token}"),
        "password=sneaky-pass",
    )
    .await;
    assert!(body_text(replay).await.contains("problem validating"));

    // And the new credentials sign in
    let login = post_form(
        &app.router,
        "/auth/login",
        "email=ana@example.com&password=brand-new-pass",
    )
    .await;
    assert_eq!(login.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn reset_password_too_short_keeps_token_pending() {
    let app = test_app().await;
    register_and_confirm_ana(&app).await;
    post_form(&app.router, "/auth/forgot-password", "email=ana@example.com").await;

    let token = app.mailer.sent().last().unwrap().token.clone();

    let response = post_form(
        &app.router,
        &format!("/auth/reset-password/{token}"),
        "password=tiny",
    )
    .await;
    assert!(body_text(response)
        .await
        .contains("at least 6 characters"));

    // Validation failure leaves the pending token in place
    let user = app
        .store
        .find_by_email("ana@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.token.as_deref(), Some(token.as_str()));
}
