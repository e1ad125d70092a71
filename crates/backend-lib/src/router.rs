// ============================
// openestate-backend-lib/src/router.rs
// ============================
//! HTTP router for the auth flows.
use crate::handlers::auth;
use crate::storage::UserStore;
use crate::AppState;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Create the application router
pub fn create_router<S: UserStore + 'static>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/auth/login", get(auth::login_form).post(auth::login::<S>))
        .route(
            "/auth/register",
            get(auth::register_form).post(auth::register::<S>),
        )
        .route("/auth/confirm/{token}", get(auth::confirm::<S>))
        .route(
            "/auth/forgot-password",
            get(auth::forgot_password_form).post(auth::forgot_password::<S>),
        )
        .route(
            "/auth/reset-password/{token}",
            get(auth::reset_form::<S>).post(auth::reset_password::<S>),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
