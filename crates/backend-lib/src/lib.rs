// ============================
// openestate-backend-lib/src/lib.rs
// ============================
//! Core backend-lib functionality for the `OpenEstate` auth server.

pub mod auth;
pub mod config;
pub mod email;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod router;
pub mod storage;
pub mod validation;
pub mod views;

use std::sync::Arc;

use crate::auth::SessionSigner;
use crate::config::Settings;
use crate::email::Mailer;
use crate::error::AppError;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState<S> {
    /// User store backend
    pub store: S,
    /// Outbound mail transport
    pub mailer: Arc<dyn Mailer>,
    /// Session token signer
    pub sessions: SessionSigner,
    /// Settings
    pub settings: Arc<Settings>,
}

impl<S> AppState<S> {
    /// Create a new application state
    pub fn new(store: S, mailer: Arc<dyn Mailer>, settings: Settings) -> Result<Self, AppError> {
        let sessions = SessionSigner::new(&settings.jwt_secret, settings.session_ttl_secs)?;

        Ok(Self {
            store,
            mailer,
            sessions,
            settings: Arc::new(settings),
        })
    }
}
