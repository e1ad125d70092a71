// ============================
// openestate-backend-lib/src/config.rs
// ============================
//! Configuration management.
use figment::{Figment, providers::{Env, Format, Toml}};
use serde::Deserialize;
use crate::error::AppError;

/// Application settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Port the HTTP server listens on
    #[serde(default = "default_port")]
    pub port: u16,
    /// Base URL used when building the links embedded in outbound email
    pub backend_url: String,
    /// SQLite database URL
    pub database_url: String,
    /// HS256 signing secret for session tokens
    pub jwt_secret: String,
    /// Session token lifetime in seconds
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,
    /// Outbound SMTP settings
    pub mail: MailSettings,
}

/// SMTP transport settings
#[derive(Debug, Clone, Deserialize)]
pub struct MailSettings {
    /// SMTP relay host
    pub host: String,
    /// SMTP relay port
    pub port: u16,
    /// SMTP username
    pub username: String,
    /// SMTP password
    pub password: String,
    /// From address for transactional mail
    pub from: String,
}

fn default_port() -> u16 {
    3000
}

fn default_session_ttl() -> u64 {
    60 * 60 * 24 // 1 day
}

impl Default for Settings {
    /// Placeholder values; `validate` rejects them. Real deployments load
    /// everything except the port from the environment or `config.toml`.
    fn default() -> Self {
        Self {
            port: default_port(),
            backend_url: String::new(),
            database_url: String::new(),
            jwt_secret: String::new(),
            session_ttl_secs: default_session_ttl(),
            mail: MailSettings::default(),
        }
    }
}

impl Default for MailSettings {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 587,
            username: String::new(),
            password: String::new(),
            from: String::new(),
        }
    }
}

impl Settings {
    /// Check that the loaded settings are usable
    pub fn validate(&self) -> Result<(), AppError> {
        if self.backend_url.is_empty() {
            return Err(AppError::Config("backend_url must be set".to_string()));
        }

        if self.database_url.is_empty() {
            return Err(AppError::Config("database_url must be set".to_string()));
        }

        if self.jwt_secret.len() < 32 {
            return Err(AppError::Config(
                "jwt_secret must be at least 32 characters".to_string(),
            ));
        }

        if self.session_ttl_secs == 0 {
            return Err(AppError::Config(
                "session_ttl_secs must be positive".to_string(),
            ));
        }

        if self.mail.host.is_empty() {
            return Err(AppError::Config("mail.host must be set".to_string()));
        }

        if self.mail.from.is_empty() {
            return Err(AppError::Config("mail.from must be set".to_string()));
        }

        Ok(())
    }
}

/// Load settings from various sources
pub fn load_settings() -> Result<Settings, AppError> {
    // Config file first, then environment variables on top. Nested keys use
    // a double underscore, e.g. OPENESTATE_MAIL__HOST.
    let settings: Settings = Figment::new()
        .merge(Toml::file("config.toml"))
        .merge(Env::prefixed("OPENESTATE_").split("__"))
        .extract()
        .map_err(|e| AppError::Config(e.to_string()))?;

    settings.validate()?;

    Ok(settings)
}
