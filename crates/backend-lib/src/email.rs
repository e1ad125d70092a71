// ============================
// openestate-backend-lib/src/email.rs
// ============================
//! Transactional email notifications.
//!
//! Confirmation and reset emails each carry a link containing the user's
//! pending opaque token. Sending with no pending token is an error, never
//! a silent no-op.
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{Message, SmtpTransport, Transport};
use openestate_common::User;

use crate::config::{MailSettings, Settings};
use crate::error::AppError;
use crate::validation::sanitize_string;

/// Trait for outbound notification transports
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send the account-confirmation email for a freshly registered user
    async fn send_confirmation_email(&self, user: &User) -> Result<(), AppError>;

    /// Send the password-reset email for a user with a pending reset token
    async fn send_reset_email(&self, user: &User) -> Result<(), AppError>;
}

/// SMTP implementation of the `Mailer` trait, backed by lettre
pub struct SmtpMailer {
    mail: MailSettings,
    base_url: String,
}

impl SmtpMailer {
    pub fn new(settings: &Settings) -> Self {
        Self {
            mail: settings.mail.clone(),
            base_url: format!("{}:{}", settings.backend_url, settings.port),
        }
    }

    fn transport(&self) -> Result<SmtpTransport, AppError> {
        let tls = TlsParameters::builder(self.mail.host.clone())
            .build()
            .map_err(|e| AppError::Mail(e.to_string()))?;

        let transport = SmtpTransport::relay(&self.mail.host)
            .map_err(|e| AppError::Mail(e.to_string()))?
            .credentials(Credentials::new(
                self.mail.username.clone(),
                self.mail.password.clone(),
            ))
            .port(self.mail.port)
            .tls(Tls::Required(tls))
            .build();

        Ok(transport)
    }

    fn build_message(&self, user: &User, subject: &str, html: String) -> Result<Message, AppError> {
        let from: Mailbox = format!("OpenEstate <{}>", self.mail.from)
            .parse()
            .map_err(|e| AppError::Mail(format!("invalid from address: {e}")))?;
        let to: Mailbox = user
            .email
            .parse()
            .map_err(|e| AppError::Mail(format!("invalid recipient address: {e}")))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html)
            .map_err(|e| AppError::Mail(e.to_string()))
    }

    async fn deliver(&self, message: Message) -> Result<(), AppError> {
        let transport = self.transport()?;

        // lettre's SMTP transport blocks; keep it off the async runtime
        tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(|e| AppError::Mail(e.to_string()))?
            .map_err(|e| AppError::Mail(e.to_string()))?;

        Ok(())
    }
}

/// The user's pending token, or an error when there is none to link to
fn pending_token(user: &User) -> Result<&str, AppError> {
    match user.token.as_deref() {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(AppError::Mail(
            "no pending token to embed in outbound email".to_string(),
        )),
    }
}

/// HTML body for the account-confirmation email
fn confirmation_html(name: &str, link: &str) -> String {
    let name = sanitize_string(name);
    format!(
        "<p>Hello {name}, welcome to OpenEstate.</p>\
         <p>Your account is almost ready; activate it through the link below: \
         <a href=\"{link}\">Confirm account</a></p>\
         <p>If you did not create this account, you can ignore this message.</p>"
    )
}

/// HTML body for the password-reset email
fn reset_html(name: &str, link: &str) -> String {
    let name = sanitize_string(name);
    format!(
        "<p>Hello {name}, you asked to reset your OpenEstate password.</p>\
         <p>Follow the link below to choose a new one: \
         <a href=\"{link}\">Reset password</a></p>\
         <p>If you did not request this change, you can ignore this message.</p>"
    )
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_confirmation_email(&self, user: &User) -> Result<(), AppError> {
        let token = pending_token(user)?;
        let link = format!("{}/auth/confirm/{}", self.base_url, token);

        let message = self.build_message(
            user,
            "Confirm your OpenEstate account",
            confirmation_html(&user.name, &link),
        )?;

        self.deliver(message).await?;
        tracing::info!(user = %user.id, "confirmation email sent");
        Ok(())
    }

    async fn send_reset_email(&self, user: &User) -> Result<(), AppError> {
        let token = pending_token(user)?;
        let link = format!("{}/auth/reset-password/{}", self.base_url, token);

        let message = self.build_message(
            user,
            "Reset your OpenEstate password",
            reset_html(&user.name, &link),
        )?;

        self.deliver(message).await?;
        tracing::info!(user = %user.id, "password reset email sent");
        Ok(())
    }
}
