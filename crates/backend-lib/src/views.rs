// ============================
// openestate-backend-lib/src/views.rs
// ============================
//! Server-rendered HTML for the auth flows.
//!
//! Each page is rendered from its typed context struct; there are no
//! dynamic field bags. Submitted values echoed back into a form are
//! escaped before interpolation.

use openestate_common::{
    ConfirmPage, FieldError, ForgotPasswordPage, LoginPage, MessagePage, RegisterPage,
    ResetPasswordPage,
};

use crate::validation::sanitize_string;

fn base_style() -> &'static str {
    r#"
    * { margin: 0; padding: 0; box-sizing: border-box; }
    body {
        font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
        background: #f4f1ec; color: #333;
        display: flex; justify-content: center; align-items: center;
        min-height: 100vh; padding: 20px;
    }
    .card {
        background: #fff; border-radius: 12px; padding: 32px;
        max-width: 420px; width: 100%; box-shadow: 0 4px 24px rgba(0,0,0,0.08);
    }
    .logo { text-align: center; margin-bottom: 24px; }
    .logo h1 { font-size: 26px; color: #1f3d2b; }
    .logo p { font-size: 14px; color: #666; margin-top: 4px; }
    .form-group { margin-bottom: 16px; }
    .form-group label { display: block; font-size: 14px; font-weight: 500; margin-bottom: 6px; color: #444; }
    .form-group input {
        width: 100%; padding: 12px 14px; border: 1.5px solid #ddd;
        border-radius: 8px; font-size: 16px; outline: none; transition: border-color 0.2s;
    }
    .form-group input:focus { border-color: #2f7d4f; }
    .btn {
        width: 100%; padding: 14px; border: none; border-radius: 8px;
        font-size: 16px; font-weight: 600; cursor: pointer; transition: background 0.2s;
    }
    .btn-primary { background: #2f7d4f; color: #fff; }
    .btn-primary:hover { background: #266741; }
    .errors { background: #fff0f0; color: #d32f2f; padding: 10px 14px; border-radius: 8px; font-size: 13px; margin-bottom: 16px; }
    .errors li { list-style: none; padding: 2px 0; }
    .message { text-align: center; font-size: 15px; color: #555; margin-top: 8px; }
    .message.failure { color: #d32f2f; }
    .link { text-align: center; margin-top: 16px; font-size: 14px; color: #666; }
    .link a { color: #2f7d4f; text-decoration: none; }
    .link a:hover { text-decoration: underline; }
    "#
}

/// Wrap a page body in the shared document shell
fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en"><head>
<meta charset="utf-8"><meta name="viewport" content="width=device-width,initial-scale=1">
<title>OpenEstate - {title}</title>
<style>{style}</style>
</head><body>
<div class="card">
{body}
</div>
</body></html>"#,
        style = base_style(),
    )
}

/// Inline error list shown above a form, empty string when there is
/// nothing to report
fn errors_html(errors: &[FieldError]) -> String {
    if errors.is_empty() {
        return String::new();
    }

    let items: String = errors
        .iter()
        .map(|e| format!("<li>{}</li>", sanitize_string(&e.message)))
        .collect();

    format!(r#"<ul class="errors">{items}</ul>"#)
}

pub fn render_login_page(ctx: &LoginPage) -> String {
    let errors = errors_html(&ctx.errors);
    let csrf = &ctx.csrf_token;

    let body = format!(
        r#"  <div class="logo"><h1>OpenEstate</h1><p>Sign in</p></div>
  {errors}
  <form method="POST" action="/auth/login">
    <input type="hidden" name="_csrf" value="{csrf}">
    <div class="form-group">
      <label>Email</label>
      <input type="email" name="email" required autocomplete="email" placeholder="Your email">
    </div>
    <div class="form-group">
      <label>Password</label>
      <input type="password" name="password" required autocomplete="current-password" placeholder="Your password">
    </div>
    <button type="submit" class="btn btn-primary">Sign in</button>
  </form>
  <div class="link">
    <a href="/auth/register">Create an account</a> &middot;
    <a href="/auth/forgot-password">Forgot your password?</a>
  </div>"#
    );

    page("Sign in", &body)
}

pub fn render_register_page(ctx: &RegisterPage) -> String {
    let errors = errors_html(&ctx.errors);
    let csrf = &ctx.csrf_token;
    let name = sanitize_string(&ctx.name);
    let email = sanitize_string(&ctx.email);

    let body = format!(
        r#"  <div class="logo"><h1>OpenEstate</h1><p>Create your account</p></div>
  {errors}
  <form method="POST" action="/auth/register">
    <input type="hidden" name="_csrf" value="{csrf}">
    <div class="form-group">
      <label>Name</label>
      <input type="text" name="name" required placeholder="Your name" value="{name}">
    </div>
    <div class="form-group">
      <label>Email</label>
      <input type="email" name="email" required autocomplete="email" placeholder="Your email" value="{email}">
    </div>
    <div class="form-group">
      <label>Password</label>
      <input type="password" name="password" required autocomplete="new-password" placeholder="Min 6 characters" minlength="6">
    </div>
    <div class="form-group">
      <label>Repeat password</label>
      <input type="password" name="repeat_password" required autocomplete="new-password" placeholder="Repeat your password" minlength="6">
    </div>
    <button type="submit" class="btn btn-primary">Create account</button>
  </form>
  <div class="link">
    Already have an account? <a href="/auth/login">Sign in</a>
  </div>"#
    );

    page("Create account", &body)
}

pub fn render_forgot_password_page(ctx: &ForgotPasswordPage) -> String {
    let errors = errors_html(&ctx.errors);
    let csrf = &ctx.csrf_token;

    let body = format!(
        r#"  <div class="logo"><h1>OpenEstate</h1><p>Recover your access</p></div>
  {errors}
  <form method="POST" action="/auth/forgot-password">
    <input type="hidden" name="_csrf" value="{csrf}">
    <div class="form-group">
      <label>Email</label>
      <input type="email" name="email" required autocomplete="email" placeholder="Your email">
    </div>
    <button type="submit" class="btn btn-primary">Send instructions</button>
  </form>
  <div class="link">
    <a href="/auth/login">Back to sign in</a>
  </div>"#
    );

    page("Recover your access", &body)
}

pub fn render_reset_password_page(ctx: &ResetPasswordPage) -> String {
    let errors = errors_html(&ctx.errors);
    let csrf = &ctx.csrf_token;
    let token = sanitize_string(&ctx.token);

    let body = format!(
        r#"  <div class="logo"><h1>OpenEstate</h1><p>Choose a new password</p></div>
  {errors}
  <form method="POST" action="/auth/reset-password/{token}">
    <input type="hidden" name="_csrf" value="{csrf}">
    <div class="form-group">
      <label>New password</label>
      <input type="password" name="password" required autocomplete="new-password" placeholder="Min 6 characters" minlength="6">
    </div>
    <button type="submit" class="btn btn-primary">Save password</button>
  </form>"#
    );

    page("Choose a new password", &body)
}

pub fn render_message_page(ctx: &MessagePage) -> String {
    let title = sanitize_string(&ctx.page_title);
    let message = sanitize_string(&ctx.message);

    let body = format!(
        r#"  <div class="logo"><h1>{title}</h1></div>
  <p class="message">{message}</p>"#
    );

    page(&title, &body)
}

pub fn render_confirm_page(ctx: &ConfirmPage) -> String {
    let title = sanitize_string(&ctx.page_title);
    let message = sanitize_string(&ctx.message);
    let class = if ctx.error { "message failure" } else { "message" };
    let footer = if ctx.error {
        r#"  <div class="link"><a href="/auth/login">Back to sign in</a></div>"#
    } else {
        r#"  <div class="link"><a href="/auth/login">Sign in</a></div>"#
    };

    let body = format!(
        r#"  <div class="logo"><h1>{title}</h1></div>
  <p class="{class}">{message}</p>
{footer}"#
    );

    page(&title, &body)
}

/// Minimal page shown for unrecovered infrastructure errors
pub fn render_error_page(status: u16, message: &str) -> String {
    let message = sanitize_string(message);

    let body = format!(
        r#"  <div class="logo"><h1>Something went wrong</h1><p>Error {status}</p></div>
  <p class="message failure">{message}</p>"#
    );

    page("Error", &body)
}
