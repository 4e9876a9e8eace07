use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::{info, warn};

use super::Draft;
use crate::api::ApiError;
use crate::models::{Credentials, Registration};
use crate::session::AppContext;

static EMAIL_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^@ \t\r\n]+@[^@ \t\r\n]+\.[^@ \t\r\n]+$").ok());

fn looks_like_email(s: &str) -> bool {
    match EMAIL_RE.as_ref() {
        Some(re) => re.is_match(s),
        None => s.contains('@'),
    }
}

#[derive(Error, Debug)]
pub enum AuthFailure {
    #[error("{0}")]
    Invalid(String),

    #[error("Wrong email or password!")]
    WrongCredentials,

    #[error("Email address already exists!")]
    EmailTaken,

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginDraft {
    pub email: String,
    pub password: String,
}

impl Draft for LoginDraft {
    fn labels() -> &'static [&'static str] {
        &["Email", "Password"]
    }

    fn field(&self, index: usize) -> &str {
        match index {
            0 => &self.email,
            1 => &self.password,
            _ => "",
        }
    }

    fn field_mut(&mut self, index: usize) -> Option<&mut String> {
        match index {
            0 => Some(&mut self.email),
            1 => Some(&mut self.password),
            _ => None,
        }
    }

    fn is_secret(index: usize) -> bool {
        index == 1
    }
}

impl LoginDraft {
    fn validate(&self) -> Result<Credentials, AuthFailure> {
        let email = self.email.trim();
        if !looks_like_email(email) {
            return Err(AuthFailure::Invalid("Enter a valid email address".into()));
        }
        if self.password.is_empty() {
            return Err(AuthFailure::Invalid("Password is required".into()));
        }
        Ok(Credentials {
            email: email.to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl Draft for RegisterDraft {
    fn labels() -> &'static [&'static str] {
        &["First Name", "Last Name", "Email", "Password"]
    }

    fn field(&self, index: usize) -> &str {
        match index {
            0 => &self.first_name,
            1 => &self.last_name,
            2 => &self.email,
            3 => &self.password,
            _ => "",
        }
    }

    fn field_mut(&mut self, index: usize) -> Option<&mut String> {
        match index {
            0 => Some(&mut self.first_name),
            1 => Some(&mut self.last_name),
            2 => Some(&mut self.email),
            3 => Some(&mut self.password),
            _ => None,
        }
    }

    fn is_secret(index: usize) -> bool {
        index == 3
    }
}

impl RegisterDraft {
    fn validate(&self) -> Result<Registration, AuthFailure> {
        let first_name = self.first_name.trim();
        let last_name = self.last_name.trim();
        if first_name.is_empty() || last_name.is_empty() {
            return Err(AuthFailure::Invalid("First and last name are required".into()));
        }
        let email = self.email.trim();
        if !looks_like_email(email) {
            return Err(AuthFailure::Invalid("Enter a valid email address".into()));
        }
        if self.password.is_empty() {
            return Err(AuthFailure::Invalid("Password is required".into()));
        }
        Ok(Registration {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            password: self.password.clone(),
        })
    }
}

/// `POST /auth/login`; on success persists the token and signs the session in.
/// A rejection leaves the session untouched.
pub fn login(ctx: &mut AppContext, draft: &LoginDraft) -> Result<(), AuthFailure> {
    let credentials = draft.validate()?;
    let response = ctx.api().login(&credentials).map_err(|e| {
        if e.is_client_rejection() {
            AuthFailure::WrongCredentials
        } else {
            AuthFailure::Api(e)
        }
    })?;

    if let Err(e) = ctx.store().save_token(&response.token) {
        warn!("Failed to persist token: {e:#}");
    }
    info!(email = %credentials.email, "Signed in");
    ctx.set_user(response.user, response.token);
    Ok(())
}

/// `POST /auth/register`. Does not sign in; the caller sends the user to login.
pub fn register(ctx: &AppContext, draft: &RegisterDraft) -> Result<(), AuthFailure> {
    let registration = draft.validate()?;
    ctx.api().register(&registration).map_err(|e| {
        if e.is_client_rejection() {
            AuthFailure::EmailTaken
        } else {
            AuthFailure::Api(e)
        }
    })?;
    info!(email = %registration.email, "Registered");
    Ok(())
}

/// Drop the persisted token and clear the session.
pub fn log_out(ctx: &mut AppContext) {
    if let Err(e) = ctx.store().remove_token() {
        warn!("Failed to remove token: {e:#}");
    }
    ctx.log_out();
    info!("Signed out");
}
