//! Create/edit forms and the row actions of the tables next to them.
//!
//! A [`ResourceForm`] is generic over a [`Resource`]: the record type plus its
//! typed draft, validated payload and endpoints. Mode is explicit
//! ([`FormMode`]) rather than guessed from the draft's contents.

mod auth;
mod category;
mod list;
mod transaction;

use tracing::{info, warn};

use crate::api::{ApiClient, ApiError};
use crate::models::Category;
use crate::session::AppContext;

pub use auth::{log_out, login, register, AuthFailure, LoginDraft, RegisterDraft};
pub use category::CategoryDraft;
pub use list::{category_icon, delete_prompt, delete_row, row_actions_enabled};
pub use transaction::TransactionDraft;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(String),
}

/// Text inputs of a form, addressed by index for the TUI.
pub trait Draft: Default + Clone + std::fmt::Debug {
    fn labels() -> &'static [&'static str];
    fn field(&self, index: usize) -> &str;
    fn field_mut(&mut self, index: usize) -> Option<&mut String>;

    /// Fields rendered masked.
    fn is_secret(_index: usize) -> bool {
        false
    }
}

pub trait Resource {
    type Draft: Draft;
    type Payload;

    /// Singular name used in paths and prompts, e.g. `category`.
    const NAME: &'static str;

    fn record_id(&self) -> Option<&str>;
    fn to_draft(&self, categories: &[Category]) -> Self::Draft;
    fn validate(draft: &Self::Draft, categories: &[Category]) -> Result<Self::Payload, String>;

    fn create(api: &ApiClient, token: &str, payload: &Self::Payload) -> Result<(), ApiError>;
    fn update(api: &ApiClient, token: &str, id: &str, payload: &Self::Payload)
        -> Result<(), ApiError>;
    fn delete(api: &ApiClient, token: &str, id: &str) -> Result<(), ApiError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Created,
    Updated(String),
    /// Local validation failed; no request was sent.
    Invalid,
    /// The request failed; the draft is kept for a retry.
    Failed,
}

impl Submission {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Created | Self::Updated(_))
    }
}

#[derive(Debug, Clone)]
pub struct ResourceForm<R: Resource> {
    mode: FormMode,
    draft: R::Draft,
    error: Option<String>,
}

impl<R: Resource> Default for ResourceForm<R> {
    fn default() -> Self {
        Self {
            mode: FormMode::Create,
            draft: R::Draft::default(),
            error: None,
        }
    }
}

impl<R: Resource> ResourceForm<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, FormMode::Edit(_))
    }

    pub fn draft(&self) -> &R::Draft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut R::Draft {
        &mut self.draft
    }

    /// Inline error from the last failed submit.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Seed the form from `record` and switch to edit mode.
    ///
    /// Records without an id cannot be edited and are ignored.
    pub fn begin_edit(&mut self, record: &R, categories: &[Category]) -> bool {
        let Some(id) = record.record_id() else {
            warn!("Cannot edit a {} without an id", R::NAME);
            return false;
        };
        self.mode = FormMode::Edit(id.to_string());
        self.draft = record.to_draft(categories);
        self.error = None;
        true
    }

    /// Back to create mode, discarding local edits.
    pub fn cancel(&mut self) {
        *self = Self::default();
    }

    /// Validate and send the full draft. On success the form resets; otherwise it
    /// keeps its draft and mode and records an inline error.
    pub fn submit(&mut self, ctx: &AppContext) -> Submission {
        let payload = match R::validate(&self.draft, ctx.categories()) {
            Ok(payload) => payload,
            Err(msg) => {
                self.error = Some(msg);
                return Submission::Invalid;
            }
        };

        let result = ctx.bearer().and_then(|token| match &self.mode {
            FormMode::Create => R::create(ctx.api(), &token, &payload).map(|_| Submission::Created),
            FormMode::Edit(id) => R::update(ctx.api(), &token, id, &payload)
                .map(|_| Submission::Updated(id.clone())),
        });

        match result {
            Ok(submission) => {
                info!("Saved {} ({submission:?})", R::NAME);
                self.cancel();
                submission
            }
            Err(e) => {
                warn!("Failed to save {}: {e}", R::NAME);
                self.error = Some(format!("Could not save {}: {e}", R::NAME));
                Submission::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests;
