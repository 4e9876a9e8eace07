use tracing::{info, warn};

use crate::api::ApiError;
use crate::session::AppContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootState {
    Loading,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootOutcome {
    /// No persisted token; nothing was requested.
    Anonymous,
    /// The token was accepted and the profile loaded.
    SignedIn,
    /// The server rejected the token; the session was cleared.
    Expired,
    /// The server could not be reached or answered garbage; the session was cleared.
    Unreachable,
}

/// Validate the persisted token against `GET /user`. Runs once per launch.
pub fn bootstrap(ctx: &mut AppContext) -> BootOutcome {
    let Some(token) = ctx.store().token() else {
        return BootOutcome::Anonymous;
    };

    match ctx.api().fetch_profile(&token) {
        Ok(user) => {
            info!(email = %user.email, "Session validated");
            ctx.set_user(user, token);
            BootOutcome::SignedIn
        }
        Err(e) => {
            let outcome = match e {
                ApiError::Rejected { status, .. } => {
                    info!(status, "Persisted token rejected, signing out");
                    BootOutcome::Expired
                }
                other => {
                    warn!("Profile fetch failed, signing out: {other}");
                    BootOutcome::Unreachable
                }
            };
            if let Err(e) = ctx.store().remove_token() {
                warn!("Failed to remove stale token: {e:#}");
            }
            ctx.log_out();
            outcome
        }
    }
}
