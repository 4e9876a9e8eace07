use tracing::{info, warn};

use super::{Session, SessionStore};
use crate::api::{ApiClient, ApiError};
use crate::models::{Category, User};

/// Everything a handler needs: the session, its persistence, and the API.
///
/// Session writes go through the transition methods here so that every change
/// is mirrored to disk.
pub struct AppContext {
    session: Session,
    store: SessionStore,
    api: ApiClient,
}

impl AppContext {
    pub fn new(store: SessionStore, api: ApiClient) -> Self {
        Self {
            session: Session::default(),
            store,
            api,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Categories of the signed-in user, empty when signed out.
    pub fn categories(&self) -> &[Category] {
        self.session
            .user()
            .map(|u| u.categories.as_slice())
            .unwrap_or(&[])
    }

    /// Signed in, or holding a persisted token that has not been checked yet.
    pub fn has_credentials(&self) -> bool {
        self.session.is_authenticated() || self.store.has_token()
    }

    /// Token for authorized requests. The persisted token wins over the in-memory one.
    pub fn bearer(&self) -> Result<String, ApiError> {
        self.store
            .token()
            .or_else(|| self.session.token().map(str::to_string))
            .ok_or(ApiError::NotSignedIn)
    }

    /// Rehydrate from the persisted mirror. Called once at startup.
    pub fn restore(&mut self) {
        if let Some(mirror) = self.store.load_mirror() {
            self.restore_session(mirror.user, mirror.token);
            if self.session.is_authenticated() {
                info!("Restored persisted session");
            }
        }
    }

    pub fn set_user(&mut self, user: User, token: String) {
        self.session.set_user(user, token);
        self.mirror();
    }

    pub fn restore_session(&mut self, user: Option<User>, token: Option<String>) {
        self.session.restore_session(user, token);
        self.mirror();
    }

    pub fn refresh_user(&mut self, user: User) {
        if self.session.refresh_user(user) {
            self.mirror();
        } else {
            warn!("Dropped profile refresh: not signed in");
        }
    }

    pub fn log_out(&mut self) {
        self.session.log_out();
        self.mirror();
    }

    /// Re-fetch `GET /user` and splice it into the session.
    pub fn reload_profile(&mut self) -> Result<(), ApiError> {
        let token = self.bearer()?;
        let user = self.api.fetch_profile(&token)?;
        self.refresh_user(user);
        Ok(())
    }

    fn mirror(&self) {
        if let Err(e) = self.store.save_mirror(&self.session) {
            warn!("Failed to mirror session: {e:#}");
        }
    }
}
