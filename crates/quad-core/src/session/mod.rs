//! Reactive authentication session.
//!
//! [`SessionStore`] is the single source of truth for the signed-in
//! user. The current user is held in a watch channel: every subscriber
//! observes the same sequence of values, and guards that cannot suspend
//! read a synchronous snapshot. The auth token lives only in durable
//! storage and is read straight from it, so a token can exist before
//! the user has been rehydrated.

pub mod store;

use std::sync::Arc;

use quad_types::{AuthUser, LoginRequest, LoginResponse, ProfileUpdate};
use tokio::sync::watch;
use tracing::{error, warn};

use crate::api::{ApiClient, ApiError};
use store::CredentialStore;

/// Owner of the authenticated session.
///
/// Constructed once at startup and passed by reference to every
/// consumer (guard, navigation chrome, feed); there is no ambient
/// global and no lazy creation.
#[derive(Debug)]
pub struct SessionStore {
    api: ApiClient,
    store: Arc<CredentialStore>,
    current: watch::Sender<Option<AuthUser>>,
}

impl SessionStore {
    pub fn new(api: ApiClient, store: Arc<CredentialStore>) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            api,
            store,
            current,
        }
    }

    /// Rehydrates the session from durable storage at process start.
    ///
    /// A malformed stored user never surfaces as an error: the session
    /// simply starts unauthenticated. Seeds the broadcast value.
    pub fn initialize(&self) {
        let user = self.store.read_user();
        self.current.send_replace(user);
    }

    /// Sends credentials to the authentication boundary.
    ///
    /// On success, persists token and user as a pair, then broadcasts
    /// the user, then resolves with the full response. On failure the
    /// original error is propagated unchanged after being logged, and
    /// nothing is persisted.
    ///
    /// # Errors
    /// Returns the boundary's error untouched.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
        match self.api.login(credentials).await {
            Ok(response) => {
                if let Err(err) = self.store.save_session(&response.token, &response.user) {
                    warn!("Failed to persist session: {err:#}");
                }
                self.current.send_replace(Some(response.user.clone()));
                Ok(response)
            }
            Err(err) => {
                error!("Login failed: {err}");
                Err(err)
            }
        }
    }

    /// Clears both durable entries and broadcasts a null user.
    /// Synchronous, cannot fail.
    pub fn logout(&self) {
        self.store.clear();
        self.current.send_replace(None);
    }

    /// Synchronous read of the durable token, independent of the
    /// broadcast value.
    pub fn token(&self) -> Option<String> {
        self.store.read_token()
    }

    /// True iff a non-empty token exists. Does not guarantee a
    /// resolved user.
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Synchronous snapshot of the last broadcast value.
    pub fn current_user(&self) -> Option<AuthUser> {
        self.current.borrow().clone()
    }

    /// Subscribes to the current-user stream. All subscribers observe
    /// the same sequence of values.
    pub fn subscribe(&self) -> watch::Receiver<Option<AuthUser>> {
        self.current.subscribe()
    }

    /// Fetches the profile; on success persists and broadcasts it.
    ///
    /// # Errors
    /// Returns the boundary's error untouched, leaving prior state as is.
    pub async fn fetch_profile(&self) -> Result<AuthUser, ApiError> {
        match self.api.fetch_profile().await {
            Ok(user) => {
                self.apply_user(&user);
                Ok(user)
            }
            Err(err) => {
                error!("Profile fetch failed: {err}");
                Err(err)
            }
        }
    }

    /// Mutates the profile; on success persists and broadcasts the
    /// returned user.
    ///
    /// # Errors
    /// Returns the boundary's error untouched, leaving prior state as is.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<AuthUser, ApiError> {
        match self.api.update_profile(update).await {
            Ok(user) => {
                self.apply_user(&user);
                Ok(user)
            }
            Err(err) => {
                error!("Profile update failed: {err}");
                Err(err)
            }
        }
    }

    /// Persist-then-broadcast so storage and the broadcast value do not
    /// diverge after a successful operation.
    fn apply_user(&self, user: &AuthUser) {
        if let Err(err) = self.store.write_user(user) {
            warn!("Failed to persist user: {err:#}");
        }
        self.current.send_replace(Some(user.clone()));
    }

    /// The credential store backing this session.
    pub fn credential_store(&self) -> &Arc<CredentialStore> {
        &self.store
    }
}
