//! Authentication state container.
//!
//! [`Session`] is the only writer of the persisted token. User and token live
//! in one [`AuthState`] value and every change replaces both in a single
//! update, so `is_authenticated` can never see one without the other.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;

use crate::domain::ApiError;
use crate::domain::validation::require;
use crate::infrastructure::http::{ApiClient, SessionToken};
use crate::infrastructure::token_store::TokenStore;
use crate::models::user::{AuthResponse, Credentials, ProfileUpdate, Registration, Role, User};
use crate::services::auth_service;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub token: Option<String>,
    /// Session restore has settled (successfully or not).
    pub checked: bool,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.token.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.is_authenticated() && self.user.as_ref().is_some_and(|u| u.role == Role::Admin)
    }
}

/// Token persistence plus the observable in-memory session.
pub struct Session {
    store: Arc<dyn TokenStore>,
    state: watch::Sender<AuthState>,
}

impl Session {
    /// Loads whatever token the store holds; the user stays unset until
    /// [`AuthStore::restore_session`] confirms it.
    pub fn open(store: Arc<dyn TokenStore>) -> Arc<Self> {
        let token = match store.load() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("Failed to read stored session token: {}", e);
                None
            }
        };
        let checked = token.is_none();
        let (state, _) = watch::channel(AuthState {
            user: None,
            token,
            checked,
        });
        Arc::new(Self { store, state })
    }

    pub fn snapshot(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    fn establish(&self, user: User, token: String) {
        if let Err(e) = self.store.save(&token) {
            tracing::error!("Failed to persist session token: {}", e);
        }
        self.state.send_modify(|s| {
            s.user = Some(user);
            s.token = Some(token);
            s.checked = true;
        });
    }

    /// Applies a profile reply only to the session the request was sent
    /// under. Returns `false` when that session has ended or been replaced.
    fn set_user(&self, user: User, sent_with: &str) -> bool {
        self.state.send_if_modified(|s| {
            if s.token.as_deref() != Some(sent_with) {
                return false;
            }
            s.user = Some(user);
            true
        })
    }

    fn mark_checked(&self) {
        self.state.send_if_modified(|s| !std::mem::replace(&mut s.checked, true));
    }

    fn end(&self) {
        if let Err(e) = self.store.clear() {
            tracing::error!("Failed to clear stored session token: {}", e);
        }
        self.state.send_modify(|s| {
            s.user = None;
            s.token = None;
            s.checked = true;
        });
    }
}

impl SessionToken for Session {
    fn current(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    fn invalidate(&self, token: &str) -> bool {
        let mut ended = false;
        self.state.send_if_modified(|s| {
            if s.token.as_deref() != Some(token) {
                return false;
            }
            s.user = None;
            s.token = None;
            s.checked = true;
            ended = true;
            true
        });
        if ended && let Err(e) = self.store.clear() {
            tracing::error!("Failed to clear stored session token: {}", e);
        }
        ended
    }
}

/// Login, registration, logout, profile and session restore.
#[derive(Clone)]
pub struct AuthStore {
    api: ApiClient,
    session: Arc<Session>,
    restore_started: Arc<AtomicBool>,
}

impl AuthStore {
    pub fn new(api: ApiClient, session: Arc<Session>) -> Self {
        Self {
            api,
            session,
            restore_started: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn snapshot(&self) -> AuthState {
        self.session.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.session.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.snapshot().is_authenticated()
    }

    pub fn current_user(&self) -> Option<User> {
        self.session.snapshot().user
    }

    /// Confirms a stored token by fetching the profile. Runs at most once per
    /// store; later calls return immediately.
    pub async fn restore_session(&self) {
        if self.restore_started.swap(true, Ordering::SeqCst) {
            return;
        }
        let Some(token) = self.session.current() else {
            self.session.mark_checked();
            return;
        };

        match auth_service::get_profile(&self.api).await {
            Ok(user) => {
                tracing::info!("Session restored for {}", user.email);
                if !self.session.set_user(user, &token) {
                    tracing::debug!("Session changed while restoring, profile reply dropped");
                }
                self.session.mark_checked();
            }
            Err(e) => {
                tracing::info!("Stored session is no longer valid: {}", e);
                // A 401 has already ended it; anything else ends it here
                self.session.invalidate(&token);
                self.session.mark_checked();
            }
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        require("Email", email)?;
        require("Password", password)?;

        let credentials = Credentials {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let response = auth_service::login(&self.api, &credentials).await?;
        Ok(self.accept(response))
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User, ApiError> {
        require("Name", name)?;
        require("Email", email)?;
        require("Password", password)?;

        let registration = Registration {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let response = auth_service::register(&self.api, &registration).await?;
        Ok(self.accept(response))
    }

    /// Forgets the session locally; the backend is not told.
    pub fn logout(&self) {
        tracing::info!("Logging out");
        self.session.end();
    }

    /// Sends a partial update and replaces the in-memory user. The token is
    /// kept as is.
    pub async fn update_profile(&self, fields: &ProfileUpdate) -> Result<User, ApiError> {
        if fields.is_empty() {
            return Err(crate::domain::ValidationError::Invalid(
                "Nothing to update".to_string(),
            )
            .into());
        }
        let sent_with = self.session.current();
        let user = auth_service::update_profile(&self.api, fields).await?;
        match sent_with {
            Some(token) if self.session.set_user(user.clone(), &token) => {}
            _ => tracing::debug!("Session changed during profile update, local user kept"),
        }
        Ok(user)
    }

    fn accept(&self, response: AuthResponse) -> User {
        tracing::info!("Signed in as {} ({})", response.user.email, response.user.role.as_str());
        let user = response.user;
        self.session.establish(user.clone(), response.token);
        user
    }
}
