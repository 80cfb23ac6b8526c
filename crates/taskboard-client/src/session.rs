//! Session Store
//!
//! Owns the authenticated identity. The store is an explicit object handed
//! to whoever needs it (the UI provides it through context); there is no
//! global session state.
//!
//! ```text
//! Unknown ──initialize──▶ Loading ──▶ Authenticated(identity)
//!                                 └─▶ Anonymous
//! Authenticated ──logout / renewal failure──▶ Anonymous
//! ```

use crate::api::AuthApi;
use crate::error::ApiResult;
use crate::http::Transport;
use crate::models::{Identity, LoginRequest, RegisterRequest};
use crate::state::StateCell;
use crate::storage::IdentityStorage;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionStatus {
    #[default]
    Unknown,
    Loading,
    Authenticated(Identity),
    Anonymous,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionState {
    pub status: SessionStatus,
    initialized: bool,
    /// Bumped by every login and every session end. A restore only lands
    /// if no such change happened while its refresh was in flight.
    epoch: u64,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self.status, SessionStatus::Authenticated(_))
    }

    /// True until the first initialization has settled.
    pub fn is_resolving(&self) -> bool {
        matches!(self.status, SessionStatus::Unknown | SessionStatus::Loading)
    }

    pub fn identity(&self) -> Option<&Identity> {
        match &self.status {
            SessionStatus::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }
}

/// Where the view should go after a session operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Dashboard,
    Login,
}

/// Drop the local session: forget the marker and become anonymous.
///
/// Shared by logout and by the HTTP client's expiry handler.
pub fn end_session<C, S>(state: &C, storage: &S)
where
    C: StateCell<SessionState>,
    S: IdentityStorage,
{
    storage.clear();
    state.update(|s| {
        s.epoch += 1;
        s.status = SessionStatus::Anonymous;
    });
}

pub struct SessionStore<C, S, T> {
    auth: AuthApi<T>,
    state: C,
    storage: S,
}

impl<C: Clone, S: Clone, T> Clone for SessionStore<C, S, T> {
    fn clone(&self) -> Self {
        Self {
            auth: self.auth.clone(),
            state: self.state.clone(),
            storage: self.storage.clone(),
        }
    }
}

impl<C, S, T> SessionStore<C, S, T>
where
    C: StateCell<SessionState>,
    S: IdentityStorage,
    T: Transport,
{
    pub fn new(auth: AuthApi<T>, state: C, storage: S) -> Self {
        Self { auth, state, storage }
    }

    pub fn state(&self) -> &C {
        &self.state
    }

    /// Restore the session from the persisted marker. Runs once per store;
    /// later calls return immediately.
    pub async fn initialize(&self) {
        let mut started = None;
        self.state.update(|s| {
            if !s.initialized {
                s.initialized = true;
                s.status = SessionStatus::Loading;
                started = Some(s.epoch);
            }
        });
        let Some(epoch) = started else {
            return;
        };

        let Some(identity) = self.storage.load() else {
            tracing::debug!("no identity marker, starting anonymous");
            self.state.update(|s| s.status = SessionStatus::Anonymous);
            return;
        };

        let result = self.auth.refresh().await;
        if self.state.read(|s| s.epoch) != epoch {
            tracing::debug!("session changed during restore, dropping refresh outcome");
            return;
        }
        match result {
            Ok(()) => {
                tracing::info!(email = %identity.email, "session restored");
                self.state.update(|s| s.status = SessionStatus::Authenticated(identity));
            }
            Err(err) => {
                tracing::info!(error = %err, "stored session is no longer valid");
                end_session(&self.state, &self.storage);
            }
        }
    }

    pub async fn login(&self, credentials: &LoginRequest) -> ApiResult<Navigation> {
        self.auth.login(credentials).await?;

        let identity = Identity {
            email: credentials.email.clone(),
        };
        if let Err(err) = self.storage.save(&identity) {
            tracing::warn!(error = %err, "identity marker not persisted, session will not survive a reload");
        }
        tracing::info!(email = %identity.email, "logged in");
        self.state.update(|s| {
            s.epoch += 1;
            s.status = SessionStatus::Authenticated(identity);
        });
        Ok(Navigation::Dashboard)
    }

    pub async fn register(&self, details: &RegisterRequest) -> ApiResult<Navigation> {
        let response = self.auth.register(details).await?;
        tracing::info!(email = %details.email, message = %response.message, "registered");
        Ok(Navigation::Login)
    }

    /// Best-effort: a failed backend logout is logged, the local session
    /// is cleared regardless.
    pub async fn logout(&self) -> Navigation {
        if let Err(err) = self.auth.logout().await {
            tracing::warn!(error = %err, "backend logout failed, clearing local session anyway");
        }
        end_session(&self.state, &self.storage);
        Navigation::Login
    }
}
