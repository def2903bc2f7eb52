// ── Session state ──
//
// Holds the bearer token and the profile it belongs to. Both live in one
// snapshot so they are always replaced together: there is never a profile
// without a token.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::watch;
use tracing::{debug, info, warn};
use url::Url;

use wedly_api::ApiClient;

use crate::error::CoreError;
use crate::model::User;
use crate::resources::resolve_asset;
use crate::token::TokenStore;

/// Point-in-time view of the session.
#[derive(Debug, Default)]
pub struct SessionState {
    token: Option<SecretString>,
    active_user: Option<User>,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Profile of the logged-in account, once it has been fetched.
    pub fn active_user(&self) -> Option<&User> {
        self.active_user.as_ref()
    }
}

/// Cheaply cloneable handle to the session shared by every store.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    client: Arc<ApiClient>,
    tokens: Arc<dyn TokenStore>,
    assets: Url,
    state: watch::Sender<Arc<SessionState>>,
}

impl Session {
    pub fn new(client: Arc<ApiClient>, tokens: Arc<dyn TokenStore>, assets: Url) -> Self {
        let (state, _) = watch::channel(Arc::new(SessionState::default()));
        Self {
            inner: Arc::new(SessionInner {
                client,
                tokens,
                assets,
                state,
            }),
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn snapshot(&self) -> Arc<SessionState> {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<SessionState>> {
        self.inner.state.subscribe()
    }

    /// The current token. Stores call this per request and never keep it.
    pub fn token(&self) -> Option<SecretString> {
        self.inner
            .state
            .borrow()
            .token
            .as_ref()
            .map(|t| SecretString::from(t.expose_secret().to_owned()))
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    pub fn active_user(&self) -> Option<User> {
        self.inner.state.borrow().active_user.clone()
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Exchange credentials for a token, persist it, and load the profile.
    ///
    /// Any failure leaves the session (and the persisted token) cleared.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<User, CoreError> {
        info!(email, "logging in");

        let token = match self.inner.client.login(email, password).await {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "login failed");
                self.logout();
                return Err(e.into());
            }
        };

        if let Err(e) = self.inner.tokens.save(&token) {
            warn!(error = %e, "could not persist session token");
            self.logout();
            return Err(e);
        }

        self.inner.state.send_replace(Arc::new(SessionState {
            token: Some(token),
            active_user: None,
        }));

        match self.fetch_profile().await? {
            Some(user) => {
                info!(user = %user.email, role = %user.role, "logged in");
                Ok(user)
            }
            // Logged out while the profile request was in flight.
            None => Err(CoreError::Unauthorized),
        }
    }

    /// Load the profile for the held token. Without a token this does
    /// nothing and returns `Ok(None)`. A failed fetch clears the session.
    pub async fn fetch_profile(&self) -> Result<Option<User>, CoreError> {
        let Some(token) = self.token() else {
            debug!("no session token; skipping profile fetch");
            return Ok(None);
        };

        match self.inner.client.me(&token).await {
            Ok(mut user) => {
                if let Some(profile) = user.profile.as_mut() {
                    *profile = resolve_asset(profile, &self.inner.assets);
                }
                let applied = self.inner.state.send_if_modified(|state| {
                    if !holds(state, &token) {
                        return false;
                    }
                    *state = Arc::new(SessionState {
                        token: Some(SecretString::from(token.expose_secret().to_owned())),
                        active_user: Some(user.clone()),
                    });
                    true
                });
                if !applied {
                    debug!("session changed during profile fetch; result dropped");
                }
                Ok(applied.then_some(user))
            }
            Err(e) => {
                let current = holds(&self.inner.state.borrow(), &token);
                if current {
                    warn!(error = %e, "profile fetch failed; clearing session");
                    self.logout();
                } else {
                    debug!(error = %e, "profile fetch for a replaced session failed");
                }
                Err(e.into())
            }
        }
    }

    /// Drop the token and profile and remove the persisted token.
    pub fn logout(&self) {
        self.inner
            .state
            .send_replace(Arc::new(SessionState::default()));
        if let Err(e) = self.inner.tokens.clear() {
            warn!(error = %e, "could not remove persisted session token");
        }
        info!("session cleared");
    }

    /// Called by stores when the backend rejects the token.
    pub fn invalidate(&self) {
        if self.is_authenticated() {
            warn!("backend rejected the session token");
            self.logout();
        }
    }

    /// Rehydrate the session from the token store and validate it.
    ///
    /// Returns the profile when a stored token is still accepted.
    pub async fn initialize(&self) -> Result<Option<User>, CoreError> {
        let stored = match self.inner.tokens.load() {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "could not read persisted session token");
                None
            }
        };

        let Some(token) = stored else {
            debug!("no persisted session");
            return Ok(None);
        };

        debug!("rehydrating persisted session");
        self.inner.state.send_replace(Arc::new(SessionState {
            token: Some(token),
            active_user: None,
        }));
        self.fetch_profile().await
    }
}

/// Whether `state` still carries `token`.
fn holds(state: &SessionState, token: &SecretString) -> bool {
    state
        .token
        .as_ref()
        .is_some_and(|held| held.expose_secret() == token.expose_secret())
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}
