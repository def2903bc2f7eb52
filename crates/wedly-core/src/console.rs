// ── Console ──
//
// Entry point for consumers: one session plus a store per collection,
// all sharing a single HTTP client.

use std::sync::Arc;

use tracing::debug;

use wedly_api::ApiClient;

use crate::config::ConsoleConfig;
use crate::error::CoreError;
use crate::model::User;
use crate::resources::{Guests, PublicTemplates, UserTemplates, Users};
use crate::session::Session;
use crate::store::EntityStore;
use crate::token::TokenStore;

/// Cheaply cloneable via `Arc<ConsoleInner>`.
#[derive(Clone)]
pub struct Console {
    inner: Arc<ConsoleInner>,
}

struct ConsoleInner {
    config: ConsoleConfig,
    session: Session,
    users: EntityStore<Users>,
    templates: EntityStore<PublicTemplates>,
    user_templates: EntityStore<UserTemplates>,
    guests: EntityStore<Guests>,
}

impl Console {
    /// Build the HTTP client and wire up the session and stores. Does not
    /// touch the network; call [`initialize()`](Self::initialize) to
    /// rehydrate a persisted session.
    pub fn new(config: ConsoleConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, CoreError> {
        let client = ApiClient::new(&config.api_url, &config.transport())?;
        Ok(Self::with_client(config, Arc::new(client), tokens))
    }

    /// Wire up a console around an existing client.
    pub fn with_client(
        config: ConsoleConfig,
        client: Arc<ApiClient>,
        tokens: Arc<dyn TokenStore>,
    ) -> Self {
        let assets = config.asset_base();
        debug!(api = %config.api_url, %assets, "building console");

        let session = Session::new(Arc::clone(&client), tokens, assets.clone());
        let users = EntityStore::new(Arc::clone(&client), session.clone(), assets.clone());
        let templates = EntityStore::new(Arc::clone(&client), session.clone(), assets.clone());
        let user_templates =
            EntityStore::new(Arc::clone(&client), session.clone(), assets.clone());
        let guests = EntityStore::new(client, session.clone(), assets);

        Self {
            inner: Arc::new(ConsoleInner {
                config,
                session,
                users,
                templates,
                user_templates,
                guests,
            }),
        }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.inner.config
    }

    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    pub fn users(&self) -> &EntityStore<Users> {
        &self.inner.users
    }

    pub fn templates(&self) -> &EntityStore<PublicTemplates> {
        &self.inner.templates
    }

    pub fn user_templates(&self) -> &EntityStore<UserTemplates> {
        &self.inner.user_templates
    }

    pub fn guests(&self) -> &EntityStore<Guests> {
        &self.inner.guests
    }

    /// Rehydrate the persisted session, if any.
    pub async fn initialize(&self) -> Result<Option<User>, CoreError> {
        self.inner.session.initialize().await
    }
}
