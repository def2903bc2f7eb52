// ── Generic entity store ──
//
// Synchronizes one backend collection. State is published through a
// `watch` channel; each action replaces it in a single step after the
// request resolved, so `items` and `total` never disagree.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwapOption;
use serde_json::Value;
use strum::AsRefStr;
use tokio::sync::watch;
use tracing::{debug, warn};
use url::Url;

use wedly_api::ApiClient;
use wedly_api::types::Page;

use super::list::{
    EntityList, apply_created, apply_deleted, apply_page, apply_updated, has_identity, merge,
};
use super::resource::{Creatable, Deletable, Resource, Updatable, to_json};
use crate::error::CoreError;
use crate::model::{EntityId, Keyed};
use crate::session::Session;
use crate::stream::EntityStream;

/// Sync status of a store, observable alongside its data.
#[derive(Debug, Clone, Default, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum SyncStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    /// The last fetch failed; the list still holds the previous page.
    Failed(String),
}

impl SyncStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Parameters of a list fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery<F> {
    pub page: u32,
    pub limit: u32,
    pub filter: F,
}

/// Client-side mirror of one backend collection.
pub struct EntityStore<R: Resource> {
    inner: Arc<StoreInner<R>>,
}

struct StoreInner<R: Resource> {
    client: Arc<ApiClient>,
    session: Session,
    assets: Url,
    state: watch::Sender<Arc<EntityList<R::Entity>>>,
    status: watch::Sender<SyncStatus>,
    fetch_seq: AtomicU64,
    last_query: ArcSwapOption<ListQuery<R::Filter>>,
}

impl<R: Resource> Clone for EntityStore<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Resource> EntityStore<R> {
    pub fn new(client: Arc<ApiClient>, session: Session, assets: Url) -> Self {
        let (state, _) = watch::channel(Arc::new(EntityList::default()));
        let (status, _) = watch::channel(SyncStatus::Idle);
        Self {
            inner: Arc::new(StoreInner {
                client,
                session,
                assets,
                state,
                status,
                fetch_seq: AtomicU64::new(0),
                last_query: ArcSwapOption::empty(),
            }),
        }
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> Arc<EntityList<R::Entity>> {
        self.inner.state.borrow().clone()
    }

    pub fn find(&self, id: &EntityId) -> Option<R::Entity> {
        self.inner.state.borrow().find(id).cloned()
    }

    pub fn total(&self) -> u64 {
        self.inner.state.borrow().total
    }

    pub fn status(&self) -> SyncStatus {
        self.inner.status.borrow().clone()
    }

    pub fn subscribe(&self) -> EntityStream<R::Entity> {
        EntityStream::new(self.inner.state.subscribe())
    }

    /// The query behind the current list, if any fetch succeeded.
    pub fn last_query(&self) -> Option<ListQuery<R::Filter>> {
        self.inner.last_query.load_full().map(|q| (*q).clone())
    }

    // ── Actions ──────────────────────────────────────────────────────

    /// Fetch one page and replace the list with it.
    ///
    /// When fetches overlap, only the most recently issued one may write:
    /// an older response is dropped and its call returns `Ok(())`.
    pub async fn fetch_list(
        &self,
        page: u32,
        limit: u32,
        filter: R::Filter,
    ) -> Result<(), CoreError> {
        let token = self.require_token()?;
        let seq = self.inner.fetch_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.status.send_replace(SyncStatus::Loading);

        let mut params = vec![("page", page.to_string()), ("limit", limit.to_string())];
        params.extend(R::filter_params(&filter));
        debug!(resource = R::NAME, page, limit, "fetching list");

        let result: Result<Page<R::Entity>, _> =
            self.inner.client.get(R::PATH, &token, &params).await;

        let stale = self.inner.fetch_seq.load(Ordering::SeqCst) != seq;
        match result {
            Ok(_) if stale => {
                debug!(resource = R::NAME, page, "discarding superseded page");
                Ok(())
            }
            Ok(mut fetched) => {
                for entity in &mut fetched.data {
                    R::resolve_assets(entity, &self.inner.assets);
                }
                debug!(
                    resource = R::NAME,
                    count = fetched.data.len(),
                    total = fetched.total,
                    "list replaced"
                );
                self.inner.state.send_replace(Arc::new(apply_page(fetched)));
                self.inner
                    .last_query
                    .store(Some(Arc::new(ListQuery { page, limit, filter })));
                self.inner.status.send_replace(SyncStatus::Loaded);
                Ok(())
            }
            Err(e) => {
                let err = self.reject("fetch", e);
                if !stale {
                    self.inner
                        .status
                        .send_replace(SyncStatus::Failed(err.to_string()));
                }
                Err(err)
            }
        }
    }

    fn require_token(&self) -> Result<secrecy::SecretString, CoreError> {
        self.inner.session.token().ok_or_else(|| {
            debug!(resource = R::NAME, "no session token; request not sent");
            CoreError::Unauthorized
        })
    }

    /// Log a failed request, drop the session on 401, and translate.
    fn reject(&self, action: &str, err: wedly_api::Error) -> CoreError {
        warn!(resource = R::NAME, action, error = %err, "request failed");
        if err.is_unauthorized() {
            self.inner.session.invalidate();
        }
        err.into()
    }

    fn decode(&self, record: Value) -> Result<R::Entity, CoreError> {
        let mut entity: R::Entity =
            serde_json::from_value(record).map_err(|e| CoreError::InvalidResponse {
                message: format!("{} record: {e}", R::NAME),
            })?;
        R::resolve_assets(&mut entity, &self.inner.assets);
        Ok(entity)
    }
}

impl<R: Creatable> EntityStore<R> {
    /// Create a record and insert it into the current list.
    ///
    /// The inserted entity is the sent payload overlaid with the server's
    /// response. When the response carries no id the record cannot be
    /// placed locally; the last query is re-fetched instead and `Ok(None)`
    /// is returned.
    pub async fn create(&self, payload: R::Payload) -> Result<Option<R::Entity>, CoreError> {
        let token = self.require_token()?;
        let body = R::encode_create(&payload)?;
        let sent = to_json(&payload)?;

        debug!(resource = R::NAME, "creating record");
        let response: Value = self
            .inner
            .client
            .post(R::PATH, &token, body)
            .await
            .map_err(|e| self.reject("create", e))?;

        let record = merge(&sent, &response, &Value::Null, R::LOCAL_FIELDS);
        if !has_identity(&record) {
            self.refresh_after_create(&payload).await;
            return Ok(None);
        }

        let entity = self.decode(record)?;
        self.inner.state.send_modify(|list| {
            apply_created(Arc::make_mut(list), entity.clone(), R::INSERT);
        });
        debug!(resource = R::NAME, id = %entity.id(), "record created");
        Ok(Some(entity))
    }

    async fn refresh_after_create(&self, payload: &R::Payload) {
        let Some(query) = R::refresh_query(payload, self.last_query()) else {
            debug!(resource = R::NAME, "created without a record and no list to refresh");
            return;
        };
        debug!(resource = R::NAME, "created without a record; re-fetching list");
        if let Err(e) = self
            .fetch_list(query.page, query.limit, query.filter)
            .await
        {
            warn!(resource = R::NAME, error = %e, "refresh after create failed");
        }
    }
}

impl<R: Updatable> EntityStore<R> {
    /// Update a record and replace it in place with
    /// `merge(old, server, patch)`.
    ///
    /// Returns `Ok(None)` when the id is not in the current list; the
    /// request is still sent and the list is left unchanged.
    pub async fn update(
        &self,
        id: &EntityId,
        patch: R::Patch,
    ) -> Result<Option<R::Entity>, CoreError> {
        let token = self.require_token()?;
        let body = R::encode_update(&patch)?;
        let sent = to_json(&patch)?;

        debug!(resource = R::NAME, %id, "updating record");
        let response: Value = self
            .inner
            .client
            .put(&item_path::<R>(id), &token, body)
            .await
            .map_err(|e| self.reject("update", e))?;

        let Some(old) = self.find(id) else {
            debug!(resource = R::NAME, %id, "updated record is not in the current list");
            return Ok(None);
        };

        let record = merge(&to_json(&old)?, &response, &sent, R::LOCAL_FIELDS);
        let entity = self.decode(record)?;
        if entity.id() != id {
            return Err(CoreError::InvalidResponse {
                message: format!("update of {id} answered for {}", entity.id()),
            });
        }

        let replaced = self
            .inner
            .state
            .send_if_modified(|list| apply_updated(Arc::make_mut(list), entity.clone()));
        Ok(replaced.then_some(entity))
    }
}

impl<R: Deletable> EntityStore<R> {
    /// Delete a record and drop it from the current list.
    pub async fn delete(&self, id: &EntityId) -> Result<(), CoreError> {
        let token = self.require_token()?;

        debug!(resource = R::NAME, %id, "deleting record");
        self.inner
            .client
            .delete(&item_path::<R>(id), &token)
            .await
            .map_err(|e| self.reject("delete", e))?;

        self.inner.state.send_if_modified(|list| {
            if list.find(id).is_none() {
                return false;
            }
            apply_deleted(Arc::make_mut(list), id)
        });
        Ok(())
    }
}

fn item_path<R: Resource>(id: &EntityId) -> String {
    format!("{}/{id}", R::PATH)
}

impl<R: Resource> std::fmt::Debug for EntityStore<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let list = self.inner.state.borrow();
        f.debug_struct("EntityStore")
            .field("resource", &R::NAME)
            .field("items", &list.items.len())
            .field("total", &list.total)
            .finish_non_exhaustive()
    }
}
