// ── Resource descriptors ──
//
// A `Resource` tells the generic store where a collection lives and how
// its records look. Write operations are opt-in through the capability
// traits, so a read-only resource has no `create` to call.

use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use wedly_api::RequestBody;

use super::entity_store::ListQuery;
use super::list::InsertPosition;
use crate::error::CoreError;
use crate::model::Keyed;

pub trait Resource: Send + Sync + 'static {
    type Entity: Keyed + Clone + Serialize + DeserializeOwned + Send + Sync + 'static;

    /// List filters beyond `page` / `limit`.
    type Filter: Clone + Default + Send + Sync + 'static;

    /// Collection path relative to the API root, e.g. `private/guests`.
    const PATH: &'static str;

    /// Human-readable name used in logs.
    const NAME: &'static str;

    /// Fields that are owned by the client: on update they come from the
    /// patch (or the previous record), never from the server echo.
    const LOCAL_FIELDS: &'static [&'static str] = &[];

    fn filter_params(filter: &Self::Filter) -> Vec<(&'static str, String)>;

    /// Rewrite relative asset paths against `base`.
    fn resolve_assets(_entity: &mut Self::Entity, _base: &Url) {}
}

pub trait Creatable: Resource {
    type Payload: Serialize + Send + Sync;

    const INSERT: InsertPosition;

    fn encode_create(payload: &Self::Payload) -> Result<RequestBody, CoreError>;

    /// Query re-run after a create that answered without a record.
    /// Defaults to the last successful fetch.
    fn refresh_query(
        _payload: &Self::Payload,
        last: Option<ListQuery<Self::Filter>>,
    ) -> Option<ListQuery<Self::Filter>> {
        last
    }
}

pub trait Updatable: Resource {
    type Patch: Serialize + Send + Sync;

    fn encode_update(patch: &Self::Patch) -> Result<RequestBody, CoreError>;
}

pub trait Deletable: Resource {}

/// Serialize a payload for a JSON body or for the local merge.
pub(crate) fn to_json<T: Serialize>(value: &T) -> Result<serde_json::Value, CoreError> {
    serde_json::to_value(value).map_err(|e| CoreError::Internal(format!("encoding failed: {e}")))
}
