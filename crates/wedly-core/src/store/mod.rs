// ── Entity stores ──
//
// One generic store, parameterized per backend collection.

mod entity_store;
mod list;
mod resource;

pub use entity_store::{EntityStore, ListQuery, SyncStatus};
pub use list::{
    EntityList, InsertPosition, apply_created, apply_deleted, apply_page, apply_updated, merge,
};
pub use resource::{Creatable, Deletable, Resource, Updatable};

pub(crate) use resource::to_json;
