// ── Domain model ──
//
// Entities are the wire records from wedly-api; the core layer adds
// identity lookup and the typed payloads for write operations.

pub mod requests;

pub use wedly_api::types::{
    EntityId, Guest, MessageTemplate, Page, PublicTemplate, Role, User, UserTemplate,
};
pub use wedly_api::Upload;

/// Records addressable by a backend-issued id.
pub trait Keyed {
    fn id(&self) -> &EntityId;
}

macro_rules! impl_keyed {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Keyed for $ty {
                fn id(&self) -> &EntityId {
                    &self.id
                }
            }
        )*
    };
}

impl_keyed!(User, PublicTemplate, UserTemplate, Guest);
