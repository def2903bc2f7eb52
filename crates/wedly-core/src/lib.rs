// wedly-core: Session and entity synchronization between wedly-api and consumers.

pub mod config;
pub mod console;
pub mod error;
pub mod model;
pub mod resources;
pub mod session;
pub mod store;
pub mod stream;
pub mod token;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ConsoleConfig, DEFAULT_PAGE_LIMIT, TlsVerification};
pub use console::Console;
pub use error::CoreError;
pub use model::requests::*;
pub use resources::{GuestFilter, Guests, PublicTemplates, UserTemplateFilter, UserTemplates, Users};
pub use session::{Session, SessionState};
pub use store::{EntityList, EntityStore, InsertPosition, ListQuery, SyncStatus};
pub use stream::EntityStream;
pub use token::{MemoryTokenStore, TokenStore};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    EntityId, Guest, Keyed, MessageTemplate, Page, PublicTemplate, Role, Upload, User,
    UserTemplate,
};
