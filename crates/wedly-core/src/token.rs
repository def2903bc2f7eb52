// ── Session token persistence ──
//
// The session token outlives the process. Where it is kept (a file, the
// OS keyring, nowhere) is decided by the embedding application through
// the `TokenStore` trait.

use arc_swap::ArcSwapOption;
use secrecy::{ExposeSecret, SecretString};

use crate::error::CoreError;

/// Durable storage for the session token.
pub trait TokenStore: Send + Sync {
    /// The persisted token, or `None` when nothing is stored.
    fn load(&self) -> Result<Option<SecretString>, CoreError>;

    fn save(&self, token: &SecretString) -> Result<(), CoreError>;

    /// Remove the persisted token. Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), CoreError>;
}

/// Process-local token store. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryTokenStore {
    slot: ArcSwapOption<String>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with `token`, as if a previous run had saved it.
    pub fn with_token(token: &str) -> Self {
        let store = Self::new();
        store.slot.store(Some(token.to_owned().into()));
        store
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<SecretString>, CoreError> {
        Ok(self
            .slot
            .load_full()
            .map(|token| SecretString::from(token.as_str().to_owned())))
    }

    fn save(&self, token: &SecretString) -> Result<(), CoreError> {
        self.slot
            .store(Some(token.expose_secret().to_owned().into()));
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        self.slot.store(None);
        Ok(())
    }
}

impl std::fmt::Debug for MemoryTokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryTokenStore")
            .field("holds_token", &self.slot.load().is_some())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn save_load_clear() {
        let store = MemoryTokenStore::new();
        assert!(store.load().unwrap().is_none());

        store.save(&SecretString::from("jwt".to_owned())).unwrap();
        assert_eq!(store.load().unwrap().unwrap().expose_secret(), "jwt");

        store.clear().unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn debug_output_hides_the_token() {
        let store = MemoryTokenStore::with_token("very-secret");
        let rendered = format!("{store:?}");
        assert!(!rendered.contains("very-secret"));
        assert!(rendered.contains("holds_token: true"));
    }
}
