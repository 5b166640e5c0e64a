use std::fmt;
use std::sync::Arc;

use aula_core::SessionToken;
use aula_store::{KeyValueStore, MemoryStore};

/// Key of the token inside tab-scoped storage.
pub const SESSION_STORAGE_KEY: &str = "lti_session";

/// The single session-token slot of a tab.
///
/// Cloning shares the slot. Without backing storage (non-browser execution)
/// `get` is always `None` and `set` does nothing.
#[derive(Clone)]
pub struct SessionStore {
    storage: Option<Arc<dyn KeyValueStore>>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            storage: Some(storage),
        }
    }

    /// Fresh tab-scoped slot backed by memory.
    pub fn ephemeral() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Slot for an environment with no storage at all.
    pub fn unavailable() -> Self {
        Self { storage: None }
    }

    pub fn is_available(&self) -> bool {
        self.storage.is_some()
    }

    pub fn get(&self) -> Option<SessionToken> {
        self.storage.as_ref()?.get(SESSION_STORAGE_KEY)
    }

    pub fn set(&self, token: &str) {
        let Some(storage) = &self.storage else {
            return;
        };
        if let Err(e) = storage.set(SESSION_STORAGE_KEY, token) {
            tracing::warn!(error = %e, "failed to store session token");
        }
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("available", &self.is_available())
            .field("has_token", &self.get().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get() {
        let store = SessionStore::ephemeral();
        assert!(store.get().is_none());
        store.set("sess-1");
        assert_eq!(store.get().as_deref(), Some("sess-1"));
    }

    #[test]
    fn clones_share_the_slot() {
        let store = SessionStore::ephemeral();
        let other = store.clone();
        store.set("sess-1");
        assert_eq!(other.get().as_deref(), Some("sess-1"));
    }

    #[test]
    fn new_tab_starts_empty() {
        let tab_a = SessionStore::ephemeral();
        tab_a.set("sess-1");
        let tab_b = SessionStore::ephemeral();
        assert!(tab_b.get().is_none());
    }

    #[test]
    fn unavailable_storage_reads_absent() {
        let store = SessionStore::unavailable();
        store.set("sess-1");
        assert!(store.get().is_none());
        assert!(!store.is_available());
    }

    #[test]
    fn debug_hides_token() {
        let store = SessionStore::ephemeral();
        store.set("secret-token");
        let shown = format!("{store:?}");
        assert!(!shown.contains("secret-token"));
        assert!(shown.contains("has_token: true"));
    }
}
