use std::collections::HashMap;

use parking_lot::RwLock;

use crate::types::Identity;

/// Key holding the serialized [`Identity`].
pub const USER_KEY: &str = "user";
/// Key holding the bearer token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Tab-scoped string key/value storage (the browser's `sessionStorage`).
///
/// Survives a page reload within the same tab, never a tab close.
pub trait SessionStore: Send + Sync + 'static {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
    fn remove(&self, key: &str);
}

/// In-process [`SessionStore`]; lives as long as the application instance.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        self.entries.write().insert(key.to_owned(), value);
    }

    fn remove(&self, key: &str) {
        self.entries.write().remove(key);
    }
}

/// Read the stored identity.
///
/// `Ok(None)` when nothing is stored; `Err` when the stored value does not
/// parse, leaving the caller to decide how to discard it.
pub fn read_identity(store: &dyn SessionStore) -> Result<Option<Identity>, serde_json::Error> {
    store
        .get(USER_KEY)
        .map(|raw| serde_json::from_str(&raw))
        .transpose()
}

/// Persist only the identity (an already signed-in provider account).
pub fn write_identity(store: &dyn SessionStore, identity: &Identity) -> Result<(), serde_json::Error> {
    let encoded = serde_json::to_string(identity)?;
    store.set(USER_KEY, encoded);
    Ok(())
}

/// Persist identity and token together. Nothing is written if encoding fails.
pub fn write_record(
    store: &dyn SessionStore,
    identity: &Identity,
    access_token: &str,
) -> Result<(), serde_json::Error> {
    let encoded = serde_json::to_string(identity)?;
    store.set(USER_KEY, encoded);
    store.set(ACCESS_TOKEN_KEY, access_token.to_owned());
    Ok(())
}

/// Remove identity and token together.
pub fn clear_record(store: &dyn SessionStore) {
    store.remove(ACCESS_TOKEN_KEY);
    store.remove(USER_KEY);
}

/// Token to attach as `Authorization: Bearer`, if any.
pub fn bearer_token(store: &dyn SessionStore) -> Option<String> {
    store.get(ACCESS_TOKEN_KEY).filter(|t| !t.is_empty())
}
