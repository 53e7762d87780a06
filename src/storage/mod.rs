use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

pub const TOKEN_KEY: &str = "token";
pub const ROLE_KEY: &str = "role";

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("failed to write `{key}` to storage")]
    Write { key: String },
}

/// String key-value backend for persisted client state.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Browser `window.localStorage`, looked up on every call.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or(StorageError::Unavailable)
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::storage()?
            .get_item(key)
            .map_err(|_| StorageError::Unavailable)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|_| StorageError::Write {
                key: key.to_string(),
            })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        Self::storage()?
            .remove_item(key)
            .map_err(|_| StorageError::Write {
                key: key.to_string(),
            })
    }
}

/// In-process store. Used off the browser and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

/// A persisted `(token, role)` pair. Either both halves are present or neither is.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Credential {
    pair: Option<(String, String)>,
}

impl Credential {
    pub fn new(token: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            pair: Some((token.into(), role.into())),
        }
    }

    pub fn absent() -> Self {
        Self::default()
    }

    pub fn token(&self) -> Option<&str> {
        self.pair.as_ref().map(|(t, _)| t.as_str())
    }

    pub fn role(&self) -> Option<&str> {
        self.pair.as_ref().map(|(_, r)| r.as_str())
    }

    pub fn is_present(&self) -> bool {
        self.pair.is_some()
    }

    pub fn into_parts(self) -> Option<(String, String)> {
        self.pair
    }
}

/// Owns the persisted credential entries.
///
/// Writes go role-first / token-last and clears go token-first, so the token
/// entry is the commit marker: a reader never finds a token without its role.
#[derive(Clone)]
pub struct CredentialStore {
    backend: Arc<dyn KeyValueStore>,
}

impl CredentialStore {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    pub fn browser() -> Self {
        Self::new(LocalStorage)
    }

    pub fn save(&self, token: &str, role: &str) -> Result<(), StorageError> {
        self.backend.set(ROLE_KEY, role)?;
        if let Err(e) = self.backend.set(TOKEN_KEY, token) {
            let _ = self.backend.remove(ROLE_KEY);
            return Err(e);
        }
        Ok(())
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.backend.remove(TOKEN_KEY)?;
        self.backend.remove(ROLE_KEY)
    }

    /// Never fails: an unreadable store or a half-written pair reads as absent.
    pub fn read(&self) -> Credential {
        let token = self.backend.get(TOKEN_KEY).ok().flatten();
        let role = self.backend.get(ROLE_KEY).ok().flatten();

        match (token, role) {
            (Some(token), Some(role)) if !token.is_empty() => Credential::new(token, role),
            _ => Credential::absent(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Backend whose every operation fails, like a browser with storage disabled.
    pub(crate) struct UnavailableStore;

    impl KeyValueStore for UnavailableStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
    }

    /// Accepts everything except writes to one key.
    struct RejectKey {
        inner: MemoryStore,
        rejected: &'static str,
    }

    impl KeyValueStore for RejectKey {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if key == self.rejected {
                return Err(StorageError::Write {
                    key: key.to_string(),
                });
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn test_save_then_read_returns_pair() {
        let store = CredentialStore::new(MemoryStore::new());
        store.save("abc123", "ADMIN").expect("save");

        let c = store.read();
        assert_eq!(c.token(), Some("abc123"));
        assert_eq!(c.role(), Some("ADMIN"));
    }

    #[test]
    fn test_save_overwrites_previous_pair() {
        let store = CredentialStore::new(MemoryStore::new());
        store.save("t1", "USER").expect("save");
        store.save("t2", "ADMIN").expect("save");

        assert_eq!(store.read(), Credential::new("t2", "ADMIN"));
    }

    #[test]
    fn test_clear_removes_both_entries() {
        let backend = Arc::new(MemoryStore::new());
        let store = CredentialStore {
            backend: backend.clone(),
        };
        store.save("t", "USER").expect("save");
        store.clear().expect("clear");

        assert_eq!(store.read(), Credential::absent());
        assert_eq!(backend.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(backend.get(ROLE_KEY).unwrap(), None);
    }

    #[test]
    fn test_half_written_pair_reads_as_absent() {
        let backend = MemoryStore::new();
        backend.set(TOKEN_KEY, "orphan").unwrap();
        let store = CredentialStore::new(backend);
        assert!(!store.read().is_present());

        let backend = MemoryStore::new();
        backend.set(ROLE_KEY, "ADMIN").unwrap();
        let store = CredentialStore::new(backend);
        assert!(!store.read().is_present());
    }

    #[test]
    fn test_empty_token_reads_as_absent() {
        let backend = MemoryStore::new();
        backend.set(TOKEN_KEY, "").unwrap();
        backend.set(ROLE_KEY, "USER").unwrap();
        assert!(!CredentialStore::new(backend).read().is_present());
    }

    #[test]
    fn test_unavailable_storage_fails_open() {
        let store = CredentialStore::new(UnavailableStore);
        assert_eq!(store.read(), Credential::absent());
        assert_eq!(store.save("t", "USER"), Err(StorageError::Unavailable));
    }

    #[test]
    fn test_failed_token_write_rolls_back_role() {
        let store = CredentialStore::new(RejectKey {
            inner: MemoryStore::new(),
            rejected: TOKEN_KEY,
        });

        let err = store.save("t", "ADMIN").unwrap_err();
        assert_eq!(
            err,
            StorageError::Write {
                key: TOKEN_KEY.to_string()
            }
        );
        assert_eq!(store.backend.get(ROLE_KEY).unwrap(), None);
        assert!(!store.read().is_present());
    }
}
