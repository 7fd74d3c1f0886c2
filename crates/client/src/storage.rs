//! Session-scoped key/value storage for the bearer token and user snapshot.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{ClientError, ClientResult};

/// Storage key of the bearer token
pub const TOKEN_KEY: &str = "snappy_token";

/// Storage key of the serialized user snapshot
pub const USER_KEY: &str = "snappy_usuario";

/// Where a session keeps its credentials between operations.
///
/// Implementations decide the scope (process, browser tab, keychain); the
/// session only needs string values under fixed keys.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> ClientResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> ClientResult<()>;
    fn remove(&self, key: &str) -> ClientResult<()>;
}

/// In-memory storage that lives as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> ClientResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| ClientError::storage("session storage lock poisoned"))
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> ClientResult<Option<String>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        self.entries()?.remove(key);
        Ok(())
    }
}
