//! In-memory secure store for tests and headless environments.
//!
//! Keeps secrets in a process-local map. Nothing is encrypted or persisted
//! across restarts, so this is only appropriate where the OS keychain is
//! unavailable (CI, integration tests).

use async_trait::async_trait;
use bridge_traits::{error::Result, storage::SecureStore};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Map-backed `SecureStore` implementation.
#[derive(Clone, Default)]
pub struct MemorySecureStore {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemorySecureStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SecureStore for MemorySecureStore {
    async fn set_secret(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut storage = self.storage.lock().await;
        storage.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn get_secret(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let storage = self.storage.lock().await;
        Ok(storage.get(key).cloned())
    }

    async fn delete_secret(&self, key: &str) -> Result<()> {
        let mut storage = self.storage.lock().await;
        storage.remove(key);
        Ok(())
    }

    async fn has_secret(&self, key: &str) -> Result<bool> {
        let storage = self.storage.lock().await;
        Ok(storage.contains_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trip_and_delete() {
        let store = MemorySecureStore::new();

        assert!(store.get_secret("auth_token").await.unwrap().is_none());

        store.set_secret("auth_token", b"payload").await.unwrap();
        assert!(store.has_secret("auth_token").await.unwrap());
        assert_eq!(
            store.get_secret("auth_token").await.unwrap(),
            Some(b"payload".to_vec())
        );

        store.delete_secret("auth_token").await.unwrap();
        assert!(!store.has_secret("auth_token").await.unwrap());

        // Idempotent delete
        store.delete_secret("auth_token").await.unwrap();
    }
}
