//! Durable credential persistence over a platform [`SecureStore`].
//!
//! The store holds at most one token record, serialized as JSON under a fixed
//! key. A record that fails to deserialize is treated as absent rather than
//! surfaced as an error, so a corrupt entry degrades to a clean logged-out
//! state instead of wedging the client.

use std::sync::Arc;

use bridge_traits::{BridgeError, SecureStore};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{AuthError, Result};
use crate::types::Token;

/// Fixed key for the single persisted token record.
const SESSION_KEY: &str = "auth_token";

/// Persists the session token pair in the platform secure store.
///
/// All writes are serialized through an internal async mutex so a
/// read-modify-write (such as [`update_access_token`](Self::update_access_token))
/// can never interleave with a concurrent save or clear. The lock is never
/// held across network I/O.
#[derive(Clone)]
pub struct CredentialStore {
    secure_store: Arc<dyn SecureStore>,
    write_lock: Arc<Mutex<()>>,
}

impl CredentialStore {
    pub fn new(secure_store: Arc<dyn SecureStore>) -> Self {
        Self {
            secure_store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Persists a full token pair, replacing any existing record.
    ///
    /// Rejects tokens with an empty access token; the service never issues
    /// them and persisting one would poison every later request.
    pub async fn save(&self, token: &Token) -> Result<()> {
        if token.access_token.is_empty() {
            return Err(AuthError::Storage(
                "refusing to persist token with empty access token".to_string(),
            ));
        }

        let bytes = serde_json::to_vec(token)
            .map_err(|e| AuthError::Storage(format!("failed to serialize token: {e}")))?;

        let _guard = self.write_lock.lock().await;
        self.secure_store
            .set_secret(SESSION_KEY, &bytes)
            .await
            .map_err(storage_err)?;

        debug!(has_refresh = token.has_refresh_token(), "token persisted");
        Ok(())
    }

    /// Loads the persisted token pair, if any.
    ///
    /// A record that cannot be deserialized is logged and reported as absent.
    pub async fn load(&self) -> Result<Option<Token>> {
        let bytes = match self.secure_store.get_secret(SESSION_KEY).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return Ok(None),
            Err(e) => return Err(storage_err(e)),
        };

        match serde_json::from_slice(&bytes) {
            Ok(token) => Ok(Some(token)),
            Err(e) => {
                warn!(error = %e, "discarding unreadable token record");
                Ok(None)
            }
        }
    }

    /// Replaces only the access token of the persisted record, keeping the
    /// refresh token and token type.
    ///
    /// Returns the updated token, or `Ok(None)` as a silent no-op when no
    /// record exists. The read and write happen under the write lock so a
    /// concurrent save cannot be clobbered with stale fields.
    pub async fn update_access_token(&self, access_token: &str) -> Result<Option<Token>> {
        let _guard = self.write_lock.lock().await;

        let bytes = match self.secure_store.get_secret(SESSION_KEY).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!("no persisted token, skipping access token update");
                return Ok(None);
            }
            Err(e) => return Err(storage_err(e)),
        };

        let current: Token = match serde_json::from_slice(&bytes) {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "discarding unreadable token record");
                return Ok(None);
            }
        };

        let updated = current.with_access_token(access_token);
        let bytes = serde_json::to_vec(&updated)
            .map_err(|e| AuthError::Storage(format!("failed to serialize token: {e}")))?;
        self.secure_store
            .set_secret(SESSION_KEY, &bytes)
            .await
            .map_err(storage_err)?;

        Ok(Some(updated))
    }

    /// Removes the persisted record. Idempotent.
    pub async fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.secure_store
            .delete_secret(SESSION_KEY)
            .await
            .map_err(storage_err)?;
        debug!("persisted token cleared");
        Ok(())
    }
}

fn storage_err(e: BridgeError) -> AuthError {
    AuthError::Storage(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_desktop::MemorySecureStore;
    use bridge_traits::error::Result as BridgeResult;
    use mockall::mock;

    mock! {
        SecureStore {}

        #[async_trait]
        impl SecureStore for SecureStore {
            async fn set_secret(&self, key: &str, value: &[u8]) -> BridgeResult<()>;
            async fn get_secret(&self, key: &str) -> BridgeResult<Option<Vec<u8>>>;
            async fn delete_secret(&self, key: &str) -> BridgeResult<()>;
        }
    }

    fn store() -> CredentialStore {
        CredentialStore::new(Arc::new(MemorySecureStore::new()))
    }

    #[tokio::test]
    async fn save_and_load_round_trip() {
        let store = store();
        let token = Token::new("A", Some("R".to_string()), "bearer");

        store.save(&token).await.unwrap();
        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, Some(token));
    }

    #[tokio::test]
    async fn load_when_empty_returns_none() {
        let store = store();
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn save_rejects_empty_access_token() {
        let store = store();
        let token = Token::new("", Some("R".to_string()), "bearer");

        let err = store.save(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::Storage(_)));
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn corrupt_record_reads_as_absent() {
        let secure_store = Arc::new(MemorySecureStore::new());
        secure_store
            .set_secret(SESSION_KEY, b"not json")
            .await
            .unwrap();

        let store = CredentialStore::new(secure_store);
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn update_access_token_preserves_other_fields() {
        let store = store();
        let token = Token::new("old", Some("R".to_string()), "bearer");
        store.save(&token).await.unwrap();

        let updated = store.update_access_token("new").await.unwrap().unwrap();
        assert_eq!(updated.access_token, "new");
        assert_eq!(updated.refresh_token, Some("R".to_string()));
        assert_eq!(updated.token_type, "bearer");

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded, updated);
    }

    #[tokio::test]
    async fn update_access_token_is_noop_when_empty() {
        let store = store();
        let result = store.update_access_token("new").await.unwrap();
        assert_eq!(result, None);
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let store = store();
        let token = Token::new("A", None, "bearer");
        store.save(&token).await.unwrap();

        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn save_replaces_existing_record() {
        let store = store();
        store
            .save(&Token::new("first", Some("R1".to_string()), "bearer"))
            .await
            .unwrap();
        store
            .save(&Token::new("second", None, "bearer"))
            .await
            .unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded.access_token, "second");
        assert!(loaded.refresh_token.is_none());
    }

    #[tokio::test]
    async fn backend_failure_surfaces_as_storage_error() {
        let mut secure_store = MockSecureStore::new();
        secure_store
            .expect_get_secret()
            .returning(|_| Err(BridgeError::NotAvailable("keychain locked".to_string())));

        let store = CredentialStore::new(Arc::new(secure_store));
        let err = store.load().await.unwrap_err();
        assert!(matches!(err, AuthError::Storage(ref m) if m.contains("keychain locked")));
    }
}
