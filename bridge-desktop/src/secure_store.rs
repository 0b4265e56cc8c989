//! Secure credential storage backed by the OS keychain.
//!
//! Keyring operations are synchronous system calls (and on Linux may block on
//! D-Bus), so every call runs on the blocking thread pool.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use bridge_traits::{
    error::{BridgeError, Result},
    storage::SecureStore,
};
use keyring::Entry;
use tracing::{debug, error};

/// `SecureStore` over the platform keychain.
///
/// Backends per platform:
/// - macOS: Keychain
/// - Windows: Credential Manager (DPAPI)
/// - Linux: Secret Service (libsecret)
///
/// Values are base64-encoded before storage since keyring entries hold
/// strings, not bytes.
pub struct KeyringSecureStore {
    service_name: String,
}

impl KeyringSecureStore {
    pub fn new() -> Self {
        Self::with_service_name("ttt-client-core")
    }

    /// Use a custom keychain service name. Separate service names isolate
    /// test runs from real sessions.
    pub fn with_service_name(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }

    /// Runs a keyring operation on the blocking pool.
    async fn run<T, F>(&self, key: &str, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(Entry) -> std::result::Result<T, keyring::Error> + Send + 'static,
    {
        let service = self.service_name.clone();
        let key = key.to_string();

        let result = tokio::task::spawn_blocking(move || {
            let entry = Entry::new(&service, &key)?;
            op(entry)
        })
        .await
        .map_err(|e| BridgeError::OperationFailed(format!("Keyring task failed: {}", e)))?;

        result.map_err(|e| BridgeError::OperationFailed(format!("Keyring error: {}", e)))
    }
}

impl Default for KeyringSecureStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SecureStore for KeyringSecureStore {
    async fn set_secret(&self, key: &str, value: &[u8]) -> Result<()> {
        let encoded = BASE64.encode(value);
        self.run(key, move |entry| entry.set_password(&encoded))
            .await?;
        debug!(key, "stored secret in keyring");
        Ok(())
    }

    async fn get_secret(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let encoded = self
            .run(key, |entry| match entry.get_password() {
                Ok(encoded) => Ok(Some(encoded)),
                Err(keyring::Error::NoEntry) => Ok(None),
                Err(e) => Err(e),
            })
            .await?;

        let Some(encoded) = encoded else {
            debug!(key, "no secret in keyring");
            return Ok(None);
        };

        let decoded = BASE64.decode(&encoded).map_err(|e| {
            error!(key, error = %e, "stored secret is not valid base64");
            BridgeError::OperationFailed(format!("Failed to decode secret: {}", e))
        })?;
        Ok(Some(decoded))
    }

    async fn delete_secret(&self, key: &str) -> Result<()> {
        // Deleting a missing entry is not an error per the trait contract
        self.run(key, |entry| match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e),
        })
        .await?;
        debug!(key, "deleted secret from keyring");
        Ok(())
    }

    async fn has_secret(&self, key: &str) -> Result<bool> {
        self.run(key, |entry| match entry.get_password() {
            Ok(_) => Ok(true),
            Err(keyring::Error::NoEntry) => Ok(false),
            Err(e) => Err(e),
        })
        .await
    }
}
