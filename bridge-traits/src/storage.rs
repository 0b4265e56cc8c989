//! Secure Credential Storage Abstraction
//!
//! Platform-specific secure storage for the persisted session token:
//! - macOS/iOS: Keychain
//! - Android: Keystore
//! - Windows: DPAPI
//! - Linux: Secret Service / libsecret
//!
//! # Security Requirements
//!
//! Implementations MUST:
//! - Encrypt data at rest using platform-provided secure storage when available
//! - Never log or expose secret values

use async_trait::async_trait;

use crate::error::Result;

/// Secure credential storage trait
///
/// The client core persists exactly one record (the serialized session token)
/// under a fixed key, but the trait is keyed so implementations stay generic.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::SecureStore;
///
/// async fn store_session(store: &dyn SecureStore, serialized: &[u8]) -> Result<()> {
///     store.set_secret("auth_token", serialized).await
/// }
/// ```
#[async_trait]
pub trait SecureStore: Send + Sync {
    /// Store a secret value, overwriting any previous value under the key.
    async fn set_secret(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Retrieve a secret value
    ///
    /// Returns `Ok(None)` if the key doesn't exist.
    async fn get_secret(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Delete a secret. Deleting a missing key is not an error.
    async fn delete_secret(&self, key: &str) -> Result<()>;

    /// Check if a secret exists without retrieving it
    async fn has_secret(&self, key: &str) -> Result<bool> {
        Ok(self.get_secret(key).await?.is_some())
    }
}
