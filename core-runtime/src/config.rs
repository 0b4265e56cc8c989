//! # Client Configuration Module
//!
//! Configuration for the client core, built once at startup and passed by
//! reference to every consumer. There are no process-wide singletons: the
//! session context object constructed from this config is the single owner of
//! shared state.
//!
//! ## Required Dependencies
//!
//! - `HttpClient` - all traffic to the game service
//! - `SecureStore` - credential persistence
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::ClientConfig;
//! use bridge_desktop::{KeyringSecureStore, ReqwestHttpClient};
//! use std::sync::Arc;
//!
//! let config = ClientConfig::builder()
//!     .base_url("http://localhost:8000")
//!     .http_client(Arc::new(ReqwestHttpClient::new()))
//!     .secure_store(Arc::new(KeyringSecureStore::new()))
//!     .build()
//!     .expect("Failed to build config");
//! ```
//!
//! The builder validates required capabilities and fails fast with actionable
//! messages when one is missing.

use crate::error::{Error, Result};
use bridge_traits::{HttpClient, SecureStore};
use std::sync::Arc;
use std::time::Duration;

/// Default timeout applied to individual service requests.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the client core.
///
/// Use [`ClientConfig::builder`] to construct instances.
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the remote game-and-account service, without trailing slash
    pub base_url: String,

    /// Timeout applied to each service request
    pub request_timeout: Duration,

    /// HTTP client for talking to the service (required)
    pub http_client: Arc<dyn HttpClient>,

    /// Secure credential storage (required)
    pub secure_store: Arc<dyn SecureStore>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .field("http_client", &"HttpClient { ... }")
            .field("secure_store", &"SecureStore { ... }")
            .finish()
    }
}

impl ClientConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for [`ClientConfig`].
#[derive(Default)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    request_timeout: Option<Duration>,
    http_client: Option<Arc<dyn HttpClient>>,
    secure_store: Option<Arc<dyn SecureStore>>,
}

impl ClientConfigBuilder {
    /// Set the base URL of the remote service. A trailing slash is stripped so
    /// paths can be appended uniformly.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut url = base_url.into();
        while url.ends_with('/') {
            url.pop();
        }
        self.base_url = Some(url);
        self
    }

    /// Set the per-request timeout (default 30 seconds).
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Inject the HTTP client implementation.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Inject the secure store implementation.
    pub fn secure_store(mut self, store: Arc<dyn SecureStore>) -> Self {
        self.secure_store = Some(store);
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` when the base URL is missing or empty, and
    /// `Error::CapabilityMissing` when a required bridge was not injected.
    pub fn build(self) -> Result<ClientConfig> {
        let base_url = self
            .base_url
            .filter(|u| !u.is_empty())
            .ok_or_else(|| Error::Config("base_url is required".to_string()))?;

        let http_client = self.http_client.ok_or_else(|| Error::CapabilityMissing {
            capability: "HttpClient".to_string(),
            message: "No HTTP client implementation provided. \
                      Desktop: use bridge_desktop::ReqwestHttpClient. \
                      Mobile: inject a platform-native adapter."
                .to_string(),
        })?;

        let secure_store = self.secure_store.ok_or_else(|| Error::CapabilityMissing {
            capability: "SecureStore".to_string(),
            message: "No secure store implementation provided. \
                      Desktop: use bridge_desktop::KeyringSecureStore. \
                      Mobile: inject a Keychain/Keystore adapter."
                .to_string(),
        })?;

        Ok(ClientConfig {
            base_url,
            request_timeout: self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
            http_client,
            secure_store,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use bridge_traits::http::{HttpRequest, HttpResponse};

    struct NoopHttpClient;

    #[async_trait]
    impl HttpClient for NoopHttpClient {
        async fn execute(&self, _request: HttpRequest) -> BridgeResult<HttpResponse> {
            Err(BridgeError::NotAvailable("noop".to_string()))
        }
    }

    struct NoopSecureStore;

    #[async_trait]
    impl SecureStore for NoopSecureStore {
        async fn set_secret(&self, _key: &str, _value: &[u8]) -> BridgeResult<()> {
            Ok(())
        }

        async fn get_secret(&self, _key: &str) -> BridgeResult<Option<Vec<u8>>> {
            Ok(None)
        }

        async fn delete_secret(&self, _key: &str) -> BridgeResult<()> {
            Ok(())
        }
    }

    #[test]
    fn build_with_all_capabilities() {
        let config = ClientConfig::builder()
            .base_url("http://localhost:8000/")
            .http_client(Arc::new(NoopHttpClient))
            .secure_store(Arc::new(NoopSecureStore))
            .build()
            .unwrap();

        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
    }

    #[test]
    fn missing_base_url_fails() {
        let result = ClientConfig::builder()
            .http_client(Arc::new(NoopHttpClient))
            .secure_store(Arc::new(NoopSecureStore))
            .build();

        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn missing_http_client_fails_with_actionable_message() {
        let result = ClientConfig::builder()
            .base_url("http://localhost:8000")
            .secure_store(Arc::new(NoopSecureStore))
            .build();

        match result {
            Err(Error::CapabilityMissing { capability, message }) => {
                assert_eq!(capability, "HttpClient");
                assert!(message.contains("ReqwestHttpClient"));
            }
            other => panic!("Expected CapabilityMissing, got {:?}", other.err()),
        }
    }

    #[test]
    fn missing_secure_store_fails() {
        let result = ClientConfig::builder()
            .base_url("http://localhost:8000")
            .http_client(Arc::new(NoopHttpClient))
            .build();

        assert!(matches!(
            result,
            Err(Error::CapabilityMissing { capability, .. }) if capability == "SecureStore"
        ));
    }

    #[test]
    fn custom_timeout_is_kept() {
        let config = ClientConfig::builder()
            .base_url("http://localhost:8000")
            .request_timeout(Duration::from_secs(5))
            .http_client(Arc::new(NoopHttpClient))
            .secure_store(Arc::new(NoopSecureStore))
            .build()
            .unwrap();

        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }
}
