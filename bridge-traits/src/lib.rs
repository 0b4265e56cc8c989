//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the client core and platform-specific
//! implementations. Each trait represents a capability the core requires but that
//! is provided differently per platform (desktop, iOS, Android):
//!
//! - [`HttpClient`](http::HttpClient) - Async HTTP operations against the game service
//! - [`SecureStore`](storage::SecureStore) - Credential persistence
//!   (Keychain / Keystore / Credential Manager)
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Platform
//! implementations should convert platform-specific errors to `BridgeError` and
//! provide actionable messages without exposing secret material.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` bounds so they can be shared across
//! async tasks behind an `Arc`.

pub mod error;
pub mod http;
pub mod storage;

pub use error::BridgeError;
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use storage::SecureStore;
