//! # Session & Authentication Module
//!
//! The session lifecycle core of the client: acquiring a token pair from
//! credentials, persisting it, attaching it to authenticated requests,
//! detecting expiry via a 401 response, refreshing the access token exactly
//! once per failure, retrying the original request, and invalidating the
//! session on logout.
//!
//! ## Overview
//!
//! - [`CredentialStore`](store::CredentialStore) persists the current
//!   [`Token`](types::Token) through a platform [`SecureStore`] bridge.
//! - [`AuthClient`](client::AuthClient) issues login, register, logout,
//!   profile-fetch, and refresh calls, and owns the single process-wide
//!   [`SessionState`](types::SessionState).
//! - The one-shot refresh protocol: a 401 on the profile fetch triggers at
//!   most one token refresh and at most one retry of the original request.
//!
//! Every operation returns a typed [`AuthError`] instead of panicking or
//! throwing; the presentation layer maps result variants to UI effects.
//!
//! [`SecureStore`]: bridge_traits::storage::SecureStore

pub mod client;
pub mod error;
pub mod store;
pub mod types;

pub use client::AuthClient;
pub use error::{AuthError, Result};
pub use store::CredentialStore;
pub use types::{Credentials, Game, GameResult, SessionState, Token, User};
