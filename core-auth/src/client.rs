//! Session lifecycle orchestration.
//!
//! [`AuthClient`] owns the single in-memory [`SessionState`] and coordinates
//! the remote account service, the credential store, and the event bus. All
//! operations are async and return `Result`; no operation mutates session
//! state before its remote exchange has succeeded, so a cancelled call leaves
//! the previous state intact.

use std::sync::Arc;
use std::time::Duration;

use bridge_traits::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use core_runtime::config::ClientConfig;
use core_runtime::events::{EventBus, SessionEvent};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::error::{AuthError, Result};
use crate::store::CredentialStore;
use crate::types::{Credentials, SessionState, Token, User};

/// Error payload returned by the service on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorDetail {
    detail: String,
}

/// Response of `POST /token/refresh`. Carries no refresh token; the service
/// never rotates it.
#[derive(Debug, Deserialize)]
struct RefreshGrant {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct LogoutResponse {
    msg: String,
}

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

/// Client for the remote game-and-account service.
///
/// One instance exists per process. It is cheap to clone; clones share the
/// session state, credential store, and event bus.
#[derive(Clone)]
pub struct AuthClient {
    base_url: String,
    request_timeout: Duration,
    http: Arc<dyn HttpClient>,
    store: CredentialStore,
    session: Arc<RwLock<SessionState>>,
    events: EventBus,
}

impl AuthClient {
    /// Builds a client from the injected configuration.
    ///
    /// The session starts [`SessionState::Unknown`]; call
    /// [`restore_session`](Self::restore_session) at startup to resolve it.
    pub fn new(config: &ClientConfig, events: EventBus) -> Self {
        Self {
            base_url: config.base_url.clone(),
            request_timeout: config.request_timeout,
            http: Arc::clone(&config.http_client),
            store: CredentialStore::new(Arc::clone(&config.secure_store)),
            session: Arc::new(RwLock::new(SessionState::Unknown)),
            events,
        }
    }

    /// Current session state snapshot.
    pub async fn session_state(&self) -> SessionState {
        self.session.read().await.clone()
    }

    /// Subscribes to session events.
    pub fn subscribe(&self) -> core_runtime::events::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Exchanges credentials for a token pair and establishes the session.
    ///
    /// On success the token is persisted before the in-memory state changes,
    /// so a crash between the two leaves a restorable session.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidCredentials`] when the service rejects the login
    /// with a `detail` message, [`AuthError::Unknown`] for any other non-2xx
    /// response, [`AuthError::TransportFailure`] when the service is
    /// unreachable.
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn login(&self, credentials: &Credentials) -> Result<Token> {
        let request = self
            .request(HttpMethod::Post, "/token")
            .form(credentials)
            .map_err(AuthError::from)?;

        let response = match self.http.execute(request).await {
            Ok(response) => response,
            Err(e) => return Err(self.auth_failure(e.into())),
        };

        if !response.is_success() {
            let error = match error_detail(&response) {
                Some(detail) => AuthError::InvalidCredentials(detail),
                None => AuthError::Unknown(None),
            };
            warn!(status = response.status, "login rejected");
            return Err(self.auth_failure(error));
        }

        let token: Token = response.json().map_err(AuthError::from)?;
        self.store.save(&token).await?;

        *self.session.write().await = SessionState::LoggedIn(token.clone());
        self.events
            .emit(SessionEvent::SignedIn {
                username: credentials.username.clone(),
            })
            .ok();

        info!("login succeeded");
        Ok(token)
    }

    /// Creates a new account and returns its profile.
    ///
    /// The email is validated locally before any network traffic; a rejected
    /// email costs nothing. Registration never touches the session; callers
    /// log in separately afterwards.
    ///
    /// # Errors
    ///
    /// [`AuthError::ValidationFailed`] for a malformed email or a service
    /// rejection (duplicate username, weak password), [`AuthError::Unknown`]
    /// for unexplained failures.
    #[instrument(skip(self, email, password))]
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<User> {
        if !is_valid_email(email) {
            return Err(AuthError::ValidationFailed(
                "Invalid email format".to_string(),
            ));
        }

        let request = self
            .request(HttpMethod::Post, "/register/")
            .json(&RegisterRequest {
                username,
                email,
                password,
            })
            .map_err(AuthError::from)?;

        let response = self.http.execute(request).await?;

        if !response.is_success() {
            warn!(status = response.status, "registration rejected");
            return Err(match error_detail(&response) {
                Some(detail) => AuthError::ValidationFailed(detail),
                None => AuthError::Unknown(None),
            });
        }

        let user: User = response.json().map_err(AuthError::from)?;
        info!(user_id = user.id, "account registered");
        Ok(user)
    }

    /// Exchanges the stored refresh token for a new access token.
    ///
    /// The refresh token and token type survive unchanged; only the access
    /// token is replaced, in the store first and then in the session.
    ///
    /// # Errors
    ///
    /// [`AuthError::NoRefreshToken`] when no token pair is stored or the
    /// stored pair has no refresh token. [`AuthError::InvalidCredentials`]
    /// when the service rejects the refresh token.
    #[instrument(skip(self))]
    pub async fn refresh_access_token(&self) -> Result<Token> {
        let current = match self.store.load().await? {
            Some(token) if token.has_refresh_token() => token,
            _ => return Err(AuthError::NoRefreshToken),
        };
        // Checked by the guard above
        let refresh_token = current.refresh_token.as_deref().unwrap_or_default();

        let request = self
            .request(HttpMethod::Post, "/token/refresh")
            .form(&RefreshRequest { refresh_token })
            .map_err(AuthError::from)?;

        let response = match self.http.execute(request).await {
            Ok(response) => response,
            Err(e) => return Err(self.auth_failure(e.into())),
        };

        if !response.is_success() {
            let error = match error_detail(&response) {
                Some(detail) => AuthError::InvalidCredentials(detail),
                None => AuthError::Unknown(None),
            };
            warn!(status = response.status, "token refresh rejected");
            return Err(self.auth_failure(error));
        }

        let grant: RefreshGrant = response.json().map_err(AuthError::from)?;
        let updated = match self.store.update_access_token(&grant.access_token).await? {
            Some(updated) => updated,
            // Store was emptied between load and update; keep the session
            // coherent with the grant we just received.
            None => current.with_access_token(grant.access_token),
        };

        *self.session.write().await = SessionState::LoggedIn(updated.clone());
        self.events.emit(SessionEvent::TokenRefreshed).ok();

        debug!("access token refreshed");
        Ok(updated)
    }

    /// Fetches the authenticated account's profile.
    ///
    /// A 401 triggers exactly one refresh followed by exactly one retry. When
    /// the retry also fails, or the refresh itself fails, the error is
    /// returned without further attempts.
    ///
    /// # Errors
    ///
    /// [`AuthError::NotAuthenticated`] when no token is stored.
    #[instrument(skip(self))]
    pub async fn get_user_profile(&self) -> Result<User> {
        let token = self
            .store
            .load()
            .await?
            .ok_or(AuthError::NotAuthenticated)?;

        let response = self.fetch_profile(&token.access_token).await?;

        if response.is_unauthorized() {
            debug!("access token expired, refreshing");
            let refreshed = self.refresh_access_token().await?;
            let retry = self.fetch_profile(&refreshed.access_token).await?;
            return profile_from(retry);
        }

        profile_from(response)
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<HttpResponse> {
        let request = self
            .request(HttpMethod::Get, "/users/me")
            .bearer_token(access_token);
        Ok(self.http.execute(request).await?)
    }

    /// Ends the session on the server and locally.
    ///
    /// Local state is only touched after the server acknowledges: a failed
    /// logout leaves the session and the stored token intact so the caller
    /// can retry.
    ///
    /// Returns the server's confirmation message.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<String> {
        let token = self
            .store
            .load()
            .await?
            .ok_or(AuthError::NotAuthenticated)?;

        let request = self
            .request(HttpMethod::Post, "/logout")
            .bearer_token(&token.access_token);
        let response = self.http.execute(request).await?;

        if !response.is_success() {
            warn!(status = response.status, "logout rejected, session kept");
            return Err(match error_detail(&response) {
                Some(detail) => AuthError::Unknown(Some(detail)),
                None => AuthError::Unknown(None),
            });
        }

        // A malformed confirmation body must not block teardown.
        let msg = response
            .json::<LogoutResponse>()
            .map(|r| r.msg)
            .unwrap_or_else(|_| "Logged out".to_string());

        self.store.clear().await?;
        *self.session.write().await = SessionState::LoggedOut;
        self.events.emit(SessionEvent::SignedOut).ok();

        info!("logout succeeded");
        Ok(msg)
    }

    /// Resolves the startup session state from the persisted token.
    ///
    /// With no stored token this settles to `LoggedOut` without any network
    /// traffic. Otherwise the token is verified against the service (with the
    /// usual one-shot refresh on expiry); an unusable token settles to
    /// `LoggedOut` but is left in the store.
    #[instrument(skip(self))]
    pub async fn restore_session(&self) -> SessionState {
        let stored = match self.store.load().await {
            Ok(Some(token)) => token,
            Ok(None) => {
                debug!("no stored token, settling logged out");
                return self.settle(SessionState::LoggedOut).await;
            }
            Err(e) => {
                warn!(error = %e, "credential store unreadable at startup");
                return self.settle(SessionState::LoggedOut).await;
            }
        };

        match self.get_user_profile().await {
            Ok(user) => {
                // Reload in case the verification refreshed the access token.
                let token = match self.store.load().await {
                    Ok(Some(token)) => token,
                    _ => stored,
                };
                info!(username = %user.username, "session restored");
                self.settle(SessionState::LoggedIn(token)).await
            }
            Err(e) => {
                info!(error = %e, "stored token unusable, settling logged out");
                self.settle(SessionState::LoggedOut).await
            }
        }
    }

    async fn settle(&self, state: SessionState) -> SessionState {
        *self.session.write().await = state.clone();
        state
    }

    fn request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest::new(method, format!("{}{}", self.base_url, path))
            .timeout(self.request_timeout)
    }

    /// Broadcasts the failure and passes it through.
    fn auth_failure(&self, error: AuthError) -> AuthError {
        self.events
            .emit(SessionEvent::AuthFailure {
                message: error.to_string(),
                recoverable: error.is_recoverable(),
            })
            .ok();
        error
    }
}

impl std::fmt::Debug for AuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthClient")
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

fn error_detail(response: &HttpResponse) -> Option<String> {
    response.json::<ErrorDetail>().ok().map(|e| e.detail)
}

fn profile_from(response: HttpResponse) -> Result<User> {
    if !response.is_success() {
        return Err(AuthError::Unknown(error_detail(&response)));
    }
    Ok(response.json()?)
}

/// Local email shape check, matching the service's validation closely enough
/// that a locally accepted address is worth a round trip.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty()
        || !local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c))
    {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    if host.is_empty()
        || !host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || ".-".contains(c))
    {
        return false;
    }
    (2..=64).contains(&tld.len()) && tld.chars().all(|c| c.is_ascii_alphabetic())
}
