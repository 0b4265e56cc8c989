use serde::{Deserialize, Serialize};
use std::fmt;

/// Token pair issued by the `/token` endpoint.
///
/// `access_token` and `token_type` are always present; `refresh_token` may be
/// absent for service-issued access-only tokens. Field names match the wire
/// format, and the same shape is used for the persisted record.
///
/// A `Token` is immutable: replacing the access token after a refresh produces
/// a new value via [`Token::with_access_token`], so concurrent readers holding
/// a snapshot never observe a half-updated pair.
///
/// # Security
///
/// The `Debug` implementation redacts both token values.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Short-lived credential authorizing API calls
    pub access_token: String,
    /// Longer-lived credential used solely to mint a new access token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Token scheme reported by the service (typically "bearer")
    pub token_type: String,
}

impl Token {
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: Option<String>,
        token_type: impl Into<String>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token,
            token_type: token_type.into(),
        }
    }

    /// Returns a new token with only the access token replaced.
    ///
    /// The refresh token and token type are carried over unchanged; the
    /// service never rotates the refresh token on refresh.
    pub fn with_access_token(&self, access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: self.refresh_token.clone(),
            token_type: self.token_type.clone(),
        }
    }

    pub fn has_refresh_token(&self) -> bool {
        self.refresh_token.is_some()
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &"[REDACTED]")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// Login credentials. Transient: used only for the `/token` call and never
/// persisted. `Debug` redacts the password.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Outcome of a finished game, as reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameResult {
    Player1,
    Player2,
    Draw,
}

/// A single recorded game between two players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: i64,
    pub player1_id: i64,
    pub player2_id: i64,
    pub player1_score: i64,
    pub player2_score: i64,
    pub result: GameResult,
}

/// Account profile returned by `/users/me` and `/register/`.
///
/// Read-only projection from the service; the core caches the last fetch but
/// never mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub wins: i64,
    pub losses: i64,
    pub draws: i64,
    pub games: Vec<Game>,
}

/// In-memory session state, derived from the credential store at startup and
/// updated by the auth client.
///
/// Exactly one instance exists per process, owned by the
/// [`AuthClient`](crate::client::AuthClient) and observed read-only by the
/// presentation layer.
///
/// # State Transitions
///
/// ```text
/// Unknown ──restore──> LoggedIn | LoggedOut
/// LoggedOut ──login──> LoggedIn
/// LoggedIn ──refresh──> LoggedIn (new access token)
/// LoggedIn ──logout──> LoggedOut
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Process start, persisted token not yet verified
    #[default]
    Unknown,
    /// No valid session exists
    LoggedOut,
    /// An authenticated session with the current token pair
    LoggedIn(Token),
}

impl SessionState {
    pub fn is_logged_in(&self) -> bool {
        matches!(self, SessionState::LoggedIn(_))
    }

    /// The current token, when logged in.
    pub fn token(&self) -> Option<&Token> {
        match self {
            SessionState::LoggedIn(token) => Some(token),
            _ => None,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Unknown => write!(f, "Unknown"),
            SessionState::LoggedOut => write!(f, "Logged Out"),
            SessionState::LoggedIn(_) => write!(f, "Logged In"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_debug_redacts_secrets() {
        let token = Token::new("secret_access", Some("secret_refresh".to_string()), "bearer");
        let debug_str = format!("{:?}", token);
        assert!(debug_str.contains("[REDACTED]"));
        assert!(!debug_str.contains("secret_access"));
        assert!(!debug_str.contains("secret_refresh"));
        assert!(debug_str.contains("bearer"));
    }

    #[test]
    fn with_access_token_replaces_only_access() {
        let token = Token::new("old", Some("refresh".to_string()), "bearer");
        let updated = token.with_access_token("new");

        assert_eq!(updated.access_token, "new");
        assert_eq!(updated.refresh_token, Some("refresh".to_string()));
        assert_eq!(updated.token_type, "bearer");
        // Original is untouched
        assert_eq!(token.access_token, "old");
    }

    #[test]
    fn token_deserializes_without_refresh_token() {
        let json = r#"{"access_token":"A","token_type":"bearer"}"#;
        let token: Token = serde_json::from_str(json).unwrap();
        assert_eq!(token.access_token, "A");
        assert!(token.refresh_token.is_none());
        assert!(!token.has_refresh_token());
    }

    #[test]
    fn token_serialization_round_trip() {
        let token = Token::new("A", Some("R".to_string()), "bearer");
        let json = serde_json::to_string(&token).unwrap();
        let back: Token = serde_json::from_str(&json).unwrap();
        assert_eq!(token, back);
    }

    #[test]
    fn credentials_debug_redacts_password() {
        let creds = Credentials::new("alice", "hunter2");
        let debug_str = format!("{:?}", creds);
        assert!(debug_str.contains("alice"));
        assert!(!debug_str.contains("hunter2"));
    }

    #[test]
    fn game_result_uses_wire_names() {
        assert_eq!(
            serde_json::to_string(&GameResult::Player1).unwrap(),
            r#""player1""#
        );
        assert_eq!(
            serde_json::from_str::<GameResult>(r#""draw""#).unwrap(),
            GameResult::Draw
        );
    }

    #[test]
    fn user_deserializes_from_service_payload() {
        let json = r#"{
            "id": 7,
            "username": "alice",
            "email": "alice@example.com",
            "wins": 3,
            "losses": 1,
            "draws": 2,
            "games": [
                {
                    "id": 1,
                    "player1_id": 7,
                    "player2_id": 9,
                    "player1_score": 3,
                    "player2_score": 0,
                    "result": "player1"
                }
            ]
        }"#;

        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.wins, 3);
        assert_eq!(user.games.len(), 1);
        assert_eq!(user.games[0].result, GameResult::Player1);
    }

    #[test]
    fn session_state_helpers() {
        assert_eq!(SessionState::default(), SessionState::Unknown);
        assert!(!SessionState::Unknown.is_logged_in());
        assert!(!SessionState::LoggedOut.is_logged_in());

        let token = Token::new("A", None, "bearer");
        let state = SessionState::LoggedIn(token.clone());
        assert!(state.is_logged_in());
        assert_eq!(state.token(), Some(&token));
        assert_eq!(SessionState::LoggedOut.token(), None);
    }

    #[test]
    fn session_state_display() {
        assert_eq!(format!("{}", SessionState::Unknown), "Unknown");
        assert_eq!(format!("{}", SessionState::LoggedOut), "Logged Out");
        let state = SessionState::LoggedIn(Token::new("A", None, "bearer"));
        assert_eq!(format!("{}", state), "Logged In");
    }
}
