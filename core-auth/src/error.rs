use bridge_traits::error::BridgeError;
use thiserror::Error;

/// Typed failures of the auth core.
///
/// Every variant carrying a `String` holds the human-readable detail message
/// taken from the service's `{detail: ...}` error body. `Unknown(None)` means
/// the body was absent or unparsable.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("No refresh token found")]
    NoRefreshToken,

    #[error("Transport failure: {0}")]
    TransportFailure(String),

    #[error("{}", .0.as_deref().unwrap_or("Unknown error"))]
    Unknown(Option<String>),

    #[error("Credential storage error: {0}")]
    Storage(String),
}

impl AuthError {
    /// Whether retrying the failed operation can plausibly succeed.
    ///
    /// Only transport failures qualify; rejected credentials or validation
    /// errors will not change on retry.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AuthError::TransportFailure(_))
    }
}

impl From<BridgeError> for AuthError {
    fn from(e: BridgeError) -> Self {
        match e {
            BridgeError::Network(msg) | BridgeError::Timeout(msg) => {
                AuthError::TransportFailure(msg)
            }
            other => AuthError::Unknown(Some(other.to_string())),
        }
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_without_detail_has_generic_message() {
        assert_eq!(AuthError::Unknown(None).to_string(), "Unknown error");
        assert_eq!(
            AuthError::Unknown(Some("service exploded".to_string())).to_string(),
            "service exploded"
        );
    }

    #[test]
    fn only_transport_failures_are_recoverable() {
        assert!(AuthError::TransportFailure("timeout".into()).is_recoverable());
        assert!(!AuthError::InvalidCredentials("bad password".into()).is_recoverable());
        assert!(!AuthError::NotAuthenticated.is_recoverable());
    }

    #[test]
    fn bridge_errors_map_to_transport_or_unknown() {
        let e: AuthError = BridgeError::Network("unreachable".into()).into();
        assert!(matches!(e, AuthError::TransportFailure(_)));

        let e: AuthError = BridgeError::Timeout("30s elapsed".into()).into();
        assert!(matches!(e, AuthError::TransportFailure(_)));

        let e: AuthError = BridgeError::OperationFailed("bad json".into()).into();
        assert!(matches!(e, AuthError::Unknown(Some(_))));
    }
}
