//! # Event Bus System
//!
//! Session events broadcast over `tokio::sync::broadcast`. The auth client
//! emits an event whenever the session changes; the presentation layer
//! subscribes and maps events to UI effects without polling.
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{EventBus, SessionEvent};
//!
//! let event_bus = EventBus::new(100);
//! let mut subscriber = event_bus.subscribe();
//!
//! event_bus
//!     .emit(SessionEvent::SignedIn {
//!         username: "alice".to_string(),
//!     })
//!     .ok();
//! ```
//!
//! ## Error Handling
//!
//! `recv()` can produce two errors:
//! - `RecvError::Lagged(n)`: the subscriber missed `n` events. Non-fatal; the
//!   subscriber should re-read current state and continue.
//! - `RecvError::Closed`: all senders dropped, treat as shutdown.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

/// Events describing changes to the authentication session.
///
/// Events carry no token material; subscribers that need the current token
/// read it from the auth client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum SessionEvent {
    /// A login completed and the session is now established.
    SignedIn {
        /// The username that authenticated.
        username: String,
    },
    /// The session was invalidated by an explicit logout.
    SignedOut,
    /// An expired access token was exchanged for a fresh one.
    TokenRefreshed,
    /// An authentication operation failed.
    AuthFailure {
        /// Human-readable error message (never contains token material).
        message: String,
        /// Whether retrying the operation can plausibly succeed
        /// (e.g. transport failures are recoverable, invalid credentials are not).
        recoverable: bool,
    },
}

impl SessionEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            SessionEvent::SignedIn { .. } => "User signed in",
            SessionEvent::SignedOut => "User signed out",
            SessionEvent::TokenRefreshed => "Access token refreshed",
            SessionEvent::AuthFailure { .. } => "Authentication error",
        }
    }
}

/// Central broadcast channel for session events.
///
/// Cheap to clone; all clones publish to the same channel. Each `subscribe()`
/// call creates an independent receiver. Past events are not replayed.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<SessionEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    ///
    /// When a subscriber falls behind by more than `capacity` events it
    /// receives `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Creates a new event bus with the default buffer size.
    #[allow(clippy::should_implement_trait)]
    pub fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an error
    /// when there are no active subscribers. Emitters treat that error as
    /// non-fatal: session state is authoritative, events are advisory.
    pub fn emit(&self, event: SessionEvent) -> Result<usize, SendError<SessionEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber to receive future events.
    pub fn subscribe(&self) -> Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn emit_and_receive() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.emit(SessionEvent::SignedIn {
            username: "alice".to_string(),
        })
        .unwrap();

        let event = rx.recv().await.unwrap();
        assert_eq!(
            event,
            SessionEvent::SignedIn {
                username: "alice".to_string()
            }
        );
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_independently() {
        let bus = EventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        bus.emit(SessionEvent::SignedOut).unwrap();

        assert_eq!(rx1.recv().await.unwrap(), SessionEvent::SignedOut);
        assert_eq!(rx2.recv().await.unwrap(), SessionEvent::SignedOut);
    }

    #[test]
    fn emit_without_subscribers_errors() {
        let bus = EventBus::new(16);
        assert!(bus.emit(SessionEvent::TokenRefreshed).is_err());
    }

    #[test]
    fn event_serialization_round_trip() {
        let event = SessionEvent::AuthFailure {
            message: "Connection failed".to_string(),
            recoverable: true,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: SessionEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }

    #[test]
    fn descriptions() {
        assert_eq!(
            SessionEvent::SignedIn {
                username: "a".into()
            }
            .description(),
            "User signed in"
        );
        assert_eq!(SessionEvent::SignedOut.description(), "User signed out");
    }
}
