//! Individual WebSocket connection handle.

use parking_lot::Mutex;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::message::types::OutboundEvent;

/// Unique connection identifier.
pub type ConnectionId = Uuid;

/// Where a connection is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// Open, no `addUser` yet.
    Anonymous,
    /// Open and announced as this user.
    Announced(String),
    /// The transport is gone.
    Closed,
}

/// A handle to a single WebSocket connection.
///
/// Holds the sender half of the connection's bounded outbound queue.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID.
    pub id: ConnectionId,
    /// User ID proven by a token at upgrade, if authentication is required.
    pub authenticated_user: Option<String>,
    sender: mpsc::Sender<OutboundEvent>,
    state: Mutex<ConnectionState>,
}

impl ConnectionHandle {
    /// Create a new handle in the anonymous state.
    pub fn new(sender: mpsc::Sender<OutboundEvent>, authenticated_user: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            authenticated_user,
            sender,
            state: Mutex::new(ConnectionState::Anonymous),
        }
    }

    /// Queue an outbound event without waiting.
    ///
    /// Returns `false` if the event was dropped.
    pub fn send(&self, event: OutboundEvent) -> bool {
        if !self.is_open() {
            return false;
        }
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(event)) => {
                tracing::warn!(
                    conn_id = %self.id,
                    event = event.name(),
                    "Connection send buffer full, dropping event"
                );
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_closed();
                false
            }
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.state.lock().clone()
    }

    /// The announced user, if any.
    pub fn announced_user(&self) -> Option<String> {
        match &*self.state.lock() {
            ConnectionState::Announced(user_id) => Some(user_id.clone()),
            _ => None,
        }
    }

    /// Whether the connection has not been closed.
    pub fn is_open(&self) -> bool {
        !matches!(*self.state.lock(), ConnectionState::Closed)
    }

    /// Move to `Announced(user_id)` unless already closed.
    pub(crate) fn mark_announced(&self, user_id: &str) -> bool {
        let mut state = self.state.lock();
        if matches!(*state, ConnectionState::Closed) {
            return false;
        }
        *state = ConnectionState::Announced(user_id.to_string());
        true
    }

    /// Move to `Closed`.
    pub(crate) fn mark_closed(&self) {
        *self.state.lock() = ConnectionState::Closed;
    }
}
