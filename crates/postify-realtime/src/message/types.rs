//! Inbound and outbound frame definitions.
//!
//! Every frame is `{"event": <name>, "data": <payload>}`.

use serde::{Deserialize, Serialize};

use crate::presence::registry::PresenceEntry;

/// Frames sent by the client to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum InboundEvent {
    /// Announce which user this connection belongs to.
    AddUser(AnnouncePayload),
    /// Ask the server to relay a message to another user.
    SendMessage(SendMessagePayload),
}

/// `addUser` payload: `{"userId": "..."}` or a bare string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnnouncePayload {
    /// Object form.
    Object {
        /// Announced user ID.
        #[serde(rename = "userId")]
        user_id: String,
    },
    /// Bare string form.
    Bare(String),
}

impl AnnouncePayload {
    /// The announced user ID, whichever form it arrived in.
    pub fn user_id(&self) -> &str {
        match self {
            Self::Object { user_id } | Self::Bare(user_id) => user_id,
        }
    }
}

/// `sendMessage` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessagePayload {
    /// Claimed sender.
    pub sender_id: String,
    /// Target user.
    pub receiver_id: String,
    /// Message body.
    pub text: String,
}

/// Frames sent by the server to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum OutboundEvent {
    /// A message addressed to this connection's user.
    GetMessage {
        /// Sender user ID.
        sender: String,
        /// Message body.
        text: String,
    },
    /// Full presence snapshot.
    GetUsers(Vec<PresenceEntry>),
    /// The last inbound frame was rejected.
    Error {
        /// Machine-readable code.
        code: String,
        /// Description.
        message: String,
    },
}

impl OutboundEvent {
    /// Build an error frame.
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.to_string(),
            message: message.into(),
        }
    }

    /// Wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetMessage { .. } => "getMessage",
            Self::GetUsers(_) => "getUsers",
            Self::Error { .. } => "error",
        }
    }
}

/// Error codes carried by `error` frames.
pub mod codes {
    /// The frame is not valid JSON or names an unknown event.
    pub const INVALID_MESSAGE: &str = "INVALID_MESSAGE";
    /// The frame exceeds the configured size limit.
    pub const MESSAGE_TOO_LARGE: &str = "MESSAGE_TOO_LARGE";
    /// A field failed validation.
    pub const VALIDATION: &str = "VALIDATION";
    /// The frame conflicts with the connection's authenticated identity.
    pub const FORBIDDEN: &str = "FORBIDDEN";
}
