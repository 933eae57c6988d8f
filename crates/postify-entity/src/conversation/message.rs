//! Direct message entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A stored direct message.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Message {
    /// Unique message identifier.
    pub id: Uuid,
    /// Owning conversation.
    pub conversation_id: Uuid,
    /// Author of the message.
    pub sender_id: Uuid,
    /// Recipient of the message.
    pub receiver_id: Uuid,
    /// Message body.
    pub text: String,
    /// When the message was stored.
    pub created_at: DateTime<Utc>,
}

/// Data required to store a new message.
#[derive(Debug, Clone)]
pub struct CreateMessage {
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub text: String,
}
