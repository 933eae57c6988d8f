//! Conversation entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::user::UserSummary;

/// A two-party conversation.
///
/// The pair is stored ordered (`participant_a < participant_b`) so that a
/// unique index finds the same row regardless of who wrote first.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Conversation {
    /// Unique conversation identifier.
    pub id: Uuid,
    /// Lower participant ID.
    pub participant_a: Uuid,
    /// Higher participant ID.
    pub participant_b: Uuid,
    /// When the conversation was created.
    pub created_at: DateTime<Utc>,
    /// When the last message was added.
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Order two participant IDs the way they are stored.
    pub fn ordered_pair(x: Uuid, y: Uuid) -> (Uuid, Uuid) {
        if x <= y { (x, y) } else { (y, x) }
    }

    /// Check whether `user_id` takes part in this conversation.
    pub fn includes(&self, user_id: Uuid) -> bool {
        self.participant_a == user_id || self.participant_b == user_id
    }

    /// The participant that is not `user_id`.
    pub fn other_participant(&self, user_id: Uuid) -> Uuid {
        if self.participant_a == user_id {
            self.participant_b
        } else {
            self.participant_a
        }
    }
}

/// A conversation listing row, seen from one participant.
#[derive(Debug, Clone, FromRow)]
pub struct ConversationRow {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub other_id: Uuid,
    pub other_username: String,
    pub other_profile_picture: String,
    pub last_text: Option<String>,
    pub last_created_at: Option<DateTime<Utc>>,
}

/// Preview of the newest message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LastMessage {
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// A conversation as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationView {
    /// Conversation ID.
    pub id: Uuid,
    /// The other participant(s).
    pub participants: Vec<UserSummary>,
    /// Newest message, if any.
    pub last_message: Option<LastMessage>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last activity time.
    pub updated_at: DateTime<Utc>,
}

impl From<ConversationRow> for ConversationView {
    fn from(row: ConversationRow) -> Self {
        let last_message = match (row.last_text, row.last_created_at) {
            (Some(text), Some(created_at)) => Some(LastMessage { text, created_at }),
            _ => None,
        };

        Self {
            id: row.id,
            participants: vec![UserSummary {
                id: row.other_id,
                username: row.other_username,
                profile_picture: row.other_profile_picture,
            }],
            last_message,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
