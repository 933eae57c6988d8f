//! Direct message repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use postify_core::error::{AppError, ErrorKind};
use postify_core::result::AppResult;
use postify_entity::conversation::{CreateMessage, Message};

/// Repository for stored direct messages.
#[derive(Debug, Clone)]
pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    /// Create a new message repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Store a message and bump its conversation's `updated_at` in the
    /// same statement.
    pub async fn create(&self, data: &CreateMessage) -> AppResult<Message> {
        sqlx::query_as::<_, Message>(
            "WITH m AS ( \
                 INSERT INTO messages (conversation_id, sender_id, receiver_id, text) \
                 VALUES ($1, $2, $3, $4) RETURNING * \
             ), c AS ( \
                 UPDATE conversations SET updated_at = NOW() WHERE id = $1 \
             ) \
             SELECT * FROM m",
        )
        .bind(data.conversation_id)
        .bind(data.sender_id)
        .bind(data.receiver_id)
        .bind(&data.text)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to store message", e))
    }

    /// List a conversation's messages, oldest first.
    pub async fn find_by_conversation(&self, conversation_id: Uuid) -> AppResult<Vec<Message>> {
        sqlx::query_as::<_, Message>(
            "SELECT * FROM messages WHERE conversation_id = $1 ORDER BY created_at ASC, id ASC",
        )
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list messages", e))
    }
}
