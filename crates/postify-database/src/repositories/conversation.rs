//! Conversation repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use postify_core::error::{AppError, ErrorKind};
use postify_core::result::AppResult;
use postify_entity::conversation::{Conversation, ConversationRow};

/// Repository for two-party conversations.
#[derive(Debug, Clone)]
pub struct ConversationRepository {
    pool: PgPool,
}

impl ConversationRepository {
    /// Create a new conversation repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the conversation between two users, in either order.
    pub async fn find_between(&self, x: Uuid, y: Uuid) -> AppResult<Option<Conversation>> {
        let (a, b) = Conversation::ordered_pair(x, y);
        sqlx::query_as::<_, Conversation>(
            "SELECT * FROM conversations WHERE participant_a = $1 AND participant_b = $2",
        )
        .bind(a)
        .bind(b)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find conversation", e))
    }

    /// Return the conversation between two users, creating it if needed.
    pub async fn find_or_create(&self, x: Uuid, y: Uuid) -> AppResult<Conversation> {
        let (a, b) = Conversation::ordered_pair(x, y);
        // The no-op update makes RETURNING yield the existing row on conflict.
        sqlx::query_as::<_, Conversation>(
            "INSERT INTO conversations (participant_a, participant_b) VALUES ($1, $2) \
             ON CONFLICT ON CONSTRAINT conversations_participants_key \
             DO UPDATE SET participant_a = EXCLUDED.participant_a \
             RETURNING *",
        )
        .bind(a)
        .bind(b)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                AppError::not_found("User not found")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create conversation", e),
        })
    }

    /// List a user's conversations with the other participant and the
    /// newest message, most recently active first.
    pub async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<ConversationRow>> {
        sqlx::query_as::<_, ConversationRow>(
            "SELECT c.id, c.created_at, c.updated_at, \
                    o.id AS other_id, o.username AS other_username, \
                    o.profile_picture AS other_profile_picture, \
                    lm.text AS last_text, lm.created_at AS last_created_at \
             FROM conversations c \
             JOIN users o ON o.id = CASE WHEN c.participant_a = $1 \
                                         THEN c.participant_b ELSE c.participant_a END \
             LEFT JOIN LATERAL ( \
                 SELECT m.text, m.created_at FROM messages m \
                 WHERE m.conversation_id = c.id \
                 ORDER BY m.created_at DESC LIMIT 1 \
             ) lm ON TRUE \
             WHERE c.participant_a = $1 OR c.participant_b = $1 \
             ORDER BY c.updated_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list conversations", e))
    }
}
