//! Comment entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::user::UserSummary;

/// A comment row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    /// Unique comment identifier.
    pub id: Uuid,
    /// The post commented on.
    pub post_id: Uuid,
    /// The comment author.
    pub author_id: Uuid,
    /// Comment body.
    pub text: String,
    /// When the comment was created.
    pub created_at: DateTime<Utc>,
}

/// A comment joined with its author.
#[derive(Debug, Clone, FromRow)]
pub struct CommentWithAuthor {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub author_username: String,
    pub author_profile_picture: String,
}

/// A comment as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentView {
    pub id: Uuid,
    pub post_id: Uuid,
    pub text: String,
    pub author: UserSummary,
    pub created_at: DateTime<Utc>,
}

impl From<CommentWithAuthor> for CommentView {
    fn from(row: CommentWithAuthor) -> Self {
        Self {
            id: row.id,
            post_id: row.post_id,
            text: row.text,
            author: UserSummary {
                id: row.author_id,
                username: row.author_username,
                profile_picture: row.author_profile_picture,
            },
            created_at: row.created_at,
        }
    }
}
