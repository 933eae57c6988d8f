//! Comment repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use postify_core::error::{AppError, ErrorKind};
use postify_core::result::AppResult;
use postify_entity::post::{Comment, CommentWithAuthor};

/// Repository for post comments.
#[derive(Debug, Clone)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    /// Create a new comment repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Add a comment to a post.
    pub async fn create(&self, post_id: Uuid, author_id: Uuid, text: &str) -> AppResult<Comment> {
        sqlx::query_as::<_, Comment>(
            "INSERT INTO comments (post_id, author_id, text) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(post_id)
        .bind(author_id)
        .bind(text)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                AppError::not_found("Post not found")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create comment", e),
        })
    }

    /// Find a comment with its author.
    pub async fn find_with_author(&self, id: Uuid) -> AppResult<Option<CommentWithAuthor>> {
        sqlx::query_as::<_, CommentWithAuthor>(
            "SELECT c.id, c.post_id, c.author_id, c.text, c.created_at, \
                    u.username AS author_username, u.profile_picture AS author_profile_picture \
             FROM comments c JOIN users u ON u.id = c.author_id \
             WHERE c.id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find comment", e))
    }

    /// List a post's comments, newest first.
    pub async fn find_by_post(&self, post_id: Uuid) -> AppResult<Vec<CommentWithAuthor>> {
        sqlx::query_as::<_, CommentWithAuthor>(
            "SELECT c.id, c.post_id, c.author_id, c.text, c.created_at, \
                    u.username AS author_username, u.profile_picture AS author_profile_picture \
             FROM comments c JOIN users u ON u.id = c.author_id \
             WHERE c.post_id = $1 \
             ORDER BY c.created_at DESC",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list comments", e))
    }
}
