//! Profile viewing, profile edits and the follow graph.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use postify_core::error::AppError;
use postify_database::repositories::{FollowRepository, PostRepository, UserRepository};
use postify_entity::post::PostView;
use postify_entity::user::{PublicUser, UpdateProfile, User};

use crate::context::RequestContext;

/// A user's public page: the profile plus their posts, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user: PublicUser,
    pub posts: Vec<PostView>,
}

/// Result of a follow toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowOutcome {
    /// Whether the caller now follows the target.
    pub following: bool,
}

impl FollowOutcome {
    /// Human-readable result.
    pub fn message(&self) -> &'static str {
        if self.following {
            "User followed"
        } else {
            "User unfollowed"
        }
    }
}

/// Handles user profile operations.
#[derive(Debug, Clone)]
pub struct UserService {
    user_repo: Arc<UserRepository>,
    follow_repo: Arc<FollowRepository>,
    post_repo: Arc<PostRepository>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        user_repo: Arc<UserRepository>,
        follow_repo: Arc<FollowRepository>,
        post_repo: Arc<PostRepository>,
    ) -> Self {
        Self {
            user_repo,
            follow_repo,
            post_repo,
        }
    }

    /// Gets the current user's account row.
    pub async fn get_profile(&self, ctx: &RequestContext) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Updates the current user's bio and picture. Absent fields are kept.
    pub async fn update_profile(
        &self,
        ctx: &RequestContext,
        update: UpdateProfile,
    ) -> Result<PublicUser, AppError> {
        let user = if update.is_empty() {
            self.get_profile(ctx).await?
        } else {
            self.user_repo.update_profile(ctx.user_id, &update).await?
        };

        info!(user_id = %ctx.user_id, "Profile updated");

        self.public_view(user).await
    }

    /// Public page by username.
    pub async fn profile_by_username(&self, username: &str) -> Result<UserProfile, AppError> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        self.profile_of(user).await
    }

    /// Public page by ID.
    pub async fn profile_by_id(&self, user_id: Uuid) -> Result<UserProfile, AppError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        self.profile_of(user).await
    }

    /// Follows `target_id`, or unfollows if already following.
    pub async fn toggle_follow(
        &self,
        ctx: &RequestContext,
        target_id: Uuid,
    ) -> Result<FollowOutcome, AppError> {
        if target_id == ctx.user_id {
            return Err(AppError::validation("You cannot follow yourself"));
        }
        if !self.user_repo.exists(target_id).await? {
            return Err(AppError::not_found("User not found"));
        }

        let following = self.follow_repo.toggle(ctx.user_id, target_id).await?;

        info!(
            user_id = %ctx.user_id,
            target_id = %target_id,
            following,
            "Follow toggled"
        );

        Ok(FollowOutcome { following })
    }

    async fn profile_of(&self, user: User) -> Result<UserProfile, AppError> {
        let posts = self
            .post_repo
            .find_by_author(user.id)
            .await?
            .into_iter()
            .map(PostView::from)
            .collect();

        Ok(UserProfile {
            user: self.public_view(user).await?,
            posts,
        })
    }

    async fn public_view(&self, user: User) -> Result<PublicUser, AppError> {
        let followers = self.follow_repo.followers_of(user.id).await?;
        let following = self.follow_repo.following_of(user.id).await?;
        Ok(PublicUser::new(user, followers, following))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follow_outcome_message() {
        assert_eq!(FollowOutcome { following: true }.message(), "User followed");
        assert_eq!(FollowOutcome { following: false }.message(), "User unfollowed");
    }
}
