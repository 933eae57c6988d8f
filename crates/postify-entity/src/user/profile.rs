//! Public user views.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::model::User;

/// The compact author card embedded in posts, comments and conversations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserSummary {
    /// User ID.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// Profile picture URL.
    #[serde(rename = "profilePicture")]
    pub profile_picture: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            profile_picture: user.profile_picture.clone(),
        }
    }
}

/// A user as shown to other users. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    /// User ID.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Bio.
    pub bio: String,
    /// Profile picture URL.
    #[serde(rename = "profilePicture")]
    pub profile_picture: String,
    /// IDs of users following this user.
    pub followers: Vec<Uuid>,
    /// IDs of users this user follows.
    pub following: Vec<Uuid>,
    /// Account creation time.
    pub created_at: DateTime<Utc>,
}

impl PublicUser {
    /// Combine a user row with its follow relations.
    pub fn new(user: User, followers: Vec<Uuid>, following: Vec<Uuid>) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            bio: user.bio,
            profile_picture: user.profile_picture,
            followers,
            following,
            created_at: user.created_at,
        }
    }
}
