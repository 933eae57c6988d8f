//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A registered Postify account.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Unique handle.
    pub username: String,
    /// Unique login email.
    pub email: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Free-form profile bio.
    pub bio: String,
    /// URL of the profile picture, empty when unset.
    pub profile_picture: String,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Desired username.
    pub username: String,
    /// Email address, stored lowercased.
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
}

/// Partial profile update. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfile {
    /// New bio.
    pub bio: Option<String>,
    /// New profile picture URL.
    pub profile_picture: Option<String>,
}

impl UpdateProfile {
    /// Build an update from raw request fields, treating blank strings the
    /// same as absent ones.
    pub fn from_optional(bio: Option<String>, profile_picture: Option<String>) -> Self {
        fn keep_non_blank(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            bio: keep_non_blank(bio),
            profile_picture: keep_non_blank(profile_picture),
        }
    }

    /// Whether the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self.bio.is_none() && self.profile_picture.is_none()
    }
}
