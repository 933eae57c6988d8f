//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Username.
    #[validate(length(min = 3, max = 30, message = "Username must be 3 to 30 characters"))]
    #[serde(default)]
    pub username: String,
    /// Email.
    #[validate(email(message = "Please include a valid email"))]
    #[serde(default)]
    pub email: String,
    /// Password. Strength rules are enforced by the auth service.
    #[validate(length(min = 1, message = "Password is required"))]
    #[serde(default)]
    pub password: String,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email.
    #[validate(email(message = "Please include a valid email"))]
    #[serde(default)]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    #[serde(default)]
    pub password: String,
}

/// Profile update. Blank fields keep the current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 500, message = "Bio must be at most 500 characters"))]
    pub bio: Option<String>,
    /// Picture URL.
    #[serde(rename = "profilePicture")]
    #[validate(length(max = 2048, message = "Profile picture URL is too long"))]
    pub profile_picture: Option<String>,
}

/// New post body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub content: String,
}

/// Post edit body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdatePostRequest {
    pub content: Option<String>,
}

/// New comment body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[serde(default)]
    pub text: String,
}

/// Direct message body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub message: String,
}

/// Image generation body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GenerateImageRequest {
    #[serde(default)]
    pub prompt: String,
}
