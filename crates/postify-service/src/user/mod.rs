//! Account and profile services.

pub mod auth;
pub mod service;

pub use auth::{AuthService, AuthenticatedUser, RegisterInput};
pub use service::{FollowOutcome, UserProfile, UserService};
