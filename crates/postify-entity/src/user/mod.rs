//! User domain entities.

pub mod model;
pub mod profile;

pub use model::{CreateUser, UpdateProfile, User};
pub use profile::{PublicUser, UserSummary};
