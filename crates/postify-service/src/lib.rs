//! # postify-service
//!
//! Business logic service layer for Postify. Each service orchestrates
//! repositories, password and token handling, or the upstream image API
//! to implement one application-level use case.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod generation;
pub mod message;
pub mod post;
pub mod user;

pub use context::RequestContext;
pub use generation::ImageGenerationService;
pub use message::MessageService;
pub use post::PostService;
pub use user::{AuthService, UserService};
