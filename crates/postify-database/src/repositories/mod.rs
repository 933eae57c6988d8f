//! Repository implementations for all Postify entities.

pub mod comment;
pub mod conversation;
pub mod follow;
pub mod message;
pub mod post;
pub mod user;

pub use comment::CommentRepository;
pub use conversation::ConversationRepository;
pub use follow::FollowRepository;
pub use message::MessageRepository;
pub use post::PostRepository;
pub use user::UserRepository;
