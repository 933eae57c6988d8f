//! Post and comment domain entities.

pub mod comment;
pub mod model;

pub use comment::{Comment, CommentView, CommentWithAuthor};
pub use model::{Post, PostView, PostWithAuthor};
