//! Direct-messaging domain entities.

pub mod message;
pub mod model;

pub use message::{CreateMessage, Message};
pub use model::{Conversation, ConversationRow, ConversationView, LastMessage};
