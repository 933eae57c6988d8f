//! Route handlers organized by domain.

pub mod generation;
pub mod health;
pub mod message;
pub mod post;
pub mod user;
pub mod ws;
