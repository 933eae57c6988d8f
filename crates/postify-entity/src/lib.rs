//! # postify-entity
//!
//! Domain entity models for Postify. Every struct in this crate represents
//! a database table row, a joined read model, or a serializable view.
//! Row types derive `sqlx::FromRow`; views are what the API serializes.

pub mod conversation;
pub mod post;
pub mod user;
