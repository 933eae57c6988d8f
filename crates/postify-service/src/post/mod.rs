//! Post and comment services.

pub mod service;

pub use service::PostService;
