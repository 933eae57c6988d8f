//! Text-to-image generation proxy.

pub mod service;

pub use service::ImageGenerationService;
