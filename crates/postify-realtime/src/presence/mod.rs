//! User presence tracking.

pub mod registry;

pub use registry::{PresenceEntry, PresenceRegistry, RegisterOutcome};
