//! # postify-realtime
//!
//! In-memory realtime layer for Postify:
//!
//! - Presence registry mapping announced user IDs to live connections
//! - Connection gateway driving the per-connection announce/close lifecycle
//! - Fire-and-forget message relay to a receiver's live connections
//!
//! Nothing here is persisted. A user is online only while one of their
//! sockets is open on this process.

pub mod connection;
pub mod message;
pub mod metrics;
pub mod presence;
pub mod relay;
pub mod server;

pub use connection::gateway::ConnectionGateway;
pub use connection::handle::ConnectionId;
pub use presence::registry::PresenceRegistry;
pub use relay::MessageRelay;
pub use server::RealtimeEngine;
