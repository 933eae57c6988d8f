//! WebSocket connection lifecycle.

pub mod authenticator;
pub mod gateway;
pub mod handle;

pub use authenticator::{AuthenticatedConnection, WsAuthenticator};
pub use gateway::{AnnounceOutcome, ConnectionGateway};
pub use handle::{ConnectionHandle, ConnectionId, ConnectionState};
