//! Real-time WebSocket engine configuration.

use serde::{Deserialize, Serialize};

/// How the presence registry treats a user announced on more than one
/// connection at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresencePolicy {
    /// The first connection keeps the user; later announces are no-ops.
    FirstWins,
    /// The latest announce replaces the previous connection.
    LastWins,
    /// Every announced connection is kept and receives deliveries.
    #[default]
    FanOut,
}

/// Real-time (WebSocket) engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Multi-connection policy for the presence registry.
    #[serde(default)]
    pub presence_policy: PresencePolicy,
    /// Per-connection outbound buffer size.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
    /// Broadcast a `getUsers` snapshot after every presence change.
    #[serde(default)]
    pub broadcast_presence: bool,
    /// Require `?token=` on upgrade and bind announces to the token subject.
    #[serde(default)]
    pub require_auth: bool,
    /// Largest accepted inbound text frame in bytes.
    #[serde(default = "default_max_message_bytes")]
    pub max_message_bytes: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            presence_policy: PresencePolicy::default(),
            channel_buffer_size: default_channel_buffer(),
            broadcast_presence: false,
            require_auth: false,
            max_message_bytes: default_max_message_bytes(),
        }
    }
}

fn default_channel_buffer() -> usize {
    256
}

fn default_max_message_bytes() -> usize {
    64 * 1024
}
