//! Message relay: pushes a message to a receiver's live connections.

use std::sync::Arc;

use tracing::debug;

use crate::connection::gateway::ConnectionGateway;
use crate::message::types::OutboundEvent;
use crate::presence::registry::PresenceRegistry;

/// How a relay attempt went. Informational only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayReport {
    /// Connections the receiver is announced on.
    pub targeted: usize,
    /// Connections that accepted the event.
    pub delivered: usize,
}

/// Routes `getMessage` events to the receiver's live connection(s).
///
/// Relay never fails: an offline receiver or a full or closed buffer
/// is skipped silently.
#[derive(Debug, Clone)]
pub struct MessageRelay {
    registry: Arc<PresenceRegistry>,
    gateway: Arc<ConnectionGateway>,
}

impl MessageRelay {
    /// Creates a relay over the gateway and its registry.
    pub fn new(registry: Arc<PresenceRegistry>, gateway: Arc<ConnectionGateway>) -> Self {
        Self { registry, gateway }
    }

    /// Pushes `{sender, text}` to every connection `receiver_id` is announced on.
    pub fn relay(&self, sender_id: &str, receiver_id: &str, text: &str) -> RelayReport {
        let targets = self.registry.connections_for(receiver_id);
        if targets.is_empty() {
            debug!(sender = %sender_id, receiver = %receiver_id, "Receiver offline, nothing relayed");
            return RelayReport::default();
        }

        let event = OutboundEvent::GetMessage {
            sender: sender_id.to_string(),
            text: text.to_string(),
        };

        let delivered = targets
            .iter()
            .filter(|conn_id| self.gateway.send_to(**conn_id, event.clone()))
            .count();

        debug!(
            sender = %sender_id,
            receiver = %receiver_id,
            targeted = targets.len(),
            delivered,
            "Message relayed"
        );

        RelayReport {
            targeted: targets.len(),
            delivered,
        }
    }
}
