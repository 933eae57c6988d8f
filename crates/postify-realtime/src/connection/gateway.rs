//! Connection gateway: owns live connections and drives their lifecycle.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, info};

use postify_core::config::realtime::RealtimeConfig;
use postify_core::error::AppError;

use crate::message::types::OutboundEvent;
use crate::message::validator::validate_user_id;
use crate::metrics::RealtimeMetrics;
use crate::presence::registry::{PresenceRegistry, RegisterOutcome};

use super::authenticator::AuthenticatedConnection;
use super::handle::{ConnectionHandle, ConnectionId};

/// Result of an `addUser` frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnounceOutcome {
    /// The connection is now announced; the registry did this.
    Accepted(RegisterOutcome),
    /// The connection is no longer open; nothing was registered.
    ConnectionClosed,
}

/// Tracks every open connection and keeps the presence registry in step
/// with announces and disconnects.
#[derive(Debug)]
pub struct ConnectionGateway {
    registry: Arc<PresenceRegistry>,
    connections: DashMap<ConnectionId, Arc<ConnectionHandle>>,
    metrics: Arc<RealtimeMetrics>,
    buffer_size: usize,
    broadcast_presence: bool,
}

impl ConnectionGateway {
    /// Creates a gateway over the given registry.
    pub fn new(
        registry: Arc<PresenceRegistry>,
        metrics: Arc<RealtimeMetrics>,
        config: &RealtimeConfig,
    ) -> Self {
        Self {
            registry,
            connections: DashMap::new(),
            metrics,
            buffer_size: config.channel_buffer_size.max(1),
            broadcast_presence: config.broadcast_presence,
        }
    }

    /// The registry this gateway maintains.
    pub fn registry(&self) -> &Arc<PresenceRegistry> {
        &self.registry
    }

    /// Accepts a new connection in the anonymous state.
    ///
    /// Returns the connection ID and the receiver for its outbound queue.
    /// The queue closes once the connection is closed.
    pub fn open(
        &self,
        authenticated: Option<&AuthenticatedConnection>,
    ) -> (ConnectionId, mpsc::Receiver<OutboundEvent>) {
        let (tx, rx) = mpsc::channel(self.buffer_size);
        let handle = Arc::new(ConnectionHandle::new(
            tx,
            authenticated.map(|a| a.user_id.clone()),
        ));
        let conn_id = handle.id;

        self.connections.insert(conn_id, handle);
        self.metrics.connection_opened();

        debug!(
            conn_id = %conn_id,
            authenticated = authenticated.is_some(),
            "Connection opened"
        );

        (conn_id, rx)
    }

    /// Associates an open connection with `user_id`.
    ///
    /// Fails only when the connection is bound to a different user by its
    /// upgrade token, or the ID is malformed.
    pub fn announce(&self, conn_id: ConnectionId, user_id: &str) -> Result<AnnounceOutcome, AppError> {
        validate_user_id("userId", user_id)?;

        // The map entry stays borrowed across the registry write, so `close`
        // cannot remove the connection in between.
        let outcome = {
            let Some(entry) = self.connections.get(&conn_id) else {
                return Ok(AnnounceOutcome::ConnectionClosed);
            };
            let handle = entry.value();

            if let Some(bound) = &handle.authenticated_user {
                if bound != user_id {
                    return Err(AppError::authorization(
                        "Announced user does not match the authenticated user",
                    ));
                }
            }

            if !handle.is_open() {
                return Ok(AnnounceOutcome::ConnectionClosed);
            }

            let outcome = self.registry.register(user_id, conn_id);
            handle.mark_announced(user_id);
            outcome
        };

        self.metrics.announce();

        match outcome {
            RegisterOutcome::Registered => {
                info!(conn_id = %conn_id, user_id = %user_id, "User announced");
            }
            RegisterOutcome::Replaced { previous } => {
                info!(
                    conn_id = %conn_id,
                    previous = %previous,
                    user_id = %user_id,
                    "User announced, previous connection displaced"
                );
            }
            RegisterOutcome::Ignored { detached: true } => {
                info!(
                    conn_id = %conn_id,
                    user_id = %user_id,
                    "Connection left its previous user, announce ignored"
                );
            }
            RegisterOutcome::AlreadyRegistered | RegisterOutcome::Ignored { detached: false } => {
                debug!(conn_id = %conn_id, user_id = %user_id, ?outcome, "Duplicate announce");
            }
        }

        if outcome.changed() {
            self.broadcast_presence();
        }

        Ok(AnnounceOutcome::Accepted(outcome))
    }

    /// Tears a connection down. Returns `false` if it was already closed.
    pub fn close(&self, conn_id: ConnectionId) -> bool {
        let Some((_, handle)) = self.connections.remove(&conn_id) else {
            return false;
        };
        handle.mark_closed();

        let user_id = self.registry.unregister(conn_id);
        self.metrics.connection_closed();

        match &user_id {
            Some(user_id) => info!(conn_id = %conn_id, user_id = %user_id, "User disconnected"),
            None => debug!(conn_id = %conn_id, "Anonymous connection closed"),
        }

        if user_id.is_some() {
            self.broadcast_presence();
        }
        true
    }

    /// Closes every open connection.
    pub fn close_all(&self) {
        for conn_id in self.connection_ids() {
            self.close(conn_id);
        }
    }

    /// Looks up an open connection.
    pub fn get(&self, conn_id: ConnectionId) -> Option<Arc<ConnectionHandle>> {
        self.connections.get(&conn_id).map(|e| e.value().clone())
    }

    /// Queues an event on one connection. Returns `false` if it was dropped.
    pub fn send_to(&self, conn_id: ConnectionId, event: OutboundEvent) -> bool {
        let Some(handle) = self.get(conn_id) else {
            self.metrics.event_dropped();
            return false;
        };

        let sent = handle.send(event);
        if sent {
            self.metrics.event_delivered();
        } else {
            self.metrics.event_dropped();
        }
        sent
    }

    /// Queues an event on every open connection. Returns how many took it.
    pub fn broadcast(&self, event: &OutboundEvent) -> usize {
        let handles: Vec<Arc<ConnectionHandle>> =
            self.connections.iter().map(|e| e.value().clone()).collect();

        handles
            .into_iter()
            .filter(|handle| handle.send(event.clone()))
            .count()
    }

    /// Sends the presence snapshot to everyone, if enabled.
    fn broadcast_presence(&self) {
        if !self.broadcast_presence {
            return;
        }
        let snapshot = OutboundEvent::GetUsers(self.registry.snapshot());
        let reached = self.broadcast(&snapshot);
        debug!(reached, "Presence snapshot broadcast");
    }

    /// Number of open connections.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// IDs of all open connections.
    pub fn connection_ids(&self) -> Vec<ConnectionId> {
        self.connections.iter().map(|e| *e.key()).collect()
    }
}
