//! Top-level real-time engine that ties together all subsystems.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use postify_core::config::realtime::RealtimeConfig;
use postify_core::error::{AppError, ErrorKind};

use crate::connection::gateway::ConnectionGateway;
use crate::connection::handle::ConnectionId;
use crate::message::types::{InboundEvent, OutboundEvent, SendMessagePayload, codes};
use crate::message::validator::{validate_inbound, validate_user_id};
use crate::metrics::RealtimeMetrics;
use crate::presence::registry::PresenceRegistry;
use crate::relay::MessageRelay;

/// Central real-time engine. Built once at server start and shared by
/// the WebSocket handler and the HTTP handlers that relay messages.
#[derive(Clone)]
pub struct RealtimeEngine {
    /// Presence registry.
    pub registry: Arc<PresenceRegistry>,
    /// Connection gateway.
    pub gateway: Arc<ConnectionGateway>,
    /// Message relay.
    pub relay: Arc<MessageRelay>,
    /// Metrics collector.
    pub metrics: Arc<RealtimeMetrics>,
    config: RealtimeConfig,
    shutdown_tx: broadcast::Sender<()>,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine")
            .field("policy", &self.registry.policy())
            .field("connections", &self.gateway.connection_count())
            .finish()
    }
}

impl RealtimeEngine {
    /// Creates a new real-time engine with all subsystems.
    pub fn new(config: RealtimeConfig) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        let metrics = Arc::new(RealtimeMetrics::new());
        let registry = Arc::new(PresenceRegistry::new(config.presence_policy));
        let gateway = Arc::new(ConnectionGateway::new(
            registry.clone(),
            metrics.clone(),
            &config,
        ));
        let relay = Arc::new(MessageRelay::new(registry.clone(), gateway.clone()));

        info!(
            policy = ?config.presence_policy,
            broadcast_presence = config.broadcast_presence,
            require_auth = config.require_auth,
            "Real-time engine initialized"
        );

        Self {
            registry,
            gateway,
            relay,
            metrics,
            config,
            shutdown_tx,
        }
    }

    /// The engine configuration.
    pub fn config(&self) -> &RealtimeConfig {
        &self.config
    }

    /// Processes one inbound text frame from a client.
    ///
    /// Rejected frames are answered with an `error` frame on the same
    /// connection and otherwise ignored.
    pub fn handle_inbound(&self, conn_id: ConnectionId, raw: &str) {
        self.metrics.frame_received();

        if let Err(e) = validate_inbound(raw, self.config.max_message_bytes) {
            let code = if raw.len() > self.config.max_message_bytes {
                codes::MESSAGE_TOO_LARGE
            } else {
                codes::INVALID_MESSAGE
            };
            self.reject(conn_id, code, e.message);
            return;
        }

        let event: InboundEvent = match serde_json::from_str(raw) {
            Ok(event) => event,
            Err(e) => {
                self.reject(
                    conn_id,
                    codes::INVALID_MESSAGE,
                    format!("Failed to parse message: {e}"),
                );
                return;
            }
        };

        match event {
            InboundEvent::AddUser(payload) => {
                if let Err(e) = self.gateway.announce(conn_id, payload.user_id()) {
                    self.reject_error(conn_id, e);
                }
            }
            InboundEvent::SendMessage(payload) => {
                if let Err(e) = self.handle_send(conn_id, &payload) {
                    self.reject_error(conn_id, e);
                }
            }
        }
    }

    fn handle_send(&self, conn_id: ConnectionId, payload: &SendMessagePayload) -> Result<(), AppError> {
        validate_user_id("senderId", &payload.sender_id)?;
        validate_user_id("receiverId", &payload.receiver_id)?;
        if payload.text.trim().is_empty() {
            return Err(AppError::validation("text is required"));
        }

        let Some(handle) = self.gateway.get(conn_id) else {
            return Ok(());
        };

        // Authenticated sockets may only speak as the user they announced.
        if handle.authenticated_user.is_some()
            && handle.announced_user().as_deref() != Some(payload.sender_id.as_str())
        {
            return Err(AppError::authorization(
                "senderId must match the announced user",
            ));
        }

        self.relay
            .relay(&payload.sender_id, &payload.receiver_id, &payload.text);
        Ok(())
    }

    fn reject_error(&self, conn_id: ConnectionId, err: AppError) {
        let code = match err.kind {
            ErrorKind::Authorization | ErrorKind::Authentication => codes::FORBIDDEN,
            _ => codes::VALIDATION,
        };
        self.reject(conn_id, code, err.message);
    }

    fn reject(&self, conn_id: ConnectionId, code: &str, message: String) {
        self.metrics.frame_rejected();
        debug!(conn_id = %conn_id, code, message = %message, "Inbound frame rejected");
        if !self.gateway.send_to(conn_id, OutboundEvent::error(code, message)) {
            warn!(conn_id = %conn_id, "Could not deliver error frame");
        }
    }

    /// Returns a shutdown receiver for graceful shutdown coordination.
    pub fn shutdown_receiver(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Signals every socket task to stop and closes all connections.
    pub fn shutdown(&self) {
        info!(
            connections = self.gateway.connection_count(),
            "Shutting down real-time engine"
        );

        let _ = self.shutdown_tx.send(());
        self.gateway.close_all();

        info!("Real-time engine shut down");
    }
}
