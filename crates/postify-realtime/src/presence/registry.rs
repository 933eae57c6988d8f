//! Presence registry: which user is announced on which connection.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use postify_core::config::realtime::PresencePolicy;

use crate::connection::handle::ConnectionId;

/// One user/connection association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceEntry {
    /// Announced user ID.
    pub user_id: String,
    /// Connection carrying the announce.
    pub connection_id: ConnectionId,
}

/// What a `register` call did to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// A new entry was created.
    Registered,
    /// The same pair was already present.
    AlreadyRegistered,
    /// The user is held by another connection and the policy keeps it.
    Ignored {
        /// The connection was announced as another user and lost that entry.
        detached: bool,
    },
    /// The user's previous connection was displaced.
    Replaced {
        /// The connection that no longer maps to the user.
        previous: ConnectionId,
    },
}

impl RegisterOutcome {
    /// Whether the registry contents changed.
    pub fn changed(&self) -> bool {
        matches!(
            self,
            Self::Registered | Self::Replaced { .. } | Self::Ignored { detached: true }
        )
    }
}

#[derive(Debug, Default)]
struct Inner {
    /// User ID → connections in announce order.
    by_user: HashMap<String, Vec<ConnectionId>>,
    /// Connection → the single user it is announced as.
    by_conn: HashMap<ConnectionId, String>,
}

impl Inner {
    fn detach(&mut self, conn_id: ConnectionId) -> Option<String> {
        let user_id = self.by_conn.remove(&conn_id)?;
        if let Some(conns) = self.by_user.get_mut(&user_id) {
            conns.retain(|c| *c != conn_id);
            if conns.is_empty() {
                self.by_user.remove(&user_id);
            }
        }
        Some(user_id)
    }
}

/// Process-wide map of announced users to their live connections.
///
/// Both indexes sit under one lock so a connection is never visible in
/// one direction and missing in the other.
#[derive(Debug)]
pub struct PresenceRegistry {
    policy: PresencePolicy,
    inner: RwLock<Inner>,
}

impl PresenceRegistry {
    /// Create an empty registry with the given multi-connection policy.
    pub fn new(policy: PresencePolicy) -> Self {
        Self {
            policy,
            inner: RwLock::new(Inner::default()),
        }
    }

    /// The active multi-connection policy.
    pub fn policy(&self) -> PresencePolicy {
        self.policy
    }

    /// Associate `conn_id` with `user_id`.
    ///
    /// A connection maps to at most one user: announcing a different user
    /// on the same connection moves it.
    pub fn register(&self, user_id: &str, conn_id: ConnectionId) -> RegisterOutcome {
        let mut inner = self.inner.write();

        let detached = match inner.by_conn.get(&conn_id) {
            Some(current) if current == user_id => return RegisterOutcome::AlreadyRegistered,
            Some(_) => inner.detach(conn_id).is_some(),
            None => false,
        };

        let held_by = inner.by_user.get(user_id).and_then(|c| c.first().copied());

        let outcome = match (self.policy, held_by) {
            (_, None) => RegisterOutcome::Registered,
            (PresencePolicy::FirstWins, Some(_)) => return RegisterOutcome::Ignored { detached },
            (PresencePolicy::LastWins, Some(previous)) => {
                inner.detach(previous);
                RegisterOutcome::Replaced { previous }
            }
            (PresencePolicy::FanOut, Some(_)) => RegisterOutcome::Registered,
        };

        inner
            .by_user
            .entry(user_id.to_string())
            .or_default()
            .push(conn_id);
        inner.by_conn.insert(conn_id, user_id.to_string());

        outcome
    }

    /// Remove whatever entry `conn_id` holds. Returns the user it was
    /// announced as, or `None` if it held nothing.
    pub fn unregister(&self, conn_id: ConnectionId) -> Option<String> {
        self.inner.write().detach(conn_id)
    }

    /// The user's primary connection: the only one under `first_wins` and
    /// `last_wins`, the earliest announced under `fan_out`.
    pub fn lookup(&self, user_id: &str) -> Option<ConnectionId> {
        self.inner
            .read()
            .by_user
            .get(user_id)
            .and_then(|c| c.first().copied())
    }

    /// Every connection the user is announced on, in announce order.
    pub fn connections_for(&self, user_id: &str) -> Vec<ConnectionId> {
        self.inner
            .read()
            .by_user
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }

    /// The user a connection is announced as.
    pub fn user_for(&self, conn_id: ConnectionId) -> Option<String> {
        self.inner.read().by_conn.get(&conn_id).cloned()
    }

    /// Whether the user has at least one live connection.
    pub fn is_online(&self, user_id: &str) -> bool {
        self.inner.read().by_user.contains_key(user_id)
    }

    /// Number of distinct online users.
    pub fn online_user_count(&self) -> usize {
        self.inner.read().by_user.len()
    }

    /// Number of announced connections.
    pub fn entry_count(&self) -> usize {
        self.inner.read().by_conn.len()
    }

    /// All entries, ordered by user ID then announce order.
    pub fn snapshot(&self) -> Vec<PresenceEntry> {
        let inner = self.inner.read();
        let mut users: Vec<&String> = inner.by_user.keys().collect();
        users.sort();

        users
            .into_iter()
            .flat_map(|user_id| {
                inner.by_user[user_id].iter().map(|conn_id| PresenceEntry {
                    user_id: user_id.clone(),
                    connection_id: *conn_id,
                })
            })
            .collect()
    }
}

impl Default for PresenceRegistry {
    fn default() -> Self {
        Self::new(PresencePolicy::default())
    }
}
