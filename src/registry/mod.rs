//! Connection registry: lifecycle and message fan-out for live connections.
//!
//! The registry owns the set of currently-open WebSocket connections. It is
//! constructed once at startup and shared via `Arc`, never a bare global, so
//! tests can build independent registries.
//!
//! Connections are keyed by a server-assigned `ConnectionId`, not by the
//! client-supplied identifier: client identifiers are opaque and duplicates
//! are permitted, so two tabs opened as "alice" are two distinct connections.

use std::collections::HashMap;

use thiserror::Error;
use tokio::sync::{Mutex, mpsc};
use uuid::Uuid;

/// Server-assigned unique identifier for one open connection.
pub type ConnectionId = Uuid;

/// Channel used to push outbound text frames to one connection.
pub type ConnectionSender = mpsc::UnboundedSender<String>;

/// Registry-level errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The connection id is not in the active set.
    #[error("connection '{0}' is not registered")]
    NotRegistered(ConnectionId),

    /// The connection's outbound channel is gone; the caller must treat this
    /// as a disconnect and unregister the connection.
    #[error("transport closed for connection '{0}'")]
    TransportClosed(ConnectionId),
}

/// One entry in the active connection set.
#[derive(Debug)]
pub struct Connection {
    pub id: ConnectionId,
    /// Opaque client-supplied identifier. Not validated, not deduplicated.
    pub client_id: String,
    /// Outbound frame channel, drained by the connection's pusher task.
    pub sender: ConnectionSender,
    /// Unix timestamp in milliseconds when the connection was accepted.
    pub connected_at: i64,
}

impl Connection {
    /// Build a new connection entry with a fresh id.
    pub fn new(client_id: impl Into<String>, sender: ConnectionSender, connected_at: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            client_id: client_id.into(),
            sender,
            connected_at,
        }
    }
}

/// Snapshot of one registered connection, for the debug endpoint and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    pub id: ConnectionId,
    pub client_id: String,
    pub connected_at: i64,
}

/// Registry of live connections with unicast and broadcast fan-out.
pub struct ConnectionRegistry {
    connections: Mutex<HashMap<ConnectionId, Connection>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(HashMap::new()),
        }
    }

    /// Add a connection to the active set. From this point on the connection
    /// is eligible for every subsequent broadcast.
    pub async fn register(&self, connection: Connection) {
        let mut connections = self.connections.lock().await;
        tracing::debug!(
            "Connection {} (client '{}') registered",
            connection.id,
            connection.client_id
        );
        connections.insert(connection.id, connection);
    }

    /// Remove a connection from the active set. Silent no-op when the
    /// connection is not present: disconnect handling may race with the
    /// pruning done by `broadcast`.
    pub async fn unregister(&self, id: &ConnectionId) {
        let mut connections = self.connections.lock().await;
        if connections.remove(id).is_some() {
            tracing::debug!("Connection {} unregistered", id);
        }
    }

    /// Deliver `message` to exactly one connection.
    pub async fn send(&self, id: &ConnectionId, message: &str) -> Result<(), RegistryError> {
        let connections = self.connections.lock().await;
        let connection = connections
            .get(id)
            .ok_or(RegistryError::NotRegistered(*id))?;
        connection
            .sender
            .send(message.to_string())
            .map_err(|_| RegistryError::TransportClosed(*id))
    }

    /// Deliver `message` to every currently registered connection.
    ///
    /// Per-connection failures are isolated: one dead connection never blocks
    /// delivery to the rest. Dead connections are collected during the pass
    /// and pruned before the lock is released, and their ids are returned.
    pub async fn broadcast(&self, message: &str) -> Vec<ConnectionId> {
        let mut connections = self.connections.lock().await;

        let mut dead: Vec<ConnectionId> = Vec::new();
        for (id, connection) in connections.iter() {
            if connection.sender.send(message.to_string()).is_err() {
                tracing::warn!(
                    "Failed to push broadcast to connection {} (client '{}')",
                    id,
                    connection.client_id
                );
                dead.push(*id);
            }
        }

        for id in &dead {
            connections.remove(id);
            tracing::debug!("Pruned dead connection {} after broadcast", id);
        }

        dead
    }

    /// Number of currently registered connections.
    pub async fn len(&self) -> usize {
        self.connections.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.connections.lock().await.is_empty()
    }

    /// Snapshot of the active set, sorted by client id for stable output.
    pub async fn snapshot(&self) -> Vec<ConnectionInfo> {
        let connections = self.connections.lock().await;
        let mut infos: Vec<ConnectionInfo> = connections
            .values()
            .map(|c| ConnectionInfo {
                id: c.id,
                client_id: c.client_id.clone(),
                connected_at: c.connected_at,
            })
            .collect();
        infos.sort_by(|a, b| a.client_id.cmp(&b.client_id));
        infos
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
