//! Connection management for WebSocket clients.
//!
//! Tracks connected sessions and fans leaderboard events out to them. This
//! is the engine's `Notifier` implementation: delivery is best-effort, a
//! slow or closed session is logged and skipped, and nothing is replayed.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, RwLock};

use questboard_domain::ConnectionId;
use questboard_shared::ServerMessage;

use crate::infrastructure::ports::Notifier;

/// Information about a connected client.
#[derive(Debug, Clone)]
pub struct ConnectionInfo {
    /// Unique ID for this connection
    pub connection_id: ConnectionId,
    pub connected_at: DateTime<Utc>,
}

/// Manages all active WebSocket connections.
pub struct ConnectionManager {
    /// Map of connection_id -> (ConnectionInfo, sender channel)
    connections: RwLock<HashMap<ConnectionId, (ConnectionInfo, mpsc::Sender<ServerMessage>)>>,
}

impl ConnectionManager {
    /// Create a new connection manager.
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new connection.
    pub async fn register(
        &self,
        connection_id: ConnectionId,
        sender: mpsc::Sender<ServerMessage>,
    ) {
        let info = ConnectionInfo {
            connection_id,
            connected_at: Utc::now(),
        };
        let mut connections = self.connections.write().await;
        connections.insert(connection_id, (info, sender));
        tracing::debug!(connection_id = %connection_id, "Connection registered");
    }

    /// Unregister a connection.
    pub async fn unregister(&self, connection_id: ConnectionId) {
        let mut connections = self.connections.write().await;
        if connections.remove(&connection_id).is_some() {
            tracing::debug!(connection_id = %connection_id, "Connection unregistered");
        }
    }

    /// Number of currently connected sessions.
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for ConnectionManager {
    /// Broadcast a message to every connected session.
    async fn broadcast(&self, message: ServerMessage) {
        let connections = self.connections.read().await;
        for (info, sender) in connections.values() {
            if let Err(e) = sender.try_send(message.clone()) {
                tracing::warn!(
                    connection_id = %info.connection_id,
                    error = %e,
                    "Failed to broadcast message"
                );
            }
        }
    }
}
